use std::time::Duration;

/// Failure of a one-shot `pactl` invocation.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    Status {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("{program} did not finish within {after:?}")]
    Timeout { program: String, after: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("failed to launch {program} subscribe: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error checking sink {target}: {source}")]
    Query {
        target: &'static str,
        #[source]
        source: CommandError,
    },
    #[error("error parsing pactl get-sink-volume: {0}")]
    Parse(String),
    #[error("failed to write status report: {0}")]
    Output(#[from] std::io::Error),
}

impl MonitorError {
    pub fn is_query(&self) -> bool {
        matches!(self, MonitorError::Query { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, MonitorError::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = CommandError::Status {
            program: "pactl".to_string(),
            code: Some(1),
            stderr: "Connection failure".to_string(),
        };
        assert_eq!(err.to_string(), "pactl exited with status 1: Connection failure");

        let killed = CommandError::Status {
            program: "pactl".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("signal"));
    }

    #[test]
    fn test_query_error_wraps_source() {
        use std::error::Error;

        let err = MonitorError::Query {
            target: "mute",
            source: CommandError::Timeout {
                program: "pactl".to_string(),
                after: Duration::from_millis(50),
            },
        };
        assert!(err.is_query());
        assert!(!err.is_parse());
        assert!(err.to_string().starts_with("error checking sink mute"));
        assert!(err.source().is_some());
    }
}
