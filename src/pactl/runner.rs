use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::CommandError;

/// Runs a program to completion and hands back what it wrote to stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>, CommandError>;
}

/// Spawns real child processes. Without a timeout a hung child blocks the caller forever.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>, CommandError> {
        let name = program.display().to_string();
        tracing::trace!(program = %name, ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match self.timeout {
            Some(after) => match tokio::time::timeout(after, output).await {
                Ok(result) => result,
                Err(_) => return Err(CommandError::Timeout { program: name, after }),
            },
            None => output.await,
        }
        .map_err(|source| CommandError::Spawn {
            program: name.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CommandError::Status {
                program: name,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Answers by the first argument and records every invocation.
    #[derive(Debug, Clone, Default)]
    pub struct FakeRunner {
        responses: Arc<Mutex<Vec<(String, Result<Vec<u8>, i32>)>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, subcommand: &str, output: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((subcommand.to_string(), Ok(output.as_bytes().to_vec())));
            self
        }

        pub fn fail(self, subcommand: &str, code: i32) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((subcommand.to_string(), Err(code)));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>, CommandError> {
            let subcommand = args.first().copied().unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(subcommand.clone());

            let responses = self.responses.lock().unwrap();
            match responses.iter().find(|(name, _)| *name == subcommand) {
                Some((_, Ok(bytes))) => Ok(bytes.clone()),
                Some((_, Err(code))) => Err(CommandError::Status {
                    program: program.display().to_string(),
                    code: Some(*code),
                    stderr: "Connection failure: Connection refused".to_string(),
                }),
                None => Err(CommandError::Spawn {
                    program: program.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no canned response"),
                }),
            }
        }
    }
}
