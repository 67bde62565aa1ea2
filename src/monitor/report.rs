use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::MonitorError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub muted: bool,
    pub volume: i32,
    pub line: String,
    pub partial: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mute: {}, volume: {} line: {} prefix: {}",
            self.muted, self.volume, self.line, self.partial
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait ReportSink {
    fn emit(&mut self, report: &StatusReport) -> Result<(), MonitorError>;
}

/// Writes one report per line, flushing after each.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, report: &StatusReport) -> Result<(), MonitorError> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", report)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, report).map_err(std::io::Error::from)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> StatusReport {
        StatusReport {
            muted: false,
            volume: 62,
            line: "Event 'change' on sink #0".to_string(),
            partial: false,
        }
    }

    #[test]
    fn test_text_layout() {
        assert_eq!(
            report().to_string(),
            "mute: false, volume: 62 line: Event 'change' on sink #0 prefix: false"
        );
    }

    #[test]
    fn test_writer_sink_text() {
        let mut sink = WriterSink::new(Vec::new(), OutputFormat::Text);
        sink.emit(&report()).unwrap();
        sink.emit(&StatusReport { muted: true, ..report() }).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("mute: true, volume: 62"));
    }

    #[test]
    fn test_writer_sink_json() {
        let mut sink = WriterSink::new(Vec::new(), OutputFormat::Json);
        sink.emit(&report()).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["muted"], false);
        assert_eq!(value["volume"], 62);
        assert_eq!(value["line"], "Event 'change' on sink #0");
        assert_eq!(value["partial"], false);
    }
}
