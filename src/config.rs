use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::monitor::line::DEFAULT_CAPACITY;
use crate::monitor::OutputFormat;
use crate::pactl::{EventFilter, DEFAULT_PACTL};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pactl: PactlConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PactlConfig {
    #[serde(default = "default_pactl_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

impl Default for PactlConfig {
    fn default() -> Self {
        Self {
            path: default_pactl_path(),
            query_timeout_ms: None,
        }
    }
}

fn default_pactl_path() -> String {
    DEFAULT_PACTL.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_line_buffer")]
    pub line_buffer: usize,
    #[serde(default)]
    pub filter: EventFilter,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            line_buffer: default_line_buffer(),
            filter: EventFilter::default(),
            format: OutputFormat::default(),
        }
    }
}

fn default_line_buffer() -> usize {
    DEFAULT_CAPACITY
}

impl Config {
    /// Defaults, then the user config file if any, then `SINKWATCH_` variables.
    pub fn load() -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match Self::default_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                figment = figment.merge(Toml::file(path));
            }
            None => tracing::debug!("no config directory, using defaults"),
        }

        Self::extract(figment)
    }

    pub fn load_from_path(path: PathBuf) -> Result<Self, figment::Error> {
        let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, figment::Error> {
        figment
            .merge(Env::prefixed("SINKWATCH_").split("__"))
            .extract()
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "sinkwatch", "sinkwatch").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn pactl_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.pactl.path).into_owned())
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.pactl.query_timeout_ms.map(Duration::from_millis)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pactl.path, "/usr/bin/pactl");
        assert_eq!(config.query_timeout(), None);
        assert_eq!(config.monitor.line_buffer, 37);
        assert_eq!(config.monitor.filter, EventFilter::Change);
        assert_eq!(config.monitor.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[pactl]\npath = \"~/bin/pactl\"\nquery_timeout_ms = 1500\n\n[monitor]\nfilter = \"sink\"\nformat = \"json\"\n"
        )
        .unwrap();

        let config = Config::load_from_path(file.path().to_path_buf()).unwrap();
        assert_eq!(config.query_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.monitor.filter, EventFilter::Sink);
        assert_eq!(config.monitor.format, OutputFormat::Json);
        assert_eq!(config.monitor.line_buffer, 37);
        assert_eq!(config.pactl.path, "~/bin/pactl");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\nfilter = \"everything\"").unwrap();

        assert!(Config::load_from_path(file.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("path = \"/usr/bin/pactl\""));
        assert!(!text.contains("query_timeout_ms"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
