pub mod config;
pub mod error;
pub mod monitor;
pub mod pactl;

pub use config::{Config, MonitorConfig, PactlConfig};
pub use error::{CommandError, MonitorError};
pub use monitor::{Monitor, OutputFormat, ReportSink, StatusReport, WriterSink};
pub use pactl::{CommandRunner, Event, EventFilter, StateQuery, Subscription, SystemRunner};
