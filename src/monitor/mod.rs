pub mod line;
pub mod report;

pub use line::{LineReader, NotificationLine};
pub use report::{OutputFormat, ReportSink, StatusReport, WriterSink};

use tokio::io::AsyncBufRead;

use crate::config::Config;
use crate::error::MonitorError;
use crate::pactl::{CommandRunner, EventFilter, StateQuery, Subscription, SystemRunner};

/// Reads subscription lines and reports mute/volume after each qualifying one.
#[derive(Debug)]
pub struct Monitor<R> {
    query: StateQuery<R>,
    filter: EventFilter,
    line_buffer: usize,
}

impl<R: CommandRunner> Monitor<R> {
    pub fn new(query: StateQuery<R>) -> Self {
        Self {
            query,
            filter: EventFilter::default(),
            line_buffer: line::DEFAULT_CAPACITY,
        }
    }

    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_line_buffer(mut self, line_buffer: usize) -> Self {
        self.line_buffer = line_buffer;
        self
    }

    /// Runs until the stream ends or fails to read, which both count as success.
    ///
    /// A failed query aborts before anything is emitted for that line.
    pub async fn watch<S, K>(&self, stream: S, sink: &mut K) -> Result<(), MonitorError>
    where
        S: AsyncBufRead + Unpin,
        K: ReportSink,
    {
        let mut lines = LineReader::with_capacity(stream, self.line_buffer);

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("subscription stream ended");
                    break;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "subscription stream read failed");
                    break;
                }
            };

            if !self.filter.matches(&line.bytes) {
                tracing::trace!(line = %line.text(), "ignoring event");
                continue;
            }

            let muted = self.query.check_mute().await?;
            let volume = self.query.check_volume().await?;

            let report = StatusReport {
                muted,
                volume,
                line: line.text().into_owned(),
                partial: line.partial,
            };
            tracing::debug!(muted, volume, "sink state changed");
            sink.emit(&report)?;
        }

        Ok(())
    }
}

/// Starts `pactl subscribe`, watches it, and always closes it afterwards.
pub async fn run<K: ReportSink>(config: &Config, sink: &mut K) -> Result<(), MonitorError> {
    let pactl = config.pactl_path();
    let runner = SystemRunner::with_timeout(config.query_timeout());
    let monitor = Monitor::new(StateQuery::new(runner, pactl.clone()))
        .with_filter(config.monitor.filter)
        .with_line_buffer(config.monitor.line_buffer);

    tracing::info!(pactl = %pactl.display(), filter = %config.monitor.filter, "starting subscription");
    let mut subscription = Subscription::start(&pactl)?;

    let result = match subscription.take_stream() {
        Some(stream) => {
            tracing::info!("monitoring default sink");
            monitor.watch(stream, sink).await
        }
        None => Ok(()),
    };

    subscription.close().await;
    tracing::info!(ok = result.is_ok(), "stopped");
    result
}
