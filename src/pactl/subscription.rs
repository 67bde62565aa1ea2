use std::path::Path;
use std::process::Stdio;

use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};

use crate::error::MonitorError;

/// The running `pactl subscribe` child and its stdout.
///
/// Dropping it kills the child; [`Subscription::close`] additionally reaps it
/// and logs anything that goes wrong on the way out.
#[derive(Debug)]
pub struct Subscription {
    program: String,
    child: Child,
    stdout: Option<ChildStdout>,
}

impl Subscription {
    pub fn start(pactl: &Path) -> Result<Self, MonitorError> {
        Self::spawn(pactl, &["subscribe"])
    }

    pub(crate) fn spawn(program: &Path, args: &[&str]) -> Result<Self, MonitorError> {
        let name = program.display().to_string();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MonitorError::Launch {
                program: name.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| MonitorError::Launch {
            program: name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout was not captured"),
        })?;

        tracing::debug!(program = %name, pid = ?child.id(), "subscription started");

        Ok(Self {
            program: name,
            child,
            stdout: Some(stdout),
        })
    }

    /// Hands out the output stream. Returns `None` once taken.
    pub fn take_stream(&mut self) -> Option<BufReader<ChildStdout>> {
        self.stdout.take().map(BufReader::new)
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn close(mut self) {
        drop(self.stdout.take());

        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(program = %self.program, %status, "subscription exited");
            }
            Ok(None) => match self.child.kill().await {
                Ok(()) => tracing::debug!(program = %self.program, "subscription stopped"),
                Err(e) => tracing::error!(program = %self.program, error = %e, "error stopping subscription"),
            },
            Err(e) => {
                tracing::error!(program = %self.program, error = %e, "error reaping subscription");
            }
        }
    }
}
