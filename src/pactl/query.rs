use std::path::{Path, PathBuf};

use crate::error::MonitorError;
use crate::pactl::runner::CommandRunner;
use crate::pactl::DEFAULT_SINK;

/// Point queries for the default sink's mute flag and volume.
///
/// Every call spawns `pactl` afresh; nothing is cached between calls.
#[derive(Debug)]
pub struct StateQuery<R> {
    runner: R,
    pactl: PathBuf,
}

impl<R: CommandRunner> StateQuery<R> {
    pub fn new(runner: R, pactl: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            pactl: pactl.into(),
        }
    }

    pub fn pactl(&self) -> &Path {
        &self.pactl
    }

    pub async fn check_mute(&self) -> Result<bool, MonitorError> {
        let out = self
            .runner
            .run(&self.pactl, &["get-sink-mute", DEFAULT_SINK])
            .await
            .map_err(|source| MonitorError::Query {
                target: "mute",
                source,
            })?;

        Ok(parse_mute(&out))
    }

    pub async fn check_volume(&self) -> Result<i32, MonitorError> {
        let out = self
            .runner
            .run(&self.pactl, &["get-sink-volume", DEFAULT_SINK])
            .await
            .map_err(|source| MonitorError::Query {
                target: "volume",
                source,
            })?;

        parse_volume(&out)
    }

    /// Mute first, then volume.
    pub async fn status(&self) -> Result<(bool, i32), MonitorError> {
        let muted = self.check_mute().await?;
        let volume = self.check_volume().await?;
        Ok((muted, volume))
    }
}

/// Anything without a literal `yes` counts as unmuted.
pub fn parse_mute(out: &[u8]) -> bool {
    out.windows(3).any(|w| w == b"yes")
}

/// Reads the two bytes right before the first `%` as the volume.
///
/// The window is always two bytes wide: `100%` reads as 0 and a single digit fails.
pub fn parse_volume(out: &[u8]) -> Result<i32, MonitorError> {
    let idx = match out.iter().position(|&b| b == b'%') {
        Some(idx) if idx >= 2 => idx,
        _ => return Err(MonitorError::Parse("cannot find '%'".to_string())),
    };

    let digits = std::str::from_utf8(&out[idx - 2..idx])
        .map_err(|e| MonitorError::Parse(format!("invalid bytes before '%': {}", e)))?;

    digits
        .parse::<i32>()
        .map_err(|e| MonitorError::Parse(format!("{:?}: {}", digits, e)))
}
