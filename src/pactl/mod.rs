pub mod event;
pub mod query;
pub mod runner;
pub mod subscription;

pub use event::{Event, EventFilter, EventKind, Facility};
pub use query::{parse_mute, parse_volume, StateQuery};
pub use runner::{CommandRunner, SystemRunner};
pub use subscription::Subscription;

pub const DEFAULT_PACTL: &str = "/usr/bin/pactl";
pub const DEFAULT_SINK: &str = "@DEFAULT_SINK@";
