use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    New,
    Change,
    Remove,
    Other,
}

impl EventKind {
    fn from_name(name: &str) -> Self {
        match name {
            "new" => EventKind::New,
            "change" => EventKind::Change,
            "remove" => EventKind::Remove,
            _ => EventKind::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facility {
    Sink,
    Source,
    SinkInput,
    SourceOutput,
    Module,
    Client,
    SampleCache,
    Server,
    Card,
    Other,
}

impl Facility {
    fn from_name(name: &str) -> Self {
        match name {
            "sink" => Facility::Sink,
            "source" => Facility::Source,
            "sink-input" => Facility::SinkInput,
            "source-output" => Facility::SourceOutput,
            "module" => Facility::Module,
            "client" => Facility::Client,
            "sample-cache" => Facility::SampleCache,
            "server" => Facility::Server,
            "card" => Facility::Card,
            _ => Facility::Other,
        }
    }
}

/// One `pactl subscribe` line, e.g. `Event 'change' on sink #0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub facility: Facility,
    pub index: Option<u32>,
}

impl Event {
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("Event '")?;
        let (kind, rest) = rest.split_once('\'')?;
        let target = rest.strip_prefix(" on ")?;

        let (facility, index) = match target.split_once(" #") {
            Some((facility, index)) => (facility, index.parse().ok()),
            None => (target, None),
        };

        Some(Self {
            kind: EventKind::from_name(kind),
            facility: Facility::from_name(facility),
            index,
        })
    }

    /// A change on a sink, or on the server (which covers a new default sink).
    pub fn is_sink_change(&self) -> bool {
        self.kind == EventKind::Change && matches!(self.facility, Facility::Sink | Facility::Server)
    }
}

/// Decides which subscription lines trigger a re-query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventFilter {
    /// Any line containing `change`, whatever the device or event.
    #[default]
    Change,
    /// Only parsed `change` events on a sink or the server.
    Sink,
}

impl EventFilter {
    pub const TOKEN: &'static [u8] = b"change";

    pub fn matches(&self, line: &[u8]) -> bool {
        match self {
            EventFilter::Change => line.windows(Self::TOKEN.len()).any(|w| w == Self::TOKEN),
            EventFilter::Sink => std::str::from_utf8(line)
                .ok()
                .and_then(Event::parse)
                .is_some_and(|event| event.is_sink_change()),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::Change => f.write_str("change"),
            EventFilter::Sink => f.write_str("sink"),
        }
    }
}
