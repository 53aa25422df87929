//! Lifecycle events delivered by the host runtime
//!
//! The host dispatcher invokes the charm once per event and identifies the
//! event by hook name. Observer registration in the original framework is
//! replaced here by an explicit match over [`Event`] variants.

use crate::Error;

/// A lifecycle event the charm reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// The unit is starting
    Start,
    /// The unit is stopping
    Stop,
    /// Configuration has (possibly) changed
    ConfigChanged,
    /// Data on the database relation changed
    DbRelationChanged,
    /// This unit has been elected leader
    LeaderElected,
    /// Periodic status refresh triggered by the host
    UpdateStatus,
    /// Custom event signalling the workload is ready
    WordpressReady,
}

impl Event {
    /// Hook name the host dispatcher uses for this event
    pub fn hook_name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::ConfigChanged => "config-changed",
            Self::DbRelationChanged => "db-relation-changed",
            Self::LeaderElected => "leader-elected",
            Self::UpdateStatus => "update-status",
            Self::WordpressReady => "wordpress-ready",
        }
    }
}

impl std::str::FromStr for Event {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "config-changed" => Ok(Self::ConfigChanged),
            "db-relation-changed" => Ok(Self::DbRelationChanged),
            "leader-elected" => Ok(Self::LeaderElected),
            "update-status" => Ok(Self::UpdateStatus),
            "wordpress-ready" => Ok(Self::WordpressReady),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hook_name())
    }
}
