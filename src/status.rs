//! Unit status reported to the host runtime

/// Workload status for this unit, as understood by the host runtime
///
/// Only the two states this charm actually reports are modelled. A blocked
/// unit requires operator intervention (fixing the charm configuration)
/// before the next config-changed event can succeed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    /// The unit is operating normally
    Active,
    /// The unit cannot proceed until an operator fixes the given problem
    Blocked(String),
}

impl UnitStatus {
    /// Create a blocked status with the given reason
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::Blocked(reason.into())
    }

    /// Status name on the host runtime's wire (`status-set <name>`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked(_) => "blocked",
        }
    }

    /// Human-readable message accompanying the status, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Active => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Blocked(reason) => write!(f, "blocked: {reason}"),
        }
    }
}
