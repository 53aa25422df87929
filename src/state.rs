//! Unit-scoped state carried between handler invocations
//!
//! The original framework hid this behind process-wide stored state; here
//! it is an explicit struct the binary loads before dispatch and saves
//! after, so the handler itself stays free of hidden mutable globals.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::spec::PodSpec;
use crate::Error;

/// State that survives across events within the unit's lifetime
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CharmState {
    /// The last successfully applied pod spec
    ///
    /// Updated only immediately after a successful submission, and only
    /// by the leader unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,

    /// Whether the database relation is ready to be acted on
    ///
    /// Nothing in this charm sets the flag yet; db-relation-changed
    /// defers until something does.
    #[serde(default)]
    pub db_ready: bool,
}

impl CharmState {
    /// Load state from the given file, defaulting when the file is absent
    ///
    /// A missing file is the fresh-unit case, not an error.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::state(format!("cannot read {}: {e}", path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::state(format!("cannot decode {}: {e}", path.display())))
    }

    /// Save state to the given file as JSON
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| Error::serialization(e.to_string()))?;
        std::fs::write(path, bytes)
            .map_err(|e| Error::state(format!("cannot write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerConfig;

    #[test]
    fn fresh_units_start_with_no_applied_spec() {
        let state = CharmState::default();
        assert!(state.spec.is_none());
        assert!(!state.db_ready);
    }

    #[test]
    fn missing_state_file_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = CharmState::load(&dir.path().join("state.json")).unwrap();
        assert_eq!(state, CharmState::default());
    }

    #[test]
    fn state_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut config = ContainerConfig::new();
        config.insert("WORDPRESS_DB_HOST".to_string(), "db".into());
        let state = CharmState {
            spec: Some(PodSpec::single_container("wordpress", "wordpress:latest", config)),
            db_ready: true,
        };

        state.save(&path).unwrap();
        let loaded = CharmState::load(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn corrupt_state_file_is_a_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = CharmState::load(&path).unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert!(err.to_string().contains("state.json"));
    }
}
