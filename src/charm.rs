//! WordPress charm reconciliation logic
//!
//! The charm follows the operator pattern: observe the configuration the
//! host hands it, derive the desired pod spec, and submit the spec through
//! the host runtime exactly when needed. Dispatch is an explicit match
//! over [`Event`] variants; one event is handled to completion at a time.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::CharmConfig;
use crate::event::Event;
use crate::runtime::HostRuntime;
use crate::spec::PodSpec;
use crate::state::CharmState;
use crate::status::UnitStatus;
use crate::Error;

/// Result of handling a single event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The event was handled to completion
    Completed,
    /// The event could not be handled yet; the host should redeliver it
    ///
    /// Redelivery timing belongs entirely to the host's dispatch loop.
    Deferred,
}

/// The WordPress charm reconciler
///
/// Holds the host runtime handle and the unit's explicit state. The caller
/// loads state before dispatch and persists it afterwards; the reconciler
/// only mutates it synchronously within [`WordpressCharm::handle`].
pub struct WordpressCharm {
    runtime: Arc<dyn HostRuntime>,
    state: CharmState,
}

impl WordpressCharm {
    /// Create a charm bound to the given runtime and prior unit state
    pub fn new(runtime: Arc<dyn HostRuntime>, state: CharmState) -> Self {
        Self { runtime, state }
    }

    /// The unit state as of the last handled event
    pub fn state(&self) -> &CharmState {
        &self.state
    }

    /// Consume the charm and return the unit state for persistence
    pub fn into_state(self) -> CharmState {
        self.state
    }

    /// Handle one lifecycle event
    #[instrument(skip(self), fields(event = %event))]
    pub fn handle(&mut self, event: Event) -> Result<Outcome, Error> {
        info!("handling event");
        match event {
            Event::Start => self.on_start(),
            Event::Stop => self.on_stop(),
            Event::ConfigChanged => self.on_config_changed(),
            Event::DbRelationChanged => self.on_db_relation_changed(),
            Event::LeaderElected => self.on_leader_elected(),
            Event::UpdateStatus => self.on_update_status(),
            Event::WordpressReady => self.on_wordpress_ready(),
        }
    }

    fn on_start(&mut self) -> Result<Outcome, Error> {
        if let Some(spec) = self.build_spec()? {
            self.apply_spec(spec)?;
        }
        Ok(Outcome::Completed)
    }

    fn on_stop(&mut self) -> Result<Outcome, Error> {
        info!("unit stopping");
        Ok(Outcome::Completed)
    }

    fn on_config_changed(&mut self) -> Result<Outcome, Error> {
        if let Some(spec) = self.build_spec()? {
            if self.state.spec.as_ref() != Some(&spec) {
                self.apply_spec(spec)?;
            } else {
                debug!("pod spec unchanged, skipping submission");
            }
        }
        self.runtime.set_unit_status(&UnitStatus::Active)?;
        Ok(Outcome::Completed)
    }

    fn on_db_relation_changed(&mut self) -> Result<Outcome, Error> {
        if !self.state.db_ready {
            info!("database relation not ready, deferring event");
            return Ok(Outcome::Deferred);
        }
        Ok(Outcome::Completed)
    }

    fn on_leader_elected(&mut self) -> Result<Outcome, Error> {
        info!("unit elected leader");
        Ok(Outcome::Completed)
    }

    fn on_update_status(&mut self) -> Result<Outcome, Error> {
        // Periodic refresh: rebuild and reapply without a diff check so
        // drift in the external substrate is corrected.
        if let Some(spec) = self.build_spec()? {
            self.apply_spec(spec)?;
        }
        Ok(Outcome::Completed)
    }

    fn on_wordpress_ready(&mut self) -> Result<Outcome, Error> {
        Ok(Outcome::Completed)
    }

    /// Derive the desired pod spec from current configuration
    ///
    /// Returns `Ok(None)` when the configuration is invalid: the unit is
    /// marked blocked with the offending field named and no spec is
    /// produced. Validation failures never propagate as errors; they are
    /// for the operator to fix, not the host to retry.
    fn build_spec(&self) -> Result<Option<PodSpec>, Error> {
        let config = self.runtime.config()?;

        let merged = match config.full_container_config() {
            Ok(merged) => merged,
            Err(Error::ConfigShape(reason)) => {
                warn!(%reason, "rejecting configuration");
                self.runtime.set_unit_status(&UnitStatus::Blocked(reason))?;
                return Ok(None);
            }
            Err(other) => return Err(other),
        };

        let app = self.runtime.app_name()?;
        Ok(Some(PodSpec::single_container(app, config.image, merged)))
    }

    /// Submit the spec if this unit is the elected leader
    ///
    /// Leadership is the distributed mutual-exclusion gate: peer units run
    /// the same handlers but only the leader mutates shared deployment
    /// state. The recorded spec is updated only after the submission
    /// succeeded.
    fn apply_spec(&mut self, spec: PodSpec) -> Result<(), Error> {
        if !self.runtime.is_leader()? {
            debug!("unit is not the leader, skipping spec submission");
            return Ok(());
        }

        info!("unit is the leader, applying pod spec");
        self.runtime.set_pod_spec(&spec)?;
        self.state.spec = Some(spec);
        Ok(())
    }
}

/// Convenience for tests and callers that start from configuration alone:
/// parse, merge, and assemble without touching the runtime.
///
/// This is the pure core of [`WordpressCharm::handle`]'s spec derivation.
pub fn build_pod_spec(app: &str, config: &CharmConfig) -> Result<PodSpec, Error> {
    let merged = config.full_container_config()?;
    Ok(PodSpec::single_container(app, config.image.clone(), merged))
}
