//! WordPress charm entry point
//!
//! The host dispatch loop invokes this binary once per event, identifying
//! the event through the hook environment. There is no CLI surface of its
//! own: everything the charm needs arrives via environment variables and
//! hook tools.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wordpress_charm::charm::Outcome;
use wordpress_charm::runtime::HookRuntime;
use wordpress_charm::state::CharmState;
use wordpress_charm::{Event, WordpressCharm};

fn init_logger() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(tracing::metadata::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

/// Resolve the event being dispatched from the hook environment
///
/// `JUJU_HOOK_NAME` carries the hook name directly; older dispatchers only
/// set `JUJU_DISPATCH_PATH` (e.g. `hooks/config-changed`), so fall back to
/// its basename.
fn dispatched_event() -> anyhow::Result<Event> {
    let name = std::env::var("JUJU_HOOK_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            let path = std::env::var("JUJU_DISPATCH_PATH").ok()?;
            Some(
                PathBuf::from(path)
                    .file_name()?
                    .to_string_lossy()
                    .into_owned(),
            )
        })
        .context("neither JUJU_HOOK_NAME nor JUJU_DISPATCH_PATH is set")?;

    Ok(name.parse()?)
}

/// Where the unit's state file lives
///
/// `CHARM_STATE_PATH` overrides; otherwise the file sits in the charm
/// directory the dispatcher runs us from.
fn state_path() -> PathBuf {
    if let Ok(path) = std::env::var("CHARM_STATE_PATH") {
        return PathBuf::from(path);
    }
    let charm_dir = std::env::var("JUJU_CHARM_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(charm_dir).join(".unit-state.json")
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let event = dispatched_event()?;
    let state_path = state_path();
    let state = CharmState::load(&state_path)?;

    let mut charm = WordpressCharm::new(Arc::new(HookRuntime::new()), state);
    let outcome = charm.handle(event)?;
    charm.state().save(&state_path)?;

    match outcome {
        Outcome::Completed => info!(%event, "event handled"),
        Outcome::Deferred => info!(%event, "event deferred, awaiting redelivery"),
    }

    Ok(())
}
