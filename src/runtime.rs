//! Host runtime callbacks consumed by the charm
//!
//! The charm never talks to the orchestration substrate directly. Every
//! interaction goes through the [`HostRuntime`] trait so the reconciler
//! can be exercised in tests against a mock, while production uses the
//! host's hook tools.

use std::io::Write;
use std::process::{Command, Stdio};

#[cfg(test)]
use mockall::automock;

use crate::config::CharmConfig;
use crate::spec::PodSpec;
use crate::status::UnitStatus;
use crate::Error;

/// Trait abstracting the host runtime operations the charm consumes
///
/// This allows mocking the host in tests while using the real hook tools
/// in production.
#[cfg_attr(test, automock)]
pub trait HostRuntime: Send + Sync {
    /// Fetch the current charm configuration
    fn config(&self) -> Result<CharmConfig, Error>;

    /// Name of the application this unit belongs to
    fn app_name(&self) -> Result<String, Error>;

    /// Whether this unit is the elected leader
    fn is_leader(&self) -> Result<bool, Error>;

    /// Report the unit's workload status
    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), Error>;

    /// Submit the pod spec to the workload API
    ///
    /// Not idempotent at the API layer; callers diff against the last
    /// applied spec where redundant submission matters.
    fn set_pod_spec(&self, spec: &PodSpec) -> Result<(), Error>;
}

/// Production [`HostRuntime`] backed by the host's hook tools
///
/// Each operation shells out to the corresponding tool (`config-get`,
/// `is-leader`, `status-set`, `pod-spec-set`); the application name comes
/// from the unit name the dispatcher places in the environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct HookRuntime;

impl HookRuntime {
    /// Create a new hook-tool backed runtime
    pub fn new() -> Self {
        Self
    }
}

impl HostRuntime for HookRuntime {
    fn config(&self) -> Result<CharmConfig, Error> {
        let stdout = run_hook_tool("config-get", &["--format=json"])?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::hook(format!("config-get produced undecodable output: {e}")))
    }

    fn app_name(&self) -> Result<String, Error> {
        let unit = std::env::var("JUJU_UNIT_NAME")
            .map_err(|_| Error::hook("JUJU_UNIT_NAME is not set"))?;
        app_from_unit(&unit)
    }

    fn is_leader(&self) -> Result<bool, Error> {
        let stdout = run_hook_tool("is-leader", &["--format=json"])?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::hook(format!("is-leader produced undecodable output: {e}")))
    }

    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), Error> {
        let args = status_args(status);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_hook_tool("status-set", &args)?;
        Ok(())
    }

    fn set_pod_spec(&self, spec: &PodSpec) -> Result<(), Error> {
        run_hook_tool_with_stdin("pod-spec-set", &[], spec.to_yaml()?.as_bytes())?;
        Ok(())
    }
}

/// Derive the application name from a `<app>/<n>` unit name
fn app_from_unit(unit: &str) -> Result<String, Error> {
    match unit.split_once('/') {
        Some((app, _)) if !app.is_empty() => Ok(app.to_string()),
        _ => Err(Error::hook(format!("malformed unit name: {unit}"))),
    }
}

/// Arguments passed to `status-set` for the given status
fn status_args(status: &UnitStatus) -> Vec<String> {
    let mut args = vec![status.name().to_string()];
    if let Some(message) = status.message() {
        args.push(message.to_string());
    }
    args
}

/// Run a hook tool and return its stdout
fn run_hook_tool(tool: &str, args: &[&str]) -> Result<Vec<u8>, Error> {
    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| Error::hook(format!("failed to run {tool}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::hook(format!("{tool} failed: {}", stderr.trim())));
    }

    Ok(output.stdout)
}

/// Run a hook tool with a document piped to its stdin
fn run_hook_tool_with_stdin(tool: &str, args: &[&str], input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::hook(format!("failed to run {tool}: {e}")))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(input)
            .map_err(|e| Error::hook(format!("failed to write to {tool}: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| Error::hook(format!("failed to wait for {tool}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::hook(format!("{tool} failed: {}", stderr.trim())));
    }

    Ok(output.stdout)
}
