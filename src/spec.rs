//! Pod specification types submitted to the workload API
//!
//! These model the JSON-like document the host runtime's workload-spec
//! setter accepts: one container with a name, an image reference, a fixed
//! HTTP port declaration, and the merged container configuration.

use serde::{Deserialize, Serialize};

use crate::config::ContainerConfig;

/// Port the WordPress container listens on
pub const HTTP_PORT: u16 = 80;

/// Declarative description of the pod the orchestration API should run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PodSpec {
    /// Container descriptors; this charm always produces exactly one
    pub containers: Vec<Container>,
}

/// A single container descriptor within a [`PodSpec`]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Container {
    /// Container name; the charm uses the application name
    pub name: String,
    /// Container image reference
    pub image: String,
    /// Declared ports
    pub ports: Vec<ContainerPort>,
    /// Environment-style configuration handed to the container
    pub config: ContainerConfig,
}

/// A declared container port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port name
    pub name: String,
    /// Port number inside the container
    pub container_port: u16,
    /// Transport protocol
    pub protocol: String,
}

impl ContainerPort {
    /// The fixed HTTP port declaration every produced spec carries
    pub fn http() -> Self {
        Self {
            name: "http".to_string(),
            container_port: HTTP_PORT,
            protocol: "TCP".to_string(),
        }
    }
}

impl PodSpec {
    /// Build the spec for a single-container application
    pub fn single_container(
        name: impl Into<String>,
        image: impl Into<String>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            containers: vec![Container {
                name: name.into(),
                image: image.into(),
                ports: vec![ContainerPort::http()],
                config,
            }],
        }
    }

    /// Render the spec as the YAML document the workload-spec setter takes
    pub fn to_yaml(&self) -> Result<String, crate::Error> {
        serde_yaml::to_string(self).map_err(|e| crate::Error::serialization(e.to_string()))
    }
}
