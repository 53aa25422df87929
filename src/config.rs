//! Charm configuration supplied by the host runtime
//!
//! The host hands the charm a flat key/value mapping on every
//! config-changed event. Two of the keys are free-form YAML documents that
//! must parse to string-keyed mappings before they can be folded into the
//! container specification.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::Error;

/// A parsed container configuration mapping
///
/// Keys are environment-style names; values are whatever the operator put
/// in the YAML document. `BTreeMap` keeps the serialized form stable so
/// structural spec comparison is deterministic.
pub type ContainerConfig = BTreeMap<String, serde_json::Value>;

/// Configuration keys consumed by this charm
///
/// All keys are externally supplied; missing keys behave as empty strings
/// so a fresh deployment with no overrides is valid.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CharmConfig {
    /// Container image reference to deploy
    #[serde(default)]
    pub image: String,

    /// YAML document of plain container configuration, or empty
    #[serde(default)]
    pub container_config: String,

    /// YAML document of secret container configuration, or empty
    ///
    /// Secrets are kept out of logs; they are only ever merged into the
    /// spec document handed to the workload API.
    #[serde(default)]
    pub container_secrets: String,
}

impl CharmConfig {
    /// Parse `container_config` without secrets
    ///
    /// Empty or whitespace-only text yields an empty mapping. Anything
    /// else must be a string-keyed YAML mapping.
    pub fn sanitized_container_config(&self) -> Result<ContainerConfig, Error> {
        parse_yaml_mapping(&self.container_config, "container_config")
    }

    /// Parse both YAML documents and overlay secrets onto the plain config
    ///
    /// Secret keys win on collision.
    pub fn full_container_config(&self) -> Result<ContainerConfig, Error> {
        let mut config = self.sanitized_container_config()?;
        let secrets = parse_yaml_mapping(&self.container_secrets, "container_secrets")?;
        config.extend(secrets);
        Ok(config)
    }
}

/// Parse a YAML document into a string-keyed mapping
///
/// Malformed YAML and well-formed YAML of the wrong shape are deliberately
/// the same failure: both block deployment with the same operator-facing
/// message, naming the offending config field.
fn parse_yaml_mapping(text: &str, field: &str) -> Result<ContainerConfig, Error> {
    if text.trim().is_empty() {
        return Ok(ContainerConfig::new());
    }
    serde_yaml::from_str(text)
        .map_err(|_| Error::config_shape(format!("{field} is not a YAML mapping")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(container_config: &str, container_secrets: &str) -> CharmConfig {
        CharmConfig {
            image: "wordpress:latest".to_string(),
            container_config: container_config.to_string(),
            container_secrets: container_secrets.to_string(),
        }
    }

    #[test]
    fn empty_documents_yield_an_empty_mapping() {
        let cfg = config("", "");
        assert!(cfg.sanitized_container_config().unwrap().is_empty());
        assert!(cfg.full_container_config().unwrap().is_empty());

        // Whitespace-only counts as empty too.
        let cfg = config("   \n\t", "\n");
        assert!(cfg.full_container_config().unwrap().is_empty());
    }

    #[test]
    fn missing_keys_deserialize_to_empty_strings() {
        let cfg: CharmConfig = serde_json::from_str(r#"{"image": "wordpress:latest"}"#).unwrap();
        assert_eq!(cfg.image, "wordpress:latest");
        assert_eq!(cfg.container_config, "");
        assert_eq!(cfg.container_secrets, "");
    }

    #[test]
    fn secrets_overlay_and_win_on_collision() {
        let cfg = config(
            "{WORDPRESS_DB_HOST: db, WORDPRESS_DEBUG: 'false'}",
            "{WORDPRESS_DEBUG: 'true', WORDPRESS_DB_PASSWORD: secret}",
        );
        let merged = cfg.full_container_config().unwrap();
        assert_eq!(merged["WORDPRESS_DB_HOST"], "db");
        assert_eq!(merged["WORDPRESS_DB_PASSWORD"], "secret");
        // Secret value shadows the plain one.
        assert_eq!(merged["WORDPRESS_DEBUG"], "true");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn sanitized_config_never_sees_secrets() {
        let cfg = config(
            "{WORDPRESS_DB_HOST: db}",
            "{WORDPRESS_DB_PASSWORD: secret}",
        );
        let sanitized = cfg.sanitized_container_config().unwrap();
        assert_eq!(sanitized.len(), 1);
        assert!(!sanitized.contains_key("WORDPRESS_DB_PASSWORD"));
    }

    #[test]
    fn yaml_list_is_rejected_with_field_name_in_reason() {
        let cfg = config("- 1\n- 2", "");
        let err = cfg.full_container_config().unwrap_err();
        match err {
            Error::ConfigShape(reason) => {
                assert_eq!(reason, "container_config is not a YAML mapping");
            }
            other => panic!("expected ConfigShape, got {other:?}"),
        }
    }

    #[test]
    fn secrets_shape_failures_name_the_secrets_field() {
        let cfg = config("{WORDPRESS_DB_HOST: db}", "just a string");
        let err = cfg.full_container_config().unwrap_err();
        match err {
            Error::ConfigShape(reason) => {
                assert_eq!(reason, "container_secrets is not a YAML mapping");
            }
            other => panic!("expected ConfigShape, got {other:?}"),
        }
    }

    #[test]
    fn malformed_yaml_is_the_same_failure_as_wrong_shape() {
        // Unparseable text must not escape as a raw parse error; the
        // operator sees the same blocked reason either way.
        let cfg = config("{unclosed: [", "");
        let err = cfg.full_container_config().unwrap_err();
        match err {
            Error::ConfigShape(reason) => {
                assert_eq!(reason, "container_config is not a YAML mapping");
            }
            other => panic!("expected ConfigShape, got {other:?}"),
        }
    }

    #[test]
    fn non_string_keys_are_a_shape_failure() {
        let cfg = config("{1: one}", "");
        assert!(matches!(
            cfg.full_container_config(),
            Err(Error::ConfigShape(_))
        ));
    }

    #[test]
    fn scalar_values_survive_with_their_yaml_types() {
        let cfg = config("{WORDPRESS_DB_PORT: 3306, WORDPRESS_DEBUG: true}", "");
        let merged = cfg.full_container_config().unwrap();
        assert_eq!(merged["WORDPRESS_DB_PORT"], 3306);
        assert_eq!(merged["WORDPRESS_DEBUG"], true);
    }
}
