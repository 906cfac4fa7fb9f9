use crate::addon::{ADC_LOGGING_DISABLED_KEY, ADC_TRACING_DISABLED_KEY};
use crate::k8s::types::{AddOnDeploymentConfig, ManagedCluster};
use crate::{AddonError, Result};
use kube::ResourceExt;

const LOCAL_CLUSTER_LABEL: &str = "local-cluster";

/// Per-cluster switches read from the `AddOnDeploymentConfig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub logging_disabled: bool,
    pub tracing_disabled: bool,
}

impl Options {
    /// Unknown variables are ignored. A known variable with a value that is
    /// not a boolean is an error.
    pub fn from_deployment_config(config: Option<&AddOnDeploymentConfig>) -> Result<Self> {
        let mut opts = Options::default();
        let Some(config) = config else {
            return Ok(opts);
        };

        for var in &config.spec.customized_variables {
            let slot = match var.name.as_str() {
                ADC_LOGGING_DISABLED_KEY => &mut opts.logging_disabled,
                ADC_TRACING_DISABLED_KEY => &mut opts.tracing_disabled,
                _ => continue,
            };
            *slot = parse_bool(&var.value).ok_or_else(|| AddonError::InvalidVariable {
                key: var.name.clone(),
                value: var.value.clone(),
            })?;
        }

        Ok(opts)
    }
}

/// Accepts the same spellings as the addon framework's configuration values.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// The hub registers itself as a managed cluster labelled
/// `local-cluster=true`; nothing is installed there.
pub fn is_hub_cluster(cluster: &ManagedCluster) -> bool {
    cluster
        .labels()
        .get(LOCAL_CLUSTER_LABEL)
        .is_some_and(|v| v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::types::{AddOnDeploymentConfigSpec, CustomizedVariable, ManagedClusterSpec};

    fn adc(vars: &[(&str, &str)]) -> AddOnDeploymentConfig {
        AddOnDeploymentConfig::new(
            "mcoa",
            AddOnDeploymentConfigSpec {
                customized_variables: vars
                    .iter()
                    .map(|(name, value)| CustomizedVariable {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            },
        )
    }

    #[test]
    fn test_defaults_without_config() {
        assert_eq!(Options::from_deployment_config(None).unwrap(), Options::default());
    }

    #[test]
    fn test_disabled_flags() {
        let config = adc(&[
            ("loggingDisabled", "true"),
            ("tracingDisabled", "0"),
            ("somethingElse", "not-a-bool"),
        ]);
        let opts = Options::from_deployment_config(Some(&config)).unwrap();
        assert!(opts.logging_disabled);
        assert!(!opts.tracing_disabled);
    }

    #[test]
    fn test_invalid_boolean() {
        let config = adc(&[("tracingDisabled", "yes")]);
        let err = Options::from_deployment_config(Some(&config)).unwrap_err();
        assert!(matches!(err, AddonError::InvalidVariable { ref key, .. } if key == "tracingDisabled"));
    }

    #[test]
    fn test_hub_cluster_label() {
        let mut cluster = ManagedCluster::new("local-cluster", ManagedClusterSpec::default());
        assert!(!is_hub_cluster(&cluster));

        cluster
            .labels_mut()
            .insert("local-cluster".to_string(), "false".to_string());
        assert!(!is_hub_cluster(&cluster));

        cluster
            .labels_mut()
            .insert("local-cluster".to_string(), "true".to_string());
        assert!(is_hub_cluster(&cluster));
    }
}
