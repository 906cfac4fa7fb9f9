//! Turning an exporter/secret mapping into concrete secret objects.
//!
//! Generating certificate material is someone else's job; this module only
//! defines the seam and a provider that reads already-existing secrets.

use crate::otel::exporters::{ExporterSecretMap, Target};
use crate::{AddonError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, ResourceExt};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TargetSecret {
    pub target: Target,
    pub secret: Secret,
}

#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// Resolves every entry of `targets` to a secret in `namespace`.
    async fn materialize(&self, namespace: &str, targets: &ExporterSecretMap) -> Result<Vec<TargetSecret>>;
}

/// Reads the named secrets from the hub cluster.
pub struct KubeSecretsProvider {
    client: Client,
}

impl KubeSecretsProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretsProvider for KubeSecretsProvider {
    async fn materialize(&self, namespace: &str, targets: &ExporterSecretMap) -> Result<Vec<TargetSecret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let mut secrets = Vec::with_capacity(targets.len());

        for (target, name) in targets {
            debug!("Fetching secret {}/{} for exporter {}", namespace, name, target);
            let secret = api.get(name).await.map_err(|e| match e {
                kube::Error::Api(ref ae) if ae.code == 404 => AddonError::NotFound {
                    kind: "Secret".to_string(),
                    name: name.clone(),
                    namespace: namespace.to_string(),
                },
                other => AddonError::Kubernetes(format!(
                    "Failed to get secret {}/{}: {}",
                    namespace, name, other
                )),
            })?;
            secrets.push(TargetSecret {
                target: target.clone(),
                secret,
            });
        }

        Ok(secrets)
    }
}

/// Provider over secrets loaded up front.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretsProvider {
    secrets: Vec<Secret>,
}

impl StaticSecretsProvider {
    pub fn new(secrets: Vec<Secret>) -> Self {
        Self { secrets }
    }
}

#[async_trait]
impl SecretsProvider for StaticSecretsProvider {
    async fn materialize(&self, namespace: &str, targets: &ExporterSecretMap) -> Result<Vec<TargetSecret>> {
        targets
            .iter()
            .map(|(target, name)| {
                self.secrets
                    .iter()
                    .find(|s| &s.name_any() == name && s.namespace().as_deref() == Some(namespace))
                    .map(|secret| TargetSecret {
                        target: target.clone(),
                        secret: secret.clone(),
                    })
                    .ok_or_else(|| AddonError::NotFound {
                        kind: "Secret".to_string(),
                        name: name.clone(),
                        namespace: namespace.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;

    fn secret(name: &str, namespace: &str) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_static_provider_resolves_targets() {
        let provider = StaticSecretsProvider::new(vec![
            secret("secret-a", "spoke-otelcol"),
            secret("secret-a", "elsewhere"),
        ]);
        let targets = ExporterSecretMap::from([(Target::from("otlphttp"), "secret-a".to_string())]);

        let resolved = provider.materialize("spoke-otelcol", &targets).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].target, Target::from("otlphttp"));
        assert_eq!(resolved[0].secret.namespace().as_deref(), Some("spoke-otelcol"));
    }

    #[tokio::test]
    async fn test_static_provider_missing_secret() {
        let provider = StaticSecretsProvider::default();
        let targets = ExporterSecretMap::from([(Target::from("otlp"), "absent".to_string())]);

        let err = provider.materialize("spoke-otelcol", &targets).await.unwrap_err();
        assert!(matches!(err, AddonError::NotFound { ref name, .. } if name == "absent"));
    }
}
