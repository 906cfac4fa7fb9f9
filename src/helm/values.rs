use crate::addon::{
    resolve, ObjectKey, ADDON_DEPLOYMENT_CONFIG_RESOURCE, ADDON_GROUP, CLF_GROUP, CLF_RESOURCE,
    OTEL_COLLECTORS_RESOURCE, OTEL_GROUP,
};
use crate::helm::options::{is_hub_cluster, Options};
use crate::k8s::client::ObjectFetcher;
use crate::k8s::types::{ManagedCluster, ManagedClusterAddOn};
use crate::otel::{
    configure_volume_mounts, configure_volumes, match_exporter_secrets, SecretsProvider, TargetSecret,
};
use crate::{AddonError, Result};
use k8s_openapi::ByteString;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmChartValues {
    pub enabled: bool,
    pub logging: LoggingValues,
    pub tracing: TracingValues,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingValues {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub clf_spec: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TracingValues {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub otel_col_spec: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<SecretValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SecretValue {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub data: BTreeMap<String, ByteString>,
}

impl From<TargetSecret> for SecretValue {
    fn from(ts: TargetSecret) -> Self {
        Self {
            name: ts.secret.name_any(),
            target: ts.target.to_string(),
            data: ts.secret.data.unwrap_or_default(),
        }
    }
}

fn config_key(addon: &ManagedClusterAddOn, group: &str, resource: &str) -> Result<ObjectKey> {
    let refs = addon
        .status
        .as_ref()
        .map(|s| s.config_references.as_slice())
        .unwrap_or_default();

    let key = resolve(refs, group, resource);
    if key.is_empty() {
        return Err(AddonError::Config(format!(
            "addon {}/{} has no {}.{} config reference",
            addon.namespace().unwrap_or_default(),
            addon.name_any(),
            resource,
            group
        )));
    }
    Ok(key)
}

/// Values for one managed cluster's addon installation. The hub itself gets
/// the all-disabled default.
pub async fn build_values(
    fetcher: &dyn ObjectFetcher,
    secrets: &dyn SecretsProvider,
    cluster: &ManagedCluster,
    addon: &ManagedClusterAddOn,
) -> Result<HelmChartValues> {
    if is_hub_cluster(cluster) {
        debug!("Cluster {} is the hub, skipping addon values", cluster.name_any());
        return Ok(HelmChartValues::default());
    }

    let adc_key = config_key(addon, ADDON_GROUP, ADDON_DEPLOYMENT_CONFIG_RESOURCE)?;
    let adc = fetcher.deployment_config(&adc_key).await?;
    let opts = Options::from_deployment_config(Some(&adc))?;

    let mut values = HelmChartValues {
        enabled: true,
        ..Default::default()
    };

    if !opts.logging_disabled {
        info!("Logging enabled");
        values.logging = build_logging_values(fetcher, addon).await?;
    }

    if !opts.tracing_disabled {
        info!("Tracing enabled");
        values.tracing = build_tracing_values(fetcher, secrets, addon).await?;
    }

    Ok(values)
}

async fn build_logging_values(
    fetcher: &dyn ObjectFetcher,
    addon: &ManagedClusterAddOn,
) -> Result<LoggingValues> {
    let key = config_key(addon, CLF_GROUP, CLF_RESOURCE)?;
    let clf = fetcher.forwarder(&key).await?;

    Ok(LoggingValues {
        enabled: true,
        clf_spec: serde_json::to_string(&clf.spec)?,
    })
}

async fn build_tracing_values(
    fetcher: &dyn ObjectFetcher,
    secrets: &dyn SecretsProvider,
    addon: &ManagedClusterAddOn,
) -> Result<TracingValues> {
    info!("Retrieving OpenTelemetry Collector template");
    let key = config_key(addon, OTEL_GROUP, OTEL_COLLECTORS_RESOURCE)?;
    let collector = fetcher.collector(&key).await?;
    info!("OpenTelemetry Collector template found");

    let matched = match_exporter_secrets(&collector.spec)?;
    for warning in &matched.warnings {
        warn!("{}", warning);
    }
    for (target, secret) in &matched.secrets {
        info!("exporter {} uses secret {}", target, secret);
    }

    let collector_name = collector.name_any();
    let namespace = collector.namespace().unwrap_or(key.namespace);
    let resolved = secrets.materialize(&namespace, &matched.secrets).await?;

    let mut spec = collector.spec;
    for ts in &resolved {
        let name = ts.secret.name_any();
        if !configure_volumes(&mut spec, &name) {
            debug!("volume {} already in {} collector", name, collector_name);
        }
        if !configure_volume_mounts(&mut spec, &name) {
            debug!("volume mount {} already in {} collector", name, collector_name);
        }
    }

    Ok(TracingValues {
        enabled: true,
        cluster_name: addon.namespace().unwrap_or_default(),
        otel_col_spec: serde_json::to_string(&spec)?,
        secrets: resolved.into_iter().map(SecretValue::from).collect(),
    })
}
