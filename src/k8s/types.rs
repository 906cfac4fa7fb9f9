//! Custom resources the addon reads from the hub cluster.
//!
//! Only the fields the addon actually consumes are typed; everything else is
//! carried through as loosely-typed JSON so round-tripping a fetched object
//! does not drop configuration.

use k8s_openapi::api::core::v1::{Volume, VolumeMount};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::addon::config_ref::ConfigReference;

/// An explicit `null` (a bare `key:` in YAML) reads as the empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-cluster installation of the addon. Lives in the managed cluster's
/// namespace on the hub.
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize)]
#[kube(
    group = "addon.open-cluster-management.io",
    version = "v1alpha1",
    kind = "ManagedClusterAddOn",
    namespaced,
    status = "ManagedClusterAddOnStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterAddOnSpec {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterAddOnStatus {
    #[serde(default)]
    pub config_references: Vec<ConfigReference>,
}

#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1",
    kind = "ManagedCluster",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterSpec {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize)]
#[kube(
    group = "addon.open-cluster-management.io",
    version = "v1alpha1",
    kind = "AddOnDeploymentConfig",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct AddOnDeploymentConfigSpec {
    #[serde(default)]
    pub customized_variables: Vec<CustomizedVariable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomizedVariable {
    pub name: String,
    pub value: String,
}

/// OpenTelemetry collector template. The addon reads its volumes, volume
/// mounts and exporter configuration and forwards the rest untouched.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[kube(
    group = "opentelemetry.io",
    version = "v1beta1",
    kind = "OpenTelemetryCollector",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CollectorSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub config: CollectorConfig,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Collector pipeline configuration.
///
/// Exporters are kept in a `BTreeMap`, so scans over them visit names in
/// lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CollectorConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub exporters: BTreeMap<String, Value>,

    #[serde(flatten)]
    pub sections: BTreeMap<String, Value>,
}

#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize)]
#[kube(
    group = "logging.openshift.io",
    version = "v1",
    kind = "ClusterLogForwarder",
    namespaced,
    status = "ClusterLogForwarderStatus",
    schema = "disabled"
)]
pub struct ClusterLogForwarderSpec {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClusterLogForwarderStatus {
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
