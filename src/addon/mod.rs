//! Addon-level plumbing shared by the logging and tracing sides: well-known
//! resource names, config reference resolution and agent health checks.

pub mod config_ref;
pub mod health;

pub use config_ref::{resolve, ConfigReference, ObjectKey};
pub use health::{evaluate, FeedbackValue, FieldValue, HealthProber, ResourceIdentifier, ResourceKind};

pub const ADDON_NAME: &str = "multicluster-observability-addon";

pub const ADDON_GROUP: &str = "addon.open-cluster-management.io";
pub const ADDON_DEPLOYMENT_CONFIG_RESOURCE: &str = "addondeploymentconfigs";

pub const CLF_GROUP: &str = "logging.openshift.io";
pub const CLF_RESOURCE: &str = "clusterlogforwarders";
pub const CLF_NAME: &str = "instance";
pub const CLUSTER_LOGGING_NS: &str = "openshift-logging";

pub const OTEL_GROUP: &str = "opentelemetry.io";
pub const OTEL_COLLECTORS_RESOURCE: &str = "opentelemetrycollectors";
pub const COLLECTOR_NAME: &str = "spoke-otelcol";
pub const COLLECTOR_NS: &str = "spoke-otelcol";

/// `AddOnDeploymentConfig` customized variable keys.
pub const ADC_LOGGING_DISABLED_KEY: &str = "loggingDisabled";
pub const ADC_TRACING_DISABLED_KEY: &str = "tracingDisabled";
