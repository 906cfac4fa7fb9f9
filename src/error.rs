use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddonError {
    #[error("Kubernetes error: {0}")]
    Kubernetes(String),

    #[error("{kind} not found: {name} in namespace {namespace}")]
    NotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value {value:?} for customized variable {key}")]
    InvalidVariable { key: String, value: String },

    #[error("Exporter secret resolution failed: {0}")]
    Match(#[from] MatchError),

    #[error("Health check failed: {0}")]
    Health(#[from] HealthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Fatal conditions of the exporter/secret matcher. Any of these aborts the
/// resolution for the collector; no partial map is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("no exporters found")]
    NoExportersConfigured,

    #[error("no volumemount found for secret {secret}")]
    NoVolumeMountForSecret { secret: String },
}

/// Health verdict failures. The rendered messages embed the resource
/// namespace/name and the observed value; operators read them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthError {
    #[error("no values are probed for {namespace}/{name}")]
    NoValuesProbed { namespace: String, name: String },

    #[error("replicas is not probed")]
    ReplicasNotProbed,

    #[error("replicas is {replicas} for {namespace}/{name}")]
    ReplicasBelowMinimum {
        replicas: i64,
        namespace: String,
        name: String,
    },

    #[error("status condition type is not probed")]
    ConditionTypeNotProbed,

    #[error("status condition type is {observed} for {namespace}/{name}")]
    ConditionNotReady {
        observed: String,
        namespace: String,
        name: String,
    },

    #[error("{field} has an unexpected value type for {namespace}/{name}")]
    UnexpectedValueType {
        field: String,
        namespace: String,
        name: String,
    },
}

impl From<kube::Error> for AddonError {
    fn from(e: kube::Error) -> Self {
        AddonError::Kubernetes(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AddonError>;
