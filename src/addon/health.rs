//! Agent health evaluation.
//!
//! The work agent on each spoke cluster scrapes a handful of fields from the
//! deployed collector and log forwarder and reports them back as typed
//! feedback values. [`evaluate`] folds those samples into a single verdict for
//! one resource. Which field is inspected, and what counts as healthy, is
//! decided by the resource kind through a static rule table.

use crate::addon::{
    CLF_GROUP, CLF_NAME, CLF_RESOURCE, CLUSTER_LOGGING_NS, COLLECTOR_NAME, COLLECTOR_NS,
    OTEL_COLLECTORS_RESOURCE, OTEL_GROUP,
};
use crate::error::HealthError;
use crate::k8s::types::ClusterLogForwarder;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const READY_CONDITION: &str = "Ready";

/// Remote resource under health observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ResourceIdentifier {
    #[serde(default)]
    pub group: String,
    pub resource: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl ResourceIdentifier {
    pub fn new(
        group: impl Into<String>,
        resource: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn collector() -> Self {
        Self::new(OTEL_GROUP, OTEL_COLLECTORS_RESOURCE, COLLECTOR_NAME, COLLECTOR_NS)
    }

    pub fn forwarder() -> Self {
        Self::new(CLF_GROUP, CLF_RESOURCE, CLF_NAME, CLUSTER_LOGGING_NS)
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A scraped scalar. Exactly one kind is populated, mirroring the type of
/// the resource field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum FieldValue {
    Integer {
        integer: i64,
    },
    String {
        string: String,
    },
    Boolean {
        boolean: bool,
    },
    JsonRaw {
        #[serde(rename = "jsonRaw")]
        json_raw: String,
    },
}

impl FieldValue {
    pub fn integer(value: i64) -> Self {
        FieldValue::Integer { integer: value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::String {
            string: value.into(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer { integer } => Some(*integer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String { string } => Some(string),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedbackValue {
    pub name: String,
    #[serde(rename = "fieldValue")]
    pub value: FieldValue,
}

impl FeedbackValue {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One observation of a resource's status feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusFeedbackResult {
    #[serde(default)]
    pub values: Vec<FeedbackValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Collector,
    Forwarder,
}

impl ResourceKind {
    /// Log forwarders are recognised by resource name; every other resource
    /// is checked as a collector.
    pub fn from_identifier(identifier: &ResourceIdentifier) -> Self {
        if identifier.resource == CLF_RESOURCE {
            ResourceKind::Forwarder
        } else {
            ResourceKind::Collector
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Collector => "collector",
            ResourceKind::Forwarder => "forwarder",
        }
    }

    fn rule(&self) -> &'static HealthRule {
        match self {
            ResourceKind::Collector => &COLLECTOR_RULE,
            ResourceKind::Forwarder => &FORWARDER_RULE,
        }
    }
}

/// Which feedback field decides health for a kind, and how.
struct HealthRule {
    field: &'static str,
    check: fn(&FieldValue, &ResourceIdentifier) -> Result<(), HealthError>,
    not_probed: HealthError,
}

static COLLECTOR_RULE: HealthRule = HealthRule {
    field: "replicas",
    check: check_replicas,
    not_probed: HealthError::ReplicasNotProbed,
};

static FORWARDER_RULE: HealthRule = HealthRule {
    field: "type",
    check: check_condition_type,
    not_probed: HealthError::ConditionTypeNotProbed,
};

fn check_replicas(value: &FieldValue, id: &ResourceIdentifier) -> Result<(), HealthError> {
    match value.as_integer() {
        Some(replicas) if replicas >= 1 => Ok(()),
        Some(replicas) => Err(HealthError::ReplicasBelowMinimum {
            replicas,
            namespace: id.namespace.clone(),
            name: id.name.clone(),
        }),
        None => Err(unexpected_type("replicas", id)),
    }
}

fn check_condition_type(value: &FieldValue, id: &ResourceIdentifier) -> Result<(), HealthError> {
    match value.as_str() {
        Some(READY_CONDITION) => Ok(()),
        Some(observed) => Err(HealthError::ConditionNotReady {
            observed: observed.to_string(),
            namespace: id.namespace.clone(),
            name: id.name.clone(),
        }),
        None => Err(unexpected_type("type", id)),
    }
}

fn unexpected_type(field: &str, id: &ResourceIdentifier) -> HealthError {
    HealthError::UnexpectedValueType {
        field: field.to_string(),
        namespace: id.namespace.clone(),
        name: id.name.clone(),
    }
}

/// Decides whether `identifier` is healthy given its latest feedback
/// samples. Only the first value carrying the kind's field name is
/// considered.
pub fn evaluate(identifier: &ResourceIdentifier, values: &[FeedbackValue]) -> Result<(), HealthError> {
    if values.is_empty() {
        return Err(HealthError::NoValuesProbed {
            namespace: identifier.namespace.clone(),
            name: identifier.name.clone(),
        });
    }

    let rule = ResourceKind::from_identifier(identifier).rule();

    match values.iter().find(|v| v.name == rule.field) {
        Some(v) => (rule.check)(&v.value, identifier),
        None => Err(rule.not_probed.clone()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JsonPath {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeField {
    pub resource_identifier: ResourceIdentifier,
    pub json_paths: Vec<JsonPath>,
}

/// Fields the work agent must scrape for the addon's health check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProber {
    pub probe_fields: Vec<ProbeField>,
}

impl HealthProber {
    /// Collector replicas are probed from the spec. For the forwarder, every
    /// `Ready` condition currently in its status gets a probe on its type.
    pub fn for_forwarder(clf: &ClusterLogForwarder) -> Self {
        let conditions = clf
            .status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default();

        let clf_paths: Vec<JsonPath> = conditions
            .iter()
            .enumerate()
            .filter(|(_, c)| c.type_ == READY_CONDITION)
            .map(|(i, _)| JsonPath {
                name: FORWARDER_RULE.field.to_string(),
                path: format!(".status.conditions[{}].type", i),
            })
            .collect();

        if clf_paths.is_empty() {
            debug!("ClusterLogForwarder has no Ready condition to probe yet");
        }

        Self {
            probe_fields: vec![
                ProbeField {
                    resource_identifier: ResourceIdentifier::collector(),
                    json_paths: vec![JsonPath {
                        name: COLLECTOR_RULE.field.to_string(),
                        path: ".spec.replicas".to_string(),
                    }],
                },
                ProbeField {
                    resource_identifier: ResourceIdentifier::forwarder(),
                    json_paths: clf_paths,
                },
            ],
        }
    }

    pub fn check(
        &self,
        identifier: &ResourceIdentifier,
        result: &StatusFeedbackResult,
    ) -> Result<(), HealthError> {
        evaluate(identifier, &result.values)
    }
}
