pub mod client;
pub mod types;

pub use client::{KubeFetcher, ObjectFetcher, StaticFetcher};
pub use types::{
    AddOnDeploymentConfig, ClusterLogForwarder, CollectorConfig, CollectorSpec,
    ManagedCluster, ManagedClusterAddOn, OpenTelemetryCollector,
};
