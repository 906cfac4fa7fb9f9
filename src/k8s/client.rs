use crate::addon::config_ref::ObjectKey;
use crate::k8s::types::{
    AddOnDeploymentConfig, ClusterLogForwarder, ManagedCluster, ManagedClusterAddOn,
    OpenTelemetryCollector,
};
use crate::{AddonError, Result};
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, info};

/// Source of the hub-side objects that values assembly reads.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn deployment_config(&self, key: &ObjectKey) -> Result<AddOnDeploymentConfig>;

    async fn collector(&self, key: &ObjectKey) -> Result<OpenTelemetryCollector>;

    async fn forwarder(&self, key: &ObjectKey) -> Result<ClusterLogForwarder>;
}

pub struct KubeFetcher {
    client: Client,
}

impl KubeFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_default() -> Result<Self> {
        debug!("Initializing Kubernetes client");

        let client = Client::try_default().await.map_err(|e| {
            AddonError::Kubernetes(format!("Failed to create K8s client: {}", e))
        })?;

        info!("Successfully connected to Kubernetes cluster");

        Ok(Self { client })
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub async fn managed_cluster(&self, name: &str) -> Result<ManagedCluster> {
        let api: Api<ManagedCluster> = Api::all(self.client.clone());
        api.get(name).await.map_err(|e| match e {
            kube::Error::Api(ref ae) if ae.code == 404 => AddonError::NotFound {
                kind: "ManagedCluster".to_string(),
                name: name.to_string(),
                namespace: String::new(),
            },
            other => AddonError::Kubernetes(format!(
                "Failed to get managed cluster {}: {}",
                name, other
            )),
        })
    }

    /// The addon object lives in the namespace named after its cluster.
    pub async fn managed_cluster_addon(
        &self,
        cluster: &str,
        name: &str,
    ) -> Result<ManagedClusterAddOn> {
        self.get_namespaced(&ObjectKey::new(name, cluster)).await
    }

    async fn get_namespaced<K>(&self, key: &ObjectKey) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let kind = K::kind(&Default::default()).to_string();
        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);

        api.get(&key.name).await.map_err(|e| match e {
            kube::Error::Api(ref ae) if ae.code == 404 => AddonError::NotFound {
                kind,
                name: key.name.clone(),
                namespace: key.namespace.clone(),
            },
            other => AddonError::Kubernetes(format!(
                "Failed to get {} {}: {}",
                kind, key, other
            )),
        })
    }
}

#[async_trait]
impl ObjectFetcher for KubeFetcher {
    async fn deployment_config(&self, key: &ObjectKey) -> Result<AddOnDeploymentConfig> {
        self.get_namespaced(key).await
    }

    async fn collector(&self, key: &ObjectKey) -> Result<OpenTelemetryCollector> {
        self.get_namespaced(key).await
    }

    async fn forwarder(&self, key: &ObjectKey) -> Result<ClusterLogForwarder> {
        self.get_namespaced(key).await
    }
}

/// Fetcher over objects that were loaded up front, e.g. from manifest files.
/// A lookup only succeeds when the key names the loaded object.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pub deployment_config: Option<AddOnDeploymentConfig>,
    pub collector: Option<OpenTelemetryCollector>,
    pub forwarder: Option<ClusterLogForwarder>,
}

fn lookup<K>(object: Option<&K>, key: &ObjectKey) -> Result<K>
where
    K: Resource + Clone,
    <K as Resource>::DynamicType: Default,
{
    object
        .filter(|o| o.name_any() == key.name && o.namespace().unwrap_or_default() == key.namespace)
        .cloned()
        .ok_or_else(|| AddonError::NotFound {
            kind: K::kind(&Default::default()).to_string(),
            name: key.name.clone(),
            namespace: key.namespace.clone(),
        })
}

#[async_trait]
impl ObjectFetcher for StaticFetcher {
    async fn deployment_config(&self, key: &ObjectKey) -> Result<AddOnDeploymentConfig> {
        lookup(self.deployment_config.as_ref(), key)
    }

    async fn collector(&self, key: &ObjectKey) -> Result<OpenTelemetryCollector> {
        lookup(self.collector.as_ref(), key)
    }

    async fn forwarder(&self, key: &ObjectKey) -> Result<ClusterLogForwarder> {
        lookup(self.forwarder.as_ref(), key)
    }
}
