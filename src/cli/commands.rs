use crate::addon::health::StatusFeedbackResult;
use crate::addon::{evaluate, HealthProber, ResourceIdentifier};
use crate::cli::Commands;
use crate::helm::build_values;
use crate::k8s::types::{ClusterLogForwarder, ManagedCluster, ManagedClusterAddOn, OpenTelemetryCollector};
use crate::k8s::{KubeFetcher, StaticFetcher};
use crate::metrics::{gather_text, AddonMetrics};
use crate::otel::{match_exporter_secrets, KubeSecretsProvider, StaticSecretsProvider};
use crate::{AddonError, Result};
use k8s_openapi::api::core::v1::Secret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::MatchSecrets { collector, metrics } => handle_match_secrets(&collector, metrics),
        Commands::Health {
            group,
            resource,
            name,
            namespace,
            values,
            metrics,
        } => {
            let identifier = ResourceIdentifier::new(group, resource, name, namespace);
            handle_health(identifier, &values, metrics)
        }
        Commands::Prober { forwarder } => handle_prober(&forwarder),
        Commands::Values {
            cluster,
            addon,
            deployment_config,
            collector,
            forwarder,
            secrets,
        } => handle_values(cluster, addon, deployment_config, collector, forwarder, secrets).await,
        Commands::ClusterValues {
            cluster,
            addon_name,
        } => handle_cluster_values(&cluster, &addon_name).await,
    }
}

/// Reads a single YAML (or JSON) document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Reads every document of a multi-document YAML stream.
pub fn read_documents<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!("Reading {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::Deserializer::from_str(&contents)
        .map(|doc| T::deserialize(doc).map_err(AddonError::from))
        .collect()
}

fn handle_match_secrets(path: &Path, print_metrics: bool) -> Result<()> {
    let collector: OpenTelemetryCollector = read_document(path)?;
    info!("Matching exporter secrets for collector {:?}", collector.metadata.name);

    let matched = match_exporter_secrets(&collector.spec)?;
    for warning in &matched.warnings {
        warn!("{}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&matched.secrets)?);

    if print_metrics {
        let metrics = AddonMetrics::new()?;
        metrics.record_match(&matched);
        print!("{}", gather_text(&metrics)?);
    }
    Ok(())
}

fn handle_health(identifier: ResourceIdentifier, path: &Path, print_metrics: bool) -> Result<()> {
    let feedback: StatusFeedbackResult = read_document(path)?;
    info!(
        "Evaluating {} feedback values for {}",
        feedback.values.len(),
        identifier
    );

    let verdict = evaluate(&identifier, &feedback.values);

    if print_metrics {
        let metrics = AddonMetrics::new()?;
        metrics.record_health(&identifier, &verdict);
        print!("{}", gather_text(&metrics)?);
    }

    verdict?;
    println!("{} is healthy", identifier);
    Ok(())
}

fn handle_prober(path: &Path) -> Result<()> {
    let clf: ClusterLogForwarder = read_document(path)?;
    let prober = HealthProber::for_forwarder(&clf);
    println!("{}", serde_json::to_string_pretty(&prober)?);
    Ok(())
}

async fn handle_values(
    cluster: PathBuf,
    addon: PathBuf,
    deployment_config: PathBuf,
    collector: Option<PathBuf>,
    forwarder: Option<PathBuf>,
    secrets: Option<PathBuf>,
) -> Result<()> {
    let cluster: ManagedCluster = read_document(&cluster)?;
    let addon: ManagedClusterAddOn = read_document(&addon)?;

    let fetcher = StaticFetcher {
        deployment_config: Some(read_document(&deployment_config)?),
        collector: collector.as_deref().map(read_document).transpose()?,
        forwarder: forwarder.as_deref().map(read_document).transpose()?,
    };
    let secrets: Vec<Secret> = match secrets {
        Some(path) => read_documents(&path)?,
        None => Vec::new(),
    };

    let values = build_values(&fetcher, &StaticSecretsProvider::new(secrets), &cluster, &addon).await?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

async fn handle_cluster_values(cluster_name: &str, addon_name: &str) -> Result<()> {
    let fetcher = KubeFetcher::try_default().await?;
    let cluster = fetcher.managed_cluster(cluster_name).await?;
    let addon = fetcher.managed_cluster_addon(cluster_name, addon_name).await?;
    let secrets = KubeSecretsProvider::new(fetcher.client());

    let values = build_values(&fetcher, &secrets, &cluster, &addon).await?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
