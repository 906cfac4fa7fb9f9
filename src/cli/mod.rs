pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mcoa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multicluster observability addon: exporter secret resolution and agent health checks", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Resolve which secret backs each exporter of a collector manifest")]
    MatchSecrets {
        #[arg(short, long, help = "OpenTelemetryCollector manifest (YAML or JSON)")]
        collector: PathBuf,

        #[arg(long, help = "Print Prometheus metrics after the result")]
        metrics: bool,
    },
    #[command(about = "Evaluate status feedback for a spoke resource")]
    Health {
        #[arg(long, default_value = crate::addon::OTEL_GROUP, help = "API group of the resource")]
        group: String,

        #[arg(long, default_value = crate::addon::OTEL_COLLECTORS_RESOURCE, help = "Plural resource name")]
        resource: String,

        #[arg(long, help = "Resource name")]
        name: String,

        #[arg(short, long, default_value = "", help = "Resource namespace")]
        namespace: String,

        #[arg(long, help = "Status feedback document with a `values` list")]
        values: PathBuf,

        #[arg(long, help = "Print Prometheus metrics after the verdict")]
        metrics: bool,
    },
    #[command(about = "Print the probe fields the work agent should scrape")]
    Prober {
        #[arg(short, long, help = "ClusterLogForwarder manifest")]
        forwarder: PathBuf,
    },
    #[command(about = "Assemble Helm chart values from manifests on disk")]
    Values {
        #[arg(long, help = "ManagedCluster manifest")]
        cluster: PathBuf,

        #[arg(long, help = "ManagedClusterAddOn manifest")]
        addon: PathBuf,

        #[arg(long, help = "AddOnDeploymentConfig manifest")]
        deployment_config: PathBuf,

        #[arg(long, help = "OpenTelemetryCollector manifest")]
        collector: Option<PathBuf>,

        #[arg(long, help = "ClusterLogForwarder manifest")]
        forwarder: Option<PathBuf>,

        #[arg(long, help = "Secret manifests (multi-document YAML)")]
        secrets: Option<PathBuf>,
    },
    #[command(about = "Assemble Helm chart values for a managed cluster from the hub")]
    ClusterValues {
        #[arg(short, long, help = "Managed cluster name")]
        cluster: String,

        #[arg(long, default_value = crate::addon::ADDON_NAME, help = "ManagedClusterAddOn name")]
        addon_name: String,
    },
}
