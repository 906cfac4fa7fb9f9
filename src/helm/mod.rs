//! Assembly of the values handed to the addon's Helm chart for one managed
//! cluster.

pub mod options;
pub mod values;

pub use options::{is_hub_cluster, Options};
pub use values::{build_values, HelmChartValues, LoggingValues, SecretValue, TracingValues};
