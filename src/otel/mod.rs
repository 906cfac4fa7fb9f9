//! Tracing side of the addon: the OpenTelemetry collector template, the
//! secrets its exporters need, and the volumes that carry them.

pub mod exporters;
pub mod secrets;
pub mod volumes;

pub use exporters::{match_exporter_secrets, ExporterSecretMap, ExporterSecrets, MatchWarning, Target};
pub use secrets::{KubeSecretsProvider, SecretsProvider, StaticSecretsProvider, TargetSecret};
pub use volumes::{configure_volume_mounts, configure_volumes};
