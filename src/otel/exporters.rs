//! Matching of secret-backed collector volumes to the exporters that read
//! TLS material from them.
//!
//! Exporter configuration is an arbitrary JSON tree; the only shape this
//! module relies on is an optional `tls` object holding `cert_file`,
//! `key_file` and `ca_file` strings. Anything else is ignored.

use crate::error::MatchError;
use crate::k8s::types::CollectorSpec;
use k8s_openapi::api::core::v1::VolumeMount;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

static TLS_FILE_KEYS: [&str; 3] = ["cert_file", "key_file", "ca_file"];

/// Logical consumer of TLS material: the name of an exporter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Exporter target to the name of the secret backing it, in the collector's
/// namespace.
pub type ExporterSecretMap = BTreeMap<Target, String>;

/// Non-fatal findings of a match run, for the caller to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchWarning {
    UnusedSecret { secret: String, mount_path: String },
}

impl fmt::Display for MatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchWarning::UnusedSecret { secret, mount_path } => write!(
                f,
                "secret {} mounted at {} is not used by any exporter",
                secret, mount_path
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExporterSecrets {
    pub secrets: ExporterSecretMap,
    pub warnings: Vec<MatchWarning>,
}

/// TLS file paths configured on an exporter. Yields nothing when the
/// exporter has no `tls` object; non-string path fields are skipped.
pub fn tls_files(exporter: &Value) -> impl Iterator<Item = &str> + '_ {
    exporter
        .get("tls")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|tls| {
            TLS_FILE_KEYS
                .iter()
                .filter_map(move |key| tls.get(*key).and_then(Value::as_str))
        })
}

/// First exporter, in name order, with a TLS file under `mount_path`.
/// The comparison is a plain string prefix, not path-segment aware.
fn find_exporter<'a>(mount: &VolumeMount, exporters: &'a BTreeMap<String, Value>) -> Option<&'a str> {
    exporters
        .iter()
        .find(|(_, config)| tls_files(config).any(|path| path.starts_with(&mount.mount_path)))
        .map(|(name, _)| name.as_str())
}

fn volume_mount<'a>(spec: &'a CollectorSpec, secret: &str) -> Option<&'a VolumeMount> {
    spec.volume_mounts.iter().find(|vm| vm.name == secret)
}

/// Builds the exporter to secret mapping for a collector.
///
/// Fails before looking at any volume when no exporters are configured, and
/// on the first secret volume that has no matching volume mount. A mounted
/// secret no exporter refers to is reported as a warning and skipped. When
/// several volumes resolve to the same exporter, the last one wins.
pub fn match_exporter_secrets(spec: &CollectorSpec) -> Result<ExporterSecrets, MatchError> {
    let exporters = &spec.config.exporters;
    if exporters.is_empty() {
        return Err(MatchError::NoExportersConfigured);
    }

    let mut result = ExporterSecrets::default();

    let secret_names = spec
        .volumes
        .iter()
        .filter_map(|v| v.secret.as_ref())
        .filter_map(|s| s.secret_name.as_deref());

    for secret in secret_names {
        let mount = volume_mount(spec, secret).ok_or_else(|| MatchError::NoVolumeMountForSecret {
            secret: secret.to_string(),
        })?;

        match find_exporter(mount, exporters) {
            Some(exporter) => {
                result
                    .secrets
                    .insert(Target::new(exporter), secret.to_string());
            }
            None => result.warnings.push(MatchWarning::UnusedSecret {
                secret: secret.to_string(),
                mount_path: mount.mount_path.clone(),
            }),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ConfigMapVolumeSource, SecretVolumeSource, Volume};
    use serde_json::json;

    fn secret_volume(name: &str, secret: &str) -> Volume {
        Volume {
            name: name.to_string(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn mount(name: &str, path: &str) -> VolumeMount {
        VolumeMount {
            name: name.to_string(),
            mount_path: path.to_string(),
            ..Default::default()
        }
    }

    fn spec(volumes: Vec<Volume>, mounts: Vec<VolumeMount>, exporters: Value) -> CollectorSpec {
        let mut spec = CollectorSpec {
            volumes,
            volume_mounts: mounts,
            ..Default::default()
        };
        if let Value::Object(map) = exporters {
            spec.config.exporters = map.into_iter().collect();
        }
        spec
    }

    #[test]
    fn test_no_exporters() {
        let spec = spec(
            vec![secret_volume("secret-a", "secret-a")],
            vec![],
            json!({}),
        );
        assert_eq!(
            match_exporter_secrets(&spec),
            Err(MatchError::NoExportersConfigured)
        );
    }

    #[test]
    fn test_missing_volume_mount_fails_fast() {
        let spec = spec(
            vec![
                secret_volume("secret-a", "secret-a"),
                secret_volume("secret-b", "secret-b"),
            ],
            vec![mount("secret-b", "/etc/otel/secret-b")],
            json!({
                "otlphttp": {"tls": {"cert_file": "/etc/otel/secret-b/tls.crt"}}
            }),
        );
        assert_eq!(
            match_exporter_secrets(&spec),
            Err(MatchError::NoVolumeMountForSecret {
                secret: "secret-a".to_string()
            })
        );
    }

    #[test]
    fn test_cert_file_prefix_match() {
        let spec = spec(
            vec![secret_volume("secret-a", "secret-a")],
            vec![mount("secret-a", "/etc/otel/secret-a")],
            json!({
                "debug": {"verbosity": "detailed"},
                "otlphttp": {
                    "endpoint": "https://hub.example.com:4318",
                    "tls": {
                        "cert_file": "/etc/otel/secret-a/tls.crt",
                        "key_file": "/etc/otel/secret-a/tls.key",
                        "ca_file": "/etc/otel/secret-a/ca.crt"
                    }
                }
            }),
        );

        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets.len(), 1);
        assert_eq!(matched.secrets[&Target::from("otlphttp")], "secret-a");
        assert!(matched.warnings.is_empty());
    }

    #[test]
    fn test_ca_file_alone_is_enough() {
        let spec = spec(
            vec![secret_volume("ca", "ca")],
            vec![mount("ca", "/ca")],
            json!({"otlp": {"tls": {"ca_file": "/ca/ca.crt"}}}),
        );
        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets[&Target::from("otlp")], "ca");
    }

    #[test]
    fn test_unused_secret_is_a_warning() {
        let spec = spec(
            vec![
                secret_volume("secret-a", "secret-a"),
                secret_volume("unused", "unused"),
            ],
            vec![
                mount("secret-a", "/etc/otel/secret-a"),
                mount("unused", "/etc/otel/unused"),
            ],
            json!({"otlphttp": {"tls": {"key_file": "/etc/otel/secret-a/tls.key"}}}),
        );

        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets.len(), 1);
        assert!(!matched.secrets.values().any(|s| s == "unused"));
        assert_eq!(
            matched.warnings,
            vec![MatchWarning::UnusedSecret {
                secret: "unused".to_string(),
                mount_path: "/etc/otel/unused".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_secret_volumes_ignored() {
        let config_volume = Volume {
            name: "config".to_string(),
            config_map: Some(ConfigMapVolumeSource {
                name: Some("collector-config".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let spec = spec(
            vec![config_volume],
            vec![],
            json!({"otlp": {"tls": {"cert_file": "/config/tls.crt"}}}),
        );

        let matched = match_exporter_secrets(&spec).unwrap();
        assert!(matched.secrets.is_empty());
        assert!(matched.warnings.is_empty());
    }

    #[test]
    fn test_exporters_without_tls_object_are_skipped() {
        let spec = spec(
            vec![secret_volume("secret-a", "secret-a")],
            vec![mount("secret-a", "/etc/otel/secret-a")],
            json!({
                "debug": null,
                "logging": {"tls": "insecure"},
                "otlp": {"tls": {"insecure": true, "cert_file": 42}},
                "otlphttp": {"tls": {"ca_file": "/etc/otel/secret-a/ca.crt"}}
            }),
        );

        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets.len(), 1);
        assert_eq!(matched.secrets[&Target::from("otlphttp")], "secret-a");
    }

    #[test]
    fn test_empty_result_without_secret_volumes() {
        let spec = spec(vec![], vec![], json!({"otlp": {}}));
        assert_eq!(match_exporter_secrets(&spec), Ok(ExporterSecrets::default()));
    }

    #[test]
    fn test_last_volume_wins_for_same_exporter() {
        let spec = spec(
            vec![
                secret_volume("first", "first"),
                secret_volume("second", "second"),
            ],
            vec![mount("first", "/certs/first"), mount("second", "/certs/second")],
            json!({
                "otlp": {"tls": {
                    "cert_file": "/certs/first/tls.crt",
                    "ca_file": "/certs/second/ca.crt"
                }}
            }),
        );

        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets.len(), 1);
        assert_eq!(matched.secrets[&Target::from("otlp")], "second");
    }

    #[test]
    fn test_shared_prefix_binds_single_consistent_exporter() {
        let spec = spec(
            vec![secret_volume("shared", "shared")],
            vec![mount("shared", "/certs")],
            json!({
                "otlp/a": {"tls": {"cert_file": "/certs/a.crt"}},
                "otlp/b": {"tls": {"cert_file": "/certs/b.crt"}}
            }),
        );

        let first = match_exporter_secrets(&spec).unwrap();
        assert_eq!(first.secrets.len(), 1);
        for _ in 0..5 {
            assert_eq!(match_exporter_secrets(&spec).unwrap(), first);
        }
    }

    #[test]
    fn test_prefix_is_not_path_aware() {
        let spec = spec(
            vec![secret_volume("secret", "secret")],
            vec![mount("secret", "/etc/otel/secret")],
            json!({"otlp": {"tls": {"cert_file": "/etc/otel/secret-other/tls.crt"}}}),
        );
        let matched = match_exporter_secrets(&spec).unwrap();
        assert_eq!(matched.secrets[&Target::from("otlp")], "secret");
    }

    #[test]
    fn test_tls_files_accessor() {
        let exporter = json!({"tls": {"cert_file": "/a", "key_file": "/b", "server_name": "x"}});
        assert_eq!(tls_files(&exporter).collect::<Vec<_>>(), vec!["/a", "/b"]);
        assert_eq!(tls_files(&json!("plain")).count(), 0);
    }
}
