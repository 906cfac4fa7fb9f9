use crate::k8s::types::CollectorSpec;
use k8s_openapi::api::core::v1::{SecretVolumeSource, Volume, VolumeMount};

/// Mount path used for a secret injected by the addon.
pub fn secret_mount_path(secret_name: &str) -> String {
    format!("/{}", secret_name)
}

/// Adds a volume backed by `secret_name`, named after it. Returns `false`
/// and leaves the spec untouched when a volume with that name exists.
pub fn configure_volumes(spec: &mut CollectorSpec, secret_name: &str) -> bool {
    if spec.volumes.iter().any(|v| v.name == secret_name) {
        return false;
    }

    spec.volumes.push(Volume {
        name: secret_name.to_string(),
        secret: Some(SecretVolumeSource {
            secret_name: Some(secret_name.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    });
    true
}

/// Adds a mount for the volume named `secret_name`. Returns `false` and
/// leaves the spec untouched when a mount with that name exists.
pub fn configure_volume_mounts(spec: &mut CollectorSpec, secret_name: &str) -> bool {
    if spec.volume_mounts.iter().any(|vm| vm.name == secret_name) {
        return false;
    }

    spec.volume_mounts.push(VolumeMount {
        name: secret_name.to_string(),
        mount_path: secret_mount_path(secret_name),
        ..Default::default()
    });
    true
}
