//! Storage classes, persistent volumes and claims

use super::{collect, creation_age_days};
use crate::cluster::ClusterApi;
use crate::snapshot::{PersistentVolumeClaimItem, PersistentVolumeItem, StorageClassItem};
use anyhow::Result;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim};
use k8s_openapi::api::storage::v1::StorageClass;
use kube::ResourceExt;

const DEFAULT_CLASS_ANNOTATIONS: &[&str] = &[
    "storageclass.kubernetes.io/is-default-class",
    "storageclass.beta.kubernetes.io/is-default-class",
];

pub fn normalize_storage_class(class: &StorageClass) -> StorageClassItem {
    let annotations = class.annotations();
    StorageClassItem {
        name: class.name_any(),
        provisioner: class.provisioner.clone(),
        parameters: class.parameters.clone().unwrap_or_default(),
        reclaim_policy: class.reclaim_policy.clone(),
        volume_binding_mode: class.volume_binding_mode.clone(),
        allow_volume_expansion: class.allow_volume_expansion.unwrap_or(false),
        is_default: DEFAULT_CLASS_ANNOTATIONS
            .iter()
            .any(|key| annotations.get(*key).is_some_and(|v| v == "true")),
    }
}

pub async fn collect_storage_classes(api: &dyn ClusterApi) -> Result<Vec<StorageClassItem>> {
    let to_item = |c: &StorageClass| Some(normalize_storage_class(c));
    collect("storage classes", api.list_storage_classes(), to_item).await
}

/// Project a persistent volume; volumes without a storage capacity are dropped
pub fn normalize_persistent_volume(
    volume: &PersistentVolume,
    now: DateTime<Utc>,
) -> Option<PersistentVolumeItem> {
    let spec = volume.spec.as_ref()?;
    let size = spec.capacity.as_ref()?.get("storage")?.0.clone();

    let claim = spec.claim_ref.as_ref().and_then(|claim| {
        let name = claim.name.as_deref()?;
        Some(match claim.namespace.as_deref() {
            Some(ns) => format!("{}/{}", ns, name),
            None => name.to_string(),
        })
    });

    Some(PersistentVolumeItem {
        name: volume.name_any(),
        size,
        access_modes: spec.access_modes.clone().unwrap_or_default(),
        reclaim_policy: spec.persistent_volume_reclaim_policy.clone(),
        phase: volume.status.as_ref().and_then(|s| s.phase.clone()),
        claim,
        storage_class: spec.storage_class_name.clone(),
        age_days: creation_age_days(volume, now),
    })
}

pub async fn collect_persistent_volumes(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<PersistentVolumeItem>> {
    let to_item = |v: &PersistentVolume| normalize_persistent_volume(v, now);
    collect("persistent volumes", api.list_persistent_volumes(), to_item).await
}

pub fn normalize_persistent_volume_claim(
    claim: &PersistentVolumeClaim,
    now: DateTime<Utc>,
) -> PersistentVolumeClaimItem {
    let spec = claim.spec.as_ref();
    let status = claim.status.as_ref();

    PersistentVolumeClaimItem {
        namespace: claim.namespace().unwrap_or_default(),
        name: claim.name_any(),
        phase: status.and_then(|s| s.phase.clone()),
        volume: spec.and_then(|s| s.volume_name.clone()),
        capacity: status
            .and_then(|s| s.capacity.as_ref())
            .and_then(|capacity| capacity.get("storage"))
            .map(|quantity| quantity.0.clone()),
        access_modes: status
            .and_then(|s| s.access_modes.clone())
            .unwrap_or_default(),
        storage_class: spec.and_then(|s| s.storage_class_name.clone()),
        age_days: creation_age_days(claim, now),
    }
}

pub async fn collect_persistent_volume_claims(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<PersistentVolumeClaimItem>> {
    let to_item = |c: &PersistentVolumeClaim| Some(normalize_persistent_volume_claim(c, now));
    let query = api.list_persistent_volume_claims();
    collect("persistent volume claims", query, to_item).await
}
