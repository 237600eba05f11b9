//! Resource collectors
//!
//! Every collector has the same shape: list one kind of object from the
//! cluster, project each object into its report item, and hand back the
//! ordered items or the query failure. The shared shape lives in
//! [`collect`]; the per-kind modules only supply the projection.

mod addons;
mod config_maps;
mod network;
mod nodes;
mod rbac;
mod storage;
mod workloads;

pub use addons::namespace_exists;
pub use config_maps::{collect_config_maps, normalize_config_map};
pub use network::{
    collect_ingresses, collect_network_plugin, collect_network_policies, collect_services,
    detect_network_plugin, normalize_ingress, normalize_network_policy, normalize_service,
};
pub use nodes::{collect_nodes, normalize_node};
pub use rbac::{
    collect_cluster_role_bindings, collect_cluster_roles, collect_service_accounts,
    normalize_cluster_role, normalize_cluster_role_binding, normalize_service_account,
};
pub use storage::{
    collect_persistent_volume_claims, collect_persistent_volumes, collect_storage_classes,
    normalize_persistent_volume, normalize_persistent_volume_claim, normalize_storage_class,
};
pub use workloads::collect_workload_records;

use crate::snapshot::{Age, age_in_days, to_utc};
use anyhow::Result;
use chrono::{DateTime, Utc};
use kube::ResourceExt;
use std::future::Future;

/// Run a list query and project every returned object.
///
/// `normalize` may return `None` to drop an object from the report. Output
/// order follows the API response and nothing is deduplicated.
pub async fn collect<R, T, Q, F>(kind: &str, query: Q, normalize: F) -> Result<Vec<T>>
where
    Q: Future<Output = Result<Vec<R>>>,
    F: FnMut(&R) -> Option<T>,
{
    let raw = match query.await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("Collecting {} failed: {:#}", kind, e);
            return Err(e);
        }
    };

    let items: Vec<T> = raw.iter().filter_map(normalize).collect();
    tracing::debug!(
        "Collected {} {} ({} returned by the API)",
        items.len(),
        kind,
        raw.len()
    );
    Ok(items)
}

/// Whole days since the object was created
pub(crate) fn creation_age_days<K: ResourceExt>(obj: &K, now: DateTime<Utc>) -> Option<i64> {
    created_at(obj).map(|created| age_in_days(created, now))
}

/// Hours below one day, days otherwise
pub(crate) fn creation_age<K: ResourceExt>(obj: &K, now: DateTime<Utc>) -> Option<Age> {
    created_at(obj).map(|created| Age::between(created, now))
}

fn created_at<K: ResourceExt>(obj: &K) -> Option<DateTime<Utc>> {
    obj.creation_timestamp().as_ref().map(to_utc)
}
