//! Config map key inventory

use super::{collect, creation_age_days};
use crate::cluster::ClusterApi;
use crate::snapshot::ConfigMapItem;
use anyhow::Result;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::ResourceExt;

/// Only key names are kept; values never leave the cluster
pub fn normalize_config_map(config_map: &ConfigMap, now: DateTime<Utc>) -> ConfigMapItem {
    let mut keys: Vec<String> = config_map
        .data
        .iter()
        .flat_map(|data| data.keys())
        .chain(config_map.binary_data.iter().flat_map(|data| data.keys()))
        .cloned()
        .collect();
    keys.sort();
    keys.dedup();

    ConfigMapItem {
        namespace: config_map.namespace().unwrap_or_default(),
        name: config_map.name_any(),
        keys,
        age_days: creation_age_days(config_map, now),
    }
}

pub async fn collect_config_maps(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<ConfigMapItem>> {
    let to_item = |c: &ConfigMap| Some(normalize_config_map(c, now));
    collect("config maps", api.list_config_maps(), to_item).await
}
