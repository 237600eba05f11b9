//! Snapshot assembly
//!
//! Runs every collector against one cluster, strictly one after another,
//! and folds each outcome into a [`Snapshot`]. Connecting and listing nodes
//! are fatal steps: when either fails, or the cluster reports no nodes,
//! collection stops and the snapshot carries only its errors. Every other
//! step records its failure and leaves its field empty.

use crate::cluster::ClusterApi;
use crate::collect::{
    collect_cluster_role_bindings, collect_cluster_roles, collect_config_maps, collect_ingresses,
    collect_network_plugin, collect_network_policies, collect_nodes,
    collect_persistent_volume_claims, collect_persistent_volumes, collect_service_accounts,
    collect_services, collect_storage_classes, collect_workload_records, namespace_exists,
};
use crate::config::Config;
use crate::snapshot::{Halt, Snapshot, SnapshotError, WorkloadKind};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::future::Future;

/// Build one snapshot.
///
/// `connect` resolves the cluster connection; its failure is recorded as
/// the fatal error. `now` stamps the snapshot and is the reference time for
/// every age in it.
pub async fn assemble<C, F>(
    connect: F,
    config: &Config,
    now: DateTime<Utc>,
    version: &str,
) -> Snapshot
where
    C: ClusterApi,
    F: Future<Output = Result<C>>,
{
    let mut snapshot = Snapshot::new(now, version);

    let api = match snapshot.errors.absorb(connect.await.map(Some), true) {
        Ok(Some(api)) => api,
        _ => {
            halt(&snapshot);
            return snapshot;
        }
    };

    if collect_all(&api, &mut snapshot, config).await.is_err() {
        halt(&snapshot);
        return snapshot;
    }

    tracing::debug!(
        "Snapshot complete with {} error(s) across {} workload(s)",
        snapshot.errors.len(),
        snapshot.workloads.workload_count()
    );
    snapshot
}

/// Run the collection steps in report order against an established connection
pub async fn collect_all(
    api: &dyn ClusterApi,
    snapshot: &mut Snapshot,
    config: &Config,
) -> Result<(), Halt> {
    let now = snapshot.created_at;

    let nodes = collect_nodes(api, now).await;
    let inventory = snapshot.errors.absorb(nodes, true)?;
    if inventory.nodes.is_empty() {
        let no_nodes = SnapshotError::NoNodes.into();
        snapshot.errors.add(Some(no_nodes), true);
        return Err(Halt);
    }
    snapshot.node_info = inventory;

    let plugin = collect_network_plugin(api, &config.network_plugins).await;
    snapshot.network_plugin = snapshot.errors.absorb(plugin.map(Some), false)?;

    let addons = &config.addons;
    let longhorn = namespace_exists(api, &addons.storage_namespace).await;
    snapshot.longhorn = snapshot.errors.absorb(longhorn, false)?;
    let monitoring = namespace_exists(api, &addons.monitoring_namespace).await;
    snapshot.monitoring = snapshot.errors.absorb(monitoring, false)?;

    for kind in WorkloadKind::ALL {
        let records = collect_workload_records(api, kind).await;
        let records = snapshot.errors.absorb(records, false)?;
        snapshot.workloads.extend(records);
    }

    let classes = collect_storage_classes(api).await;
    snapshot.storage_classes = snapshot.errors.absorb(classes, false)?;
    let volumes = collect_persistent_volumes(api, now).await;
    snapshot.persistent_volumes = snapshot.errors.absorb(volumes, false)?;
    let claims = collect_persistent_volume_claims(api, now).await;
    snapshot.persistent_volume_claims = snapshot.errors.absorb(claims, false)?;
    let config_maps = collect_config_maps(api, now).await;
    snapshot.config_maps = snapshot.errors.absorb(config_maps, false)?;
    let services = collect_services(api, now).await;
    snapshot.services = snapshot.errors.absorb(services, false)?;
    let ingresses = collect_ingresses(api, now).await;
    snapshot.ingresses = snapshot.errors.absorb(ingresses, false)?;
    let roles = collect_cluster_roles(api).await;
    snapshot.cluster_roles = snapshot.errors.absorb(roles, false)?;
    let bindings = collect_cluster_role_bindings(api).await;
    snapshot.cluster_role_bindings = snapshot.errors.absorb(bindings, false)?;
    let accounts = collect_service_accounts(api, now).await;
    snapshot.service_accounts = snapshot.errors.absorb(accounts, false)?;
    let policies = collect_network_policies(api, now).await;
    snapshot.network_policies = snapshot.errors.absorb(policies, false)?;

    Ok(())
}

fn halt(snapshot: &Snapshot) {
    if let Some(error) = snapshot.errors.fatal_error() {
        tracing::error!("Stopping collection: {:#}", error);
    }
}
