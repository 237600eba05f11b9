//! Deployment, DaemonSet and StatefulSet listings

use super::collect;
use crate::cluster::ClusterApi;
use crate::snapshot::{WorkloadKind, WorkloadRecord};
use anyhow::Result;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use kube::ResourceExt;

fn record<K: ResourceExt>(obj: &K, kind: WorkloadKind) -> WorkloadRecord {
    WorkloadRecord {
        name: obj.name_any(),
        namespace: obj.namespace().unwrap_or_default(),
        kind,
    }
}

/// List every workload of `kind` across all namespaces, in API order
pub async fn collect_workload_records(
    api: &dyn ClusterApi,
    kind: WorkloadKind,
) -> Result<Vec<WorkloadRecord>> {
    match kind {
        WorkloadKind::Deployment => {
            let to_record = |d: &Deployment| Some(record(d, kind));
            collect("deployments", api.list_deployments(), to_record).await
        }
        WorkloadKind::DaemonSet => {
            let to_record = |d: &DaemonSet| Some(record(d, kind));
            collect("daemon sets", api.list_daemon_sets(), to_record).await
        }
        WorkloadKind::StatefulSet => {
            let to_record = |s: &StatefulSet| Some(record(s, kind));
            collect("stateful sets", api.list_stateful_sets(), to_record).await
        }
    }
}
