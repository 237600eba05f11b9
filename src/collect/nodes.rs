//! Node inventory

use super::{collect, creation_age};
use crate::cluster::ClusterApi;
use crate::snapshot::{Allocatable, NodeConditionItem, NodeInfo, NodeInventory, to_utc};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::ResourceExt;
use std::collections::BTreeMap;

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";
const INSTANCE_TYPE_LABEL: &str = "node.kubernetes.io/instance-type";
const CLUSTER_NAME_ANNOTATION: &str = "cluster.x-k8s.io/cluster-name";
const MACHINE_ANNOTATION: &str = "cluster.x-k8s.io/machine";
const NODE_ARGS_ANNOTATION: &str = "rke2.io/node-args";
const POD_LIMITS_ANNOTATION: &str = "management.cattle.io/pod-limits";
const POD_REQUESTS_ANNOTATION: &str = "management.cattle.io/pod-requests";

/// List nodes and tag the inventory with the API server URL.
///
/// An empty node list is returned as-is; the caller decides what it means.
pub async fn collect_nodes(api: &dyn ClusterApi, now: DateTime<Utc>) -> Result<NodeInventory> {
    let to_info = |node: &Node| Some(normalize_node(node, now));
    let nodes = collect("nodes", api.list_nodes(), to_info).await?;
    Ok(NodeInventory {
        cluster: api.cluster_url(),
        nodes,
    })
}

pub fn normalize_node(node: &Node, now: DateTime<Utc>) -> NodeInfo {
    let labels = node.labels();
    let annotations = node.annotations();
    let annotation = |key: &str| annotations.get(key).cloned();

    let roles = labels
        .keys()
        .filter_map(|key| key.strip_prefix(ROLE_LABEL_PREFIX))
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();

    let mut info = NodeInfo {
        name: node.name_any(),
        roles,
        cluster_name: annotation(CLUSTER_NAME_ANNOTATION),
        machine: annotation(MACHINE_ANNOTATION),
        instance_type: labels.get(INSTANCE_TYPE_LABEL).cloned(),
        node_args: annotation(NODE_ARGS_ANNOTATION),
        pod_limits: annotation(POD_LIMITS_ANNOTATION),
        pod_requests: annotation(POD_REQUESTS_ANNOTATION),
        age: creation_age(node, now),
        ..Default::default()
    };

    if let Some(spec) = &node.spec {
        info.pod_cidr = spec.pod_cidr.clone();
        info.taints = spec
            .taints
            .iter()
            .flatten()
            .map(|taint| match &taint.value {
                Some(value) => format!("{}={}:{}", taint.key, value, taint.effect),
                None => format!("{}:{}", taint.key, taint.effect),
            })
            .collect();
    }

    let Some(status) = &node.status else {
        return info;
    };

    if let Some(system) = &status.node_info {
        info.operating_system = system.operating_system.clone();
        info.os_image = system.os_image.clone();
        info.architecture = system.architecture.clone();
        info.kernel_version = system.kernel_version.clone();
        info.system_uuid = system.system_uuid.clone();
        info.container_runtime = system.container_runtime_version.clone();
        info.kubelet_version = system.kubelet_version.clone();
        info.kube_proxy_version = system.kube_proxy_version.clone();
    }

    for address in status.addresses.iter().flatten() {
        match address.type_.as_str() {
            "InternalIP" if info.internal_ip.is_none() => {
                info.internal_ip = Some(address.address.clone())
            }
            "ExternalIP" if info.external_ip.is_none() => {
                info.external_ip = Some(address.address.clone())
            }
            _ => {}
        }
    }

    if let Some(allocatable) = &status.allocatable {
        info.allocatable = allocatable_from(allocatable);
    }

    info.conditions = status
        .conditions
        .iter()
        .flatten()
        .map(|condition| NodeConditionItem {
            condition_type: condition.type_.clone(),
            status: condition.status.clone(),
            last_heartbeat_time: condition.last_heartbeat_time.as_ref().map(format_time),
            last_transition_time: condition.last_transition_time.as_ref().map(format_time),
            reason: condition.reason.clone(),
            message: condition.message.clone(),
        })
        .collect();

    info
}

fn allocatable_from(resources: &BTreeMap<String, Quantity>) -> Allocatable {
    let get = |key: &str| resources.get(key).map(|q| q.0.clone());
    Allocatable {
        cpu: get("cpu"),
        memory: get("memory"),
        ephemeral_storage: get("ephemeral-storage"),
        pods: get("pods"),
    }
}

fn format_time(time: &Time) -> String {
    to_utc(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}
