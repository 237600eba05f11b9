//! Presentation-ready projections of cluster objects
//!
//! Each item keeps only what the report shows. Items are built once by a
//! collector and never modified afterwards.

use super::age::Age;
use serde::Serialize;
use std::collections::BTreeMap;

/// Node inventory: API server URL plus nodes in API order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInventory {
    pub cluster: String,
    pub nodes: Vec<NodeInfo>,
}

impl NodeInventory {
    pub fn first(&self) -> Option<&NodeInfo> {
        self.nodes.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub name: String,
    pub roles: Vec<String>,
    pub cluster_name: Option<String>,
    pub machine: Option<String>,
    pub instance_type: Option<String>,
    pub node_args: Option<String>,
    pub pod_limits: Option<String>,
    pub pod_requests: Option<String>,
    pub operating_system: String,
    pub os_image: String,
    pub architecture: String,
    pub kernel_version: String,
    pub system_uuid: String,
    pub container_runtime: String,
    pub kubelet_version: String,
    pub kube_proxy_version: String,
    pub pod_cidr: Option<String>,
    pub internal_ip: Option<String>,
    pub external_ip: Option<String>,
    pub taints: Vec<String>,
    pub allocatable: Allocatable,
    pub conditions: Vec<NodeConditionItem>,
    pub age: Option<Age>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocatable {
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub ephemeral_storage: Option<String>,
    pub pods: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConditionItem {
    pub condition_type: String,
    pub status: String,
    pub last_heartbeat_time: Option<String>,
    pub last_transition_time: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassItem {
    pub name: String,
    pub provisioner: String,
    pub parameters: BTreeMap<String, String>,
    pub reclaim_policy: Option<String>,
    pub volume_binding_mode: Option<String>,
    pub allow_volume_expansion: bool,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeItem {
    pub name: String,
    pub size: String,
    pub access_modes: Vec<String>,
    pub reclaim_policy: Option<String>,
    pub phase: Option<String>,
    pub claim: Option<String>,
    pub storage_class: Option<String>,
    pub age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeClaimItem {
    pub namespace: String,
    pub name: String,
    pub phase: Option<String>,
    pub volume: Option<String>,
    pub capacity: Option<String>,
    pub access_modes: Vec<String>,
    pub storage_class: Option<String>,
    pub age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapItem {
    pub namespace: String,
    pub name: String,
    pub keys: Vec<String>,
    pub age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub namespace: String,
    pub name: String,
    pub service_type: String,
    pub cluster_ip: Option<String>,
    pub external_ip: Option<String>,
    pub ports: Vec<String>,
    pub age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleDetail {
    pub host: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackendDetail {
    pub service_name: String,
    pub service_port: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressItem {
    pub namespace: String,
    pub name: String,
    pub class: Option<String>,
    pub rules: Vec<IngressRuleDetail>,
    pub default_backend: Option<IngressBackendDetail>,
    pub addresses: Vec<String>,
    pub age_days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleItem {
    pub name: String,
    pub verbs: Vec<String>,
    pub rule_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectItem {
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBindingItem {
    pub name: String,
    pub role_name: String,
    pub subjects: Vec<SubjectItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountItem {
    pub namespace: String,
    pub name: String,
    pub secrets: usize,
    pub age: Option<Age>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyItem {
    pub namespace: String,
    pub name: String,
    pub pod_selector: String,
    pub policy_types: Vec<String>,
    pub ingress_rules: usize,
    pub egress_rules: usize,
    pub age: Option<Age>,
}
