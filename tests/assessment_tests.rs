//! End-to-end assessment tests against an in-memory cluster
//!
//! `FakeCluster` answers every list query from canned objects, and any
//! query can be made to fail. Each call is recorded so tests can check
//! which steps ran.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Service,
    ServiceAccount,
};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::api::storage::v1::StorageClass;
use kasba::{ClusterApi, Config, Snapshot, assemble, collect_all};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Mutex;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn object<K: DeserializeOwned>(value: Value) -> K {
    serde_json::from_value(value).expect("fixture must deserialize")
}

#[derive(Default)]
struct FakeCluster {
    nodes: Vec<Value>,
    pods: Vec<Value>,
    namespaces: Vec<Value>,
    deployments: Vec<Value>,
    daemon_sets: Vec<Value>,
    stateful_sets: Vec<Value>,
    services: Vec<Value>,
    service_accounts: Vec<Value>,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeCluster {
    /// One control-plane node, Calico, Longhorn and a small workload set
    fn rke2() -> Self {
        Self {
            nodes: vec![json!({
                "metadata": {
                    "name": "cp-1",
                    "creationTimestamp": "2024-05-01T12:00:00Z",
                    "labels": {"node-role.kubernetes.io/control-plane": "true"},
                    "annotations": {"cluster.x-k8s.io/cluster-name": "prod"}
                },
                "status": {"nodeInfo": {
                    "architecture": "amd64", "bootID": "", "containerRuntimeVersion": "containerd://1.7",
                    "kernelVersion": "5.14", "kubeProxyVersion": "v1.28.9+rke2r1",
                    "kubeletVersion": "v1.28.9+rke2r1", "machineID": "", "operatingSystem": "linux",
                    "osImage": "SLES 15", "systemUUID": "uuid-1"
                }}
            })],
            pods: vec![
                json!({"metadata": {"name": "coredns-5d78c9869d-abcde", "namespace": "kube-system"}}),
                json!({"metadata": {"name": "calico-kube-controllers-7f9c", "namespace": "calico-system"}}),
            ],
            namespaces: vec![
                json!({"metadata": {"name": "default"}}),
                json!({"metadata": {"name": "longhorn-system"}}),
            ],
            deployments: vec![
                json!({"metadata": {"name": "web", "namespace": "default"}}),
                json!({"metadata": {"name": "api", "namespace": "default"}}),
            ],
            daemon_sets: vec![json!({"metadata": {"name": "proxy", "namespace": "kube-system"}})],
            services: vec![json!({
                "metadata": {"name": "web", "namespace": "default"},
                "spec": {"type": "ClusterIP", "clusterIP": "10.43.0.10", "ports": [{"port": 80, "protocol": "TCP"}]}
            })],
            service_accounts: vec![json!({"metadata": {"name": "default", "namespace": "default"}})],
            ..Default::default()
        }
    }

    fn failing(mut self, query: &'static str) -> Self {
        self.failing.insert(query);
        self
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<K: DeserializeOwned>(&self, query: &'static str, items: &[Value]) -> Result<Vec<K>> {
        self.calls.lock().unwrap().push(query);
        if self.failing.contains(query) {
            return Err(anyhow!("failed to list {}: forbidden", query));
        }
        Ok(items.iter().cloned().map(object).collect())
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    fn cluster_url(&self) -> String {
        "https://10.0.0.1:6443/".to_string()
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.answer("nodes", &self.nodes)
    }

    async fn list_pods(&self) -> Result<Vec<Pod>> {
        self.answer("pods", &self.pods)
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        self.answer("namespaces", &self.namespaces)
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        self.answer("deployments", &self.deployments)
    }

    async fn list_daemon_sets(&self) -> Result<Vec<DaemonSet>> {
        self.answer("daemonsets", &self.daemon_sets)
    }

    async fn list_stateful_sets(&self) -> Result<Vec<StatefulSet>> {
        self.answer("statefulsets", &self.stateful_sets)
    }

    async fn list_storage_classes(&self) -> Result<Vec<StorageClass>> {
        self.answer("storageclasses", &[])
    }

    async fn list_persistent_volumes(&self) -> Result<Vec<PersistentVolume>> {
        self.answer("persistentvolumes", &[])
    }

    async fn list_persistent_volume_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        self.answer("persistentvolumeclaims", &[])
    }

    async fn list_config_maps(&self) -> Result<Vec<ConfigMap>> {
        self.answer("configmaps", &[])
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.answer("services", &self.services)
    }

    async fn list_ingresses(&self) -> Result<Vec<Ingress>> {
        self.answer("ingresses", &[])
    }

    async fn list_cluster_roles(&self) -> Result<Vec<ClusterRole>> {
        self.answer("clusterroles", &[])
    }

    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>> {
        self.answer("clusterrolebindings", &[])
    }

    async fn list_service_accounts(&self) -> Result<Vec<ServiceAccount>> {
        self.answer("serviceaccounts", &self.service_accounts)
    }

    async fn list_network_policies(&self) -> Result<Vec<NetworkPolicy>> {
        self.answer("networkpolicies", &[])
    }
}

/// Run every collection step against `cluster`, returning the snapshot and
/// the queries it issued
async fn run(cluster: FakeCluster) -> (Snapshot, Vec<&'static str>) {
    let mut snapshot = Snapshot::new(now(), "0.4.0");
    let _ = collect_all(&cluster, &mut snapshot, &Config::default()).await;
    (snapshot, cluster.calls())
}

#[tokio::test]
async fn test_full_assessment() {
    let (snapshot, calls) = run(FakeCluster::rke2()).await;

    assert!(!snapshot.errors.has_errors());
    assert_eq!(snapshot.node_info.cluster, "https://10.0.0.1:6443/");
    assert_eq!(
        snapshot.node_info.nodes[0].cluster_name.as_deref(),
        Some("prod")
    );
    assert_eq!(snapshot.network_plugin.as_deref(), Some("calico"));
    assert!(snapshot.longhorn);
    assert!(!snapshot.monitoring);
    assert_eq!(snapshot.workloads.namespaces().len(), 2);
    assert_eq!(
        snapshot.workloads.namespaces()[0].kinds[0].names,
        vec!["web", "api"]
    );
    assert_eq!(snapshot.services[0].ports, vec!["80/TCP"]);
    assert_eq!(snapshot.service_accounts.len(), 1);

    assert_eq!(
        calls,
        vec![
            "nodes",
            "pods",
            "namespaces",
            "namespaces",
            "deployments",
            "daemonsets",
            "statefulsets",
            "storageclasses",
            "persistentvolumes",
            "persistentvolumeclaims",
            "configmaps",
            "services",
            "ingresses",
            "clusterroles",
            "clusterrolebindings",
            "serviceaccounts",
            "networkpolicies",
        ]
    );
}

#[tokio::test]
async fn test_service_account_failure_keeps_going() {
    let (snapshot, calls) = run(FakeCluster::rke2().failing("serviceaccounts")).await;

    assert!(snapshot.service_accounts.is_empty());
    assert!(snapshot.errors.has_errors());
    assert!(!snapshot.errors.is_fatal());
    assert_eq!(snapshot.errors.len(), 1);
    assert_eq!(calls.last(), Some(&"networkpolicies"));
    assert_eq!(snapshot.services.len(), 1);
}

#[tokio::test]
async fn test_zero_nodes_stops_after_node_query() {
    let cluster = FakeCluster {
        nodes: vec![],
        ..FakeCluster::rke2()
    };
    let (snapshot, calls) = run(cluster).await;

    assert!(snapshot.errors.is_fatal());
    assert_eq!(calls, vec!["nodes"]);
    assert!(snapshot.workloads.is_empty());
    assert_eq!(snapshot.network_plugin, None);
}

#[tokio::test]
async fn test_node_query_failure_is_fatal() {
    let (snapshot, calls) = run(FakeCluster::rke2().failing("nodes")).await;

    assert!(snapshot.errors.is_fatal());
    assert_eq!(calls, vec!["nodes"]);
    assert_eq!(
        format!("{:#}", snapshot.errors.errors()[0]),
        "failed to list nodes: forbidden"
    );
}

#[tokio::test]
async fn test_undetected_network_plugin_is_not_fatal() {
    let cluster = FakeCluster {
        pods: vec![json!({"metadata": {"name": "coredns-abc", "namespace": "kube-system"}})],
        ..FakeCluster::rke2()
    };
    let (snapshot, _) = run(cluster).await;

    assert!(!snapshot.errors.is_fatal());
    assert_eq!(snapshot.network_plugin, None);
    let message = snapshot.errors.errors()[0].to_string();
    assert!(message.contains("calico|cilium"));
    assert_eq!(snapshot.workloads.workload_count(), 3);
}

#[tokio::test]
async fn test_every_non_fatal_failure_is_reported() {
    let cluster = FakeCluster::rke2()
        .failing("deployments")
        .failing("storageclasses")
        .failing("networkpolicies");
    let (snapshot, calls) = run(cluster).await;

    assert!(!snapshot.errors.is_fatal());
    assert_eq!(snapshot.errors.len(), 3);
    assert_eq!(calls.len(), 17);
    // DaemonSets still land in the tree
    assert_eq!(snapshot.workloads.namespaces()[0].namespace, "kube-system");
}

#[tokio::test]
async fn test_connection_failure_yields_error_only_snapshot() {
    let connect = async { Err::<FakeCluster, _>(anyhow!("failed to build config: no kubeconfig")) };
    let snapshot = assemble(connect, &Config::default(), now(), "0.4.0").await;

    assert!(snapshot.errors.is_fatal());
    assert_eq!(snapshot.errors.len(), 1);
    assert!(snapshot.node_info.nodes.is_empty());
}

#[tokio::test]
async fn test_assemble_stamps_snapshot() {
    let connect = async { Ok(FakeCluster::rke2()) };
    let snapshot = assemble(connect, &Config::default(), now(), "0.4.0").await;

    assert!(!snapshot.errors.has_errors());
    assert_eq!(snapshot.created_at, now());
    assert_eq!(snapshot.bom_format, "kasba");
    assert_eq!(snapshot.version, "0.4.0");
    assert_eq!(
        snapshot.node_info.nodes[0].age,
        Some(kasba::snapshot::Age::Days(31))
    );
}
