//! Read-only query surface over the cluster control plane
//!
//! The assessment only ever lists objects. `ClusterApi` exposes one list
//! query per resource kind so collectors can be exercised against fakes,
//! while `KubeCluster` answers them from a live API server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Service,
    ServiceAccount,
};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use k8s_openapi::api::storage::v1::StorageClass;
use kube::api::ListParams;
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// List queries used by the collectors, always across all namespaces
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// API server URL of the connected cluster
    fn cluster_url(&self) -> String;

    async fn list_nodes(&self) -> Result<Vec<Node>>;
    async fn list_pods(&self) -> Result<Vec<Pod>>;
    async fn list_namespaces(&self) -> Result<Vec<Namespace>>;
    async fn list_deployments(&self) -> Result<Vec<Deployment>>;
    async fn list_daemon_sets(&self) -> Result<Vec<DaemonSet>>;
    async fn list_stateful_sets(&self) -> Result<Vec<StatefulSet>>;
    async fn list_storage_classes(&self) -> Result<Vec<StorageClass>>;
    async fn list_persistent_volumes(&self) -> Result<Vec<PersistentVolume>>;
    async fn list_persistent_volume_claims(&self) -> Result<Vec<PersistentVolumeClaim>>;
    async fn list_config_maps(&self) -> Result<Vec<ConfigMap>>;
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn list_ingresses(&self) -> Result<Vec<Ingress>>;
    async fn list_cluster_roles(&self) -> Result<Vec<ClusterRole>>;
    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>>;
    async fn list_service_accounts(&self) -> Result<Vec<ServiceAccount>>;
    async fn list_network_policies(&self) -> Result<Vec<NetworkPolicy>>;
}

/// `ClusterApi` backed by a kube-rs client
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    cluster_url: String,
}

impl KubeCluster {
    pub fn new(client: Client, cluster_url: impl Into<String>) -> Self {
        Self {
            client,
            cluster_url: cluster_url.into(),
        }
    }

    async fn list_all<K>(&self, plural: &str) -> Result<Vec<K>>
    where
        K: kube::Resource + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        tracing::debug!("Listing {} across all namespaces", plural);
        let api: Api<K> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .with_context(|| format!("failed to list {}", plural))?;
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    fn cluster_url(&self) -> String {
        self.cluster_url.clone()
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        self.list_all("nodes").await
    }

    async fn list_pods(&self) -> Result<Vec<Pod>> {
        self.list_all("pods").await
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        self.list_all("namespaces").await
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        self.list_all("deployments").await
    }

    async fn list_daemon_sets(&self) -> Result<Vec<DaemonSet>> {
        self.list_all("daemonsets").await
    }

    async fn list_stateful_sets(&self) -> Result<Vec<StatefulSet>> {
        self.list_all("statefulsets").await
    }

    async fn list_storage_classes(&self) -> Result<Vec<StorageClass>> {
        self.list_all("storage classes").await
    }

    async fn list_persistent_volumes(&self) -> Result<Vec<PersistentVolume>> {
        self.list_all("persistent volumes").await
    }

    async fn list_persistent_volume_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        self.list_all("persistent volume claims").await
    }

    async fn list_config_maps(&self) -> Result<Vec<ConfigMap>> {
        self.list_all("config maps").await
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.list_all("services").await
    }

    async fn list_ingresses(&self) -> Result<Vec<Ingress>> {
        self.list_all("ingresses").await
    }

    async fn list_cluster_roles(&self) -> Result<Vec<ClusterRole>> {
        self.list_all("cluster roles").await
    }

    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>> {
        self.list_all("cluster role bindings").await
    }

    async fn list_service_accounts(&self) -> Result<Vec<ServiceAccount>> {
        self.list_all("service accounts").await
    }

    async fn list_network_policies(&self) -> Result<Vec<NetworkPolicy>> {
        self.list_all("network policies").await
    }
}
