//! Assessment snapshot model
//!
//! A `Snapshot` is built empty at the start of a run, filled field by field
//! as each collector finishes, and then handed to a renderer.

mod age;
mod errors;
mod items;
mod workload;

pub use age::{Age, age_in_days, to_utc};
pub use errors::{ErrorAccumulator, Halt, SnapshotError};
pub use items::*;
pub use workload::{KindGroup, NamespaceGroup, WorkloadKind, WorkloadRecord, WorkloadTree};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Format tag written into every report
pub const BOM_FORMAT: &str = "kasba";

/// Point-in-time assessment of one cluster
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub created_at: DateTime<Utc>,
    pub bom_format: String,
    pub version: String,
    pub node_info: NodeInventory,
    pub network_plugin: Option<String>,
    pub longhorn: bool,
    pub monitoring: bool,
    pub workloads: WorkloadTree,
    pub storage_classes: Vec<StorageClassItem>,
    pub persistent_volumes: Vec<PersistentVolumeItem>,
    pub persistent_volume_claims: Vec<PersistentVolumeClaimItem>,
    pub config_maps: Vec<ConfigMapItem>,
    pub services: Vec<ServiceItem>,
    pub ingresses: Vec<IngressItem>,
    pub cluster_roles: Vec<ClusterRoleItem>,
    pub cluster_role_bindings: Vec<ClusterRoleBindingItem>,
    pub service_accounts: Vec<ServiceAccountItem>,
    pub network_policies: Vec<NetworkPolicyItem>,
    pub errors: ErrorAccumulator,
}

impl Snapshot {
    pub fn new(created_at: DateTime<Utc>, version: impl Into<String>) -> Self {
        Self {
            created_at,
            bom_format: BOM_FORMAT.to_string(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.errors.is_fatal()
    }
}
