//! Kubernetes As-Built Assessment
//!
//! This library inventories a running cluster into a [`Snapshot`] and
//! renders it as a report. It backs the `kasba` binary and is used directly
//! by the integration tests.

pub mod assemble;
pub mod cli;
pub mod cluster;
pub mod collect;
pub mod config;
pub mod report;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use assemble::{assemble, collect_all};
pub use cluster::{ClusterApi, KubeCluster, KubeconfigSource};
pub use config::{Config, ConfigLoader};
pub use report::{OutputFormat, render};
pub use snapshot::{ErrorAccumulator, Snapshot, SnapshotError, WorkloadTree};
