//! Kubernetes control-plane access
//!
//! Handles connection to the Kubernetes API server and exposes the
//! read-only list queries the assessment needs.

mod api;
mod connect;

#[cfg(test)]
pub use api::MockClusterApi;
pub use api::{ClusterApi, KubeCluster};
pub use connect::{KubeconfigSource, resolve_from_env, resolve_kubeconfig};
