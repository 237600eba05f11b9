//! Add-on presence checks

use crate::cluster::ClusterApi;
use anyhow::Result;
use kube::ResourceExt;

/// Whether a namespace with exactly this name exists.
///
/// A missing namespace is `Ok(false)`; only a failed query is an error.
pub async fn namespace_exists(api: &dyn ClusterApi, name: &str) -> Result<bool> {
    let namespaces = api.list_namespaces().await?;
    let found = namespaces.iter().any(|ns| ns.name_any() == name);
    tracing::debug!("Namespace {} present: {}", name, found);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::MockClusterApi;
    use crate::collect::fixtures::object;
    use anyhow::anyhow;
    use k8s_openapi::api::core::v1::Namespace;
    use serde_json::json;

    fn namespaces(names: &[&str]) -> Vec<Namespace> {
        names
            .iter()
            .map(|name| object(json!({"metadata": {"name": name}})))
            .collect()
    }

    #[tokio::test]
    async fn test_namespace_present() {
        let mut api = MockClusterApi::new();
        api.expect_list_namespaces()
            .returning(|| Ok(namespaces(&["default", "longhorn-system"])));

        assert!(namespace_exists(&api, "longhorn-system").await.unwrap());
    }

    #[tokio::test]
    async fn test_namespace_absent_is_not_an_error() {
        let mut api = MockClusterApi::new();
        api.expect_list_namespaces()
            .returning(|| Ok(namespaces(&["default", "longhorn"])));

        assert!(!namespace_exists(&api, "longhorn-system").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_failure_is_an_error() {
        let mut api = MockClusterApi::new();
        api.expect_list_namespaces()
            .returning(|| Err(anyhow!("failed to list namespaces")));

        let result = namespace_exists(&api, "cattle-monitoring-system").await;
        assert!(result.is_err());
    }
}
