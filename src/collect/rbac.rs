//! Cluster roles, bindings and service accounts

use super::{collect, creation_age};
use crate::cluster::ClusterApi;
use crate::snapshot::{ClusterRoleBindingItem, ClusterRoleItem, ServiceAccountItem, SubjectItem};
use anyhow::Result;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};
use kube::ResourceExt;

/// Verbs are the union across rules, in first-seen order
pub fn normalize_cluster_role(role: &ClusterRole) -> ClusterRoleItem {
    let rules = role.rules.as_deref().unwrap_or_default();
    let mut verbs: Vec<String> = Vec::new();
    for verb in rules.iter().flat_map(|rule| rule.verbs.iter()) {
        if !verbs.contains(verb) {
            verbs.push(verb.clone());
        }
    }

    ClusterRoleItem {
        name: role.name_any(),
        verbs,
        rule_count: rules.len(),
    }
}

pub async fn collect_cluster_roles(api: &dyn ClusterApi) -> Result<Vec<ClusterRoleItem>> {
    let to_item = |r: &ClusterRole| Some(normalize_cluster_role(r));
    collect("cluster roles", api.list_cluster_roles(), to_item).await
}

pub fn normalize_cluster_role_binding(binding: &ClusterRoleBinding) -> ClusterRoleBindingItem {
    ClusterRoleBindingItem {
        name: binding.name_any(),
        role_name: binding.role_ref.name.clone(),
        subjects: binding
            .subjects
            .iter()
            .flatten()
            .map(|subject| SubjectItem {
                kind: subject.kind.clone(),
                namespace: subject.namespace.clone(),
                name: subject.name.clone(),
            })
            .collect(),
    }
}

pub async fn collect_cluster_role_bindings(
    api: &dyn ClusterApi,
) -> Result<Vec<ClusterRoleBindingItem>> {
    let to_item = |b: &ClusterRoleBinding| Some(normalize_cluster_role_binding(b));
    let query = api.list_cluster_role_bindings();
    collect("cluster role bindings", query, to_item).await
}

pub fn normalize_service_account(
    account: &ServiceAccount,
    now: DateTime<Utc>,
) -> ServiceAccountItem {
    ServiceAccountItem {
        namespace: account.namespace().unwrap_or_default(),
        name: account.name_any(),
        secrets: account.secrets.as_ref().map_or(0, Vec::len),
        age: creation_age(account, now),
    }
}

pub async fn collect_service_accounts(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<ServiceAccountItem>> {
    let to_item = |a: &ServiceAccount| Some(normalize_service_account(a, now));
    collect("service accounts", api.list_service_accounts(), to_item).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::MockClusterApi;
    use crate::collect::fixtures::{now, object};
    use crate::snapshot::Age;
    use anyhow::anyhow;
    use serde_json::json;

    #[test]
    fn test_cluster_role_verbs_are_deduplicated() {
        let role: ClusterRole = object(json!({
            "metadata": {"name": "view"},
            "rules": [
                {"apiGroups": [""], "resources": ["pods"], "verbs": ["get", "list", "watch"]},
                {"apiGroups": ["apps"], "resources": ["deployments"], "verbs": ["list", "get"]},
                {"nonResourceURLs": ["/healthz"], "verbs": ["get"]}
            ]
        }));

        let item = normalize_cluster_role(&role);
        assert_eq!(item.name, "view");
        assert_eq!(item.verbs, vec!["get", "list", "watch"]);
        assert_eq!(item.rule_count, 3);
    }

    #[test]
    fn test_aggregated_role_without_rules() {
        let role: ClusterRole = object(json!({"metadata": {"name": "admin"}}));
        let item = normalize_cluster_role(&role);
        assert!(item.verbs.is_empty());
        assert_eq!(item.rule_count, 0);
    }

    #[test]
    fn test_normalize_binding() {
        let binding: ClusterRoleBinding = object(json!({
            "metadata": {"name": "cluster-admins"},
            "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "ClusterRole", "name": "cluster-admin"},
            "subjects": [
                {"kind": "Group", "name": "system:masters", "apiGroup": "rbac.authorization.k8s.io"},
                {"kind": "ServiceAccount", "name": "helm", "namespace": "kube-system"}
            ]
        }));

        let item = normalize_cluster_role_binding(&binding);
        assert_eq!(item.role_name, "cluster-admin");
        assert_eq!(item.subjects.len(), 2);
        assert_eq!(item.subjects[0].namespace, None);
        assert_eq!(item.subjects[1].kind, "ServiceAccount");
        assert_eq!(item.subjects[1].namespace.as_deref(), Some("kube-system"));
    }

    #[test]
    fn test_normalize_service_account() {
        let account: ServiceAccount = object(json!({
            "metadata": {
                "name": "default",
                "namespace": "apps",
                "creationTimestamp": "2024-06-01T09:30:00Z"
            },
            "secrets": [{"name": "default-token-abcde"}]
        }));

        let item = normalize_service_account(&account, now());
        assert_eq!(item.namespace, "apps");
        assert_eq!(item.secrets, 1);
        assert_eq!(item.age, Some(Age::Hours(2)));
    }

    #[tokio::test]
    async fn test_service_account_failure_is_reported() {
        let mut api = MockClusterApi::new();
        api.expect_list_service_accounts()
            .returning(|| Err(anyhow!("failed to list serviceaccounts: forbidden")));

        let err = collect_service_accounts(&api, now()).await.unwrap_err();
        assert!(err.to_string().contains("serviceaccounts"));
    }
}
