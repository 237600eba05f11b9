//! Network plugin detection, services, ingresses and network policies

use super::{collect, creation_age, creation_age_days};
use crate::cluster::ClusterApi;
use crate::snapshot::{
    IngressBackendDetail, IngressItem, IngressRuleDetail, NetworkPolicyItem, ServiceItem,
    SnapshotError,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy, ServiceBackendPort};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::ResourceExt;

/// Find the CNI plugin name from the first pod whose name contains one of
/// `plugins`, truncated at its first `-`.
pub fn detect_network_plugin(pods: &[Pod], plugins: &[String]) -> Option<String> {
    pods.iter()
        .map(|pod| pod.name_any())
        .find(|name| plugins.iter().any(|plugin| name.contains(plugin.as_str())))
        .map(|name| match name.split_once('-') {
            Some((head, _)) => head.to_string(),
            None => name,
        })
}

/// Detect the network plugin; a cluster with no matching pod is an error
pub async fn collect_network_plugin(api: &dyn ClusterApi, plugins: &[String]) -> Result<String> {
    let pods = api.list_pods().await?;
    match detect_network_plugin(&pods, plugins) {
        Some(plugin) => {
            tracing::debug!("Detected network plugin {}", plugin);
            Ok(plugin)
        }
        None => Err(SnapshotError::NetworkPluginUndetected(plugins.join("|")).into()),
    }
}

pub fn normalize_service(service: &Service, now: DateTime<Utc>) -> ServiceItem {
    let mut item = ServiceItem {
        namespace: service.namespace().unwrap_or_default(),
        name: service.name_any(),
        service_type: "ClusterIP".to_string(),
        age_days: creation_age_days(service, now),
        ..Default::default()
    };

    if let Some(spec) = &service.spec {
        if let Some(service_type) = &spec.type_ {
            item.service_type = service_type.clone();
        }
        item.cluster_ip = spec.cluster_ip.clone();
        item.ports = spec
            .ports
            .iter()
            .flatten()
            .map(|port| {
                let protocol = port.protocol.as_deref().unwrap_or("TCP");
                match port.node_port {
                    Some(node_port) => format!("{}:{}/{}", port.port, node_port, protocol),
                    None => format!("{}/{}", port.port, protocol),
                }
            })
            .collect();
    }

    item.external_ip = service
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .and_then(|ingress| ingress.first())
        .and_then(|first| first.ip.clone().or_else(|| first.hostname.clone()));

    item
}

pub async fn collect_services(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<ServiceItem>> {
    let to_item = |s: &Service| Some(normalize_service(s, now));
    collect("services", api.list_services(), to_item).await
}

fn backend_port(port: Option<&ServiceBackendPort>) -> String {
    let Some(port) = port else {
        return String::new();
    };
    match (port.number, &port.name) {
        (Some(number), _) => number.to_string(),
        (None, Some(name)) => name.clone(),
        (None, None) => String::new(),
    }
}

pub fn normalize_ingress(ingress: &Ingress, now: DateTime<Utc>) -> IngressItem {
    let mut item = IngressItem {
        namespace: ingress.namespace().unwrap_or_default(),
        name: ingress.name_any(),
        age_days: creation_age_days(ingress, now),
        ..Default::default()
    };

    if let Some(spec) = &ingress.spec {
        item.class = spec.ingress_class_name.clone();
        item.rules = spec
            .rules
            .iter()
            .flatten()
            .map(|rule| IngressRuleDetail {
                host: rule.host.clone().unwrap_or_else(|| "*".to_string()),
                paths: rule
                    .http
                    .iter()
                    .flat_map(|http| http.paths.iter())
                    .map(|path| path.path.clone().unwrap_or_else(|| "/".to_string()))
                    .collect(),
            })
            .collect();
        item.default_backend = spec
            .default_backend
            .as_ref()
            .and_then(|backend| backend.service.as_ref())
            .map(|service| IngressBackendDetail {
                service_name: service.name.clone(),
                service_port: backend_port(service.port.as_ref()),
            });
    }

    let lb_ingress = ingress
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref());
    for address in lb_ingress.into_iter().flatten() {
        for value in [&address.ip, &address.hostname].into_iter().flatten() {
            if !value.is_empty() {
                item.addresses.push(value.clone());
            }
        }
    }

    item
}

pub async fn collect_ingresses(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<IngressItem>> {
    let to_item = |i: &Ingress| Some(normalize_ingress(i, now));
    collect("ingresses", api.list_ingresses(), to_item).await
}

/// Render a label selector as `k=v,k2 In (a,b)`, or `<all>` when empty
fn format_selector(selector: Option<&LabelSelector>) -> String {
    let mut terms: Vec<String> = Vec::new();

    if let Some(selector) = selector {
        for (key, value) in selector.match_labels.iter().flatten() {
            terms.push(format!("{}={}", key, value));
        }
        for expr in selector.match_expressions.iter().flatten() {
            let values = expr.values.as_deref().unwrap_or_default();
            if values.is_empty() {
                terms.push(format!("{} {}", expr.key, expr.operator));
            } else {
                let values = values.join(",");
                terms.push(format!("{} {} ({})", expr.key, expr.operator, values));
            }
        }
    }

    if terms.is_empty() {
        "<all>".to_string()
    } else {
        terms.join(",")
    }
}

pub fn normalize_network_policy(policy: &NetworkPolicy, now: DateTime<Utc>) -> NetworkPolicyItem {
    let spec = policy.spec.as_ref();

    NetworkPolicyItem {
        namespace: policy.namespace().unwrap_or_default(),
        name: policy.name_any(),
        pod_selector: format_selector(spec.and_then(|s| s.pod_selector.as_ref())),
        policy_types: spec
            .and_then(|s| s.policy_types.clone())
            .unwrap_or_default(),
        ingress_rules: spec.and_then(|s| s.ingress.as_ref()).map_or(0, Vec::len),
        egress_rules: spec.and_then(|s| s.egress.as_ref()).map_or(0, Vec::len),
        age: creation_age(policy, now),
    }
}

pub async fn collect_network_policies(
    api: &dyn ClusterApi,
    now: DateTime<Utc>,
) -> Result<Vec<NetworkPolicyItem>> {
    let to_item = |p: &NetworkPolicy| Some(normalize_network_policy(p, now));
    collect("network policies", api.list_network_policies(), to_item).await
}
