//! Plain-text assessment report

use crate::snapshot::{Age, NodeInfo, Snapshot};
use std::fmt::Display;
use std::io::{self, Write};

const RULE: &str = "#####################################################################";
const LABEL_WIDTH: usize = 22;
const NONE: &str = "-";

/// Write the text report.
///
/// A fatal snapshot prints only the banner, its errors and a notice.
pub fn write_text<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Kubernetes As-Built Assessment - KASBA")?;
    writeln!(
        out,
        "Date:          {}",
        snapshot.created_at.format("%A, %d-%b-%y %H:%M:%S UTC")
    )?;
    writeln!(out, "Format:        {}", snapshot.bom_format)?;
    writeln!(out, "KASBA Version: {}", snapshot.version)?;
    writeln!(out, "{}", RULE)?;

    if snapshot.errors.has_errors() {
        writeln!(out)?;
        writeln!(out, "Errors:")?;
        for error in snapshot.errors.errors() {
            writeln!(out, "  {:#}", error)?;
        }
    }

    if snapshot.is_fatal() {
        writeln!(out)?;
        writeln!(out, "Fatal errors, quitting.")?;
        return Ok(());
    }

    write_summary(snapshot, out)?;
    for node in &snapshot.node_info.nodes {
        write_node(node, out)?;
    }
    write_workloads(snapshot, out)?;
    write_storage(snapshot, out)?;
    write_network(snapshot, out)?;
    write_rbac(snapshot, out)
}

fn field<W: Write>(out: &mut W, label: &str, value: impl Display) -> io::Result<()> {
    let label = format!("{}:", label);
    writeln!(out, "{:<width$}{}", label, value, width = LABEL_WIDTH)
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--- {} ---", title)
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NONE)
}

fn list(values: &[String]) -> String {
    if values.is_empty() {
        NONE.to_string()
    } else {
        values.join(", ")
    }
}

fn days(age: Option<i64>) -> String {
    age.map_or_else(|| NONE.to_string(), |d| format!("{}d", d))
}

fn age(age: Option<Age>) -> String {
    age.map_or_else(|| NONE.to_string(), |age| age.to_string())
}

fn write_summary<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    if let Some(first) = snapshot.node_info.first() {
        field(out, "Cluster Name", or_none(&first.cluster_name))?;
        field(out, "Instance Type", or_none(&first.instance_type))?;
        field(out, "K8s Version", &first.kubelet_version)?;
    }
    field(out, "API Server", &snapshot.node_info.cluster)?;
    writeln!(out)?;
    field(out, "CNI", or_none(&snapshot.network_plugin))?;
    field(out, "Longhorn installed", snapshot.longhorn)?;
    field(out, "Monitoring installed", snapshot.monitoring)
}

fn write_node<W: Write>(node: &NodeInfo, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    field(out, "Cluster Machine Name", or_none(&node.machine))?;
    field(out, "Cluster Node Name", &node.name)?;
    field(out, "Roles", list(&node.roles))?;
    field(out, "Age", age(node.age))?;
    field(out, "Operating System", &node.operating_system)?;
    field(out, "OS Image", &node.os_image)?;
    field(out, "Node Arch", &node.architecture)?;
    field(out, "Kernel Version", &node.kernel_version)?;
    field(out, "System UUID", &node.system_uuid)?;
    field(out, "Container Runtime", &node.container_runtime)?;
    field(out, "Kube Version", &node.kubelet_version)?;
    field(out, "KubeProxy Version", &node.kube_proxy_version)?;
    field(out, "Internal IP", or_none(&node.internal_ip))?;
    field(out, "External IP", or_none(&node.external_ip))?;
    field(out, "Node Args", or_none(&node.node_args))?;
    field(out, "Pod CIDR", or_none(&node.pod_cidr))?;
    field(out, "Pod Limits", or_none(&node.pod_limits))?;
    field(out, "Pod Requests", or_none(&node.pod_requests))?;
    field(out, "Taints", list(&node.taints))?;

    heading(out, "Allocatable")?;
    field(out, "CPU", or_none(&node.allocatable.cpu))?;
    field(out, "Memory", or_none(&node.allocatable.memory))?;
    field(
        out,
        "Ephemeral Storage",
        or_none(&node.allocatable.ephemeral_storage),
    )?;
    field(out, "Pods", or_none(&node.allocatable.pods))?;

    heading(out, &format!("Messages {}", node.name))?;
    for condition in &node.conditions {
        writeln!(out, "  Condition Type: {}", condition.condition_type)?;
        let heartbeat = or_none(&condition.last_heartbeat_time);
        let transition = or_none(&condition.last_transition_time);
        writeln!(out, "    Last Heartbeat Time:  {}", heartbeat)?;
        writeln!(out, "    Last Transition Time: {}", transition)?;
        writeln!(out, "    Message: {}", or_none(&condition.message))?;
        writeln!(out, "    Reason: {}", or_none(&condition.reason))?;
        writeln!(out, "    Status: {}", condition.status)?;
    }
    Ok(())
}

fn write_workloads<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    heading(out, "Workload")?;
    if snapshot.workloads.is_empty() {
        return writeln!(out, "  none");
    }
    for namespace in snapshot.workloads.namespaces() {
        writeln!(out, "Namespace: {}", namespace.namespace)?;
        for group in &namespace.kinds {
            writeln!(out, "  {}:", group.kind)?;
            for name in &group.names {
                writeln!(out, "    {}", name)?;
            }
        }
    }
    Ok(())
}

fn write_storage<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    heading(out, "Storage Classes")?;
    if snapshot.storage_classes.is_empty() {
        writeln!(out, "  none")?;
    }
    for class in &snapshot.storage_classes {
        let default = if class.is_default { " (default)" } else { "" };
        writeln!(out, "{}{}", class.name, default)?;
        writeln!(out, "  Provisioner: {}", class.provisioner)?;
        writeln!(out, "  Reclaim Policy: {}", or_none(&class.reclaim_policy))?;
        writeln!(
            out,
            "  Binding Mode: {}",
            or_none(&class.volume_binding_mode)
        )?;
        writeln!(out, "  Allow Expansion: {}", class.allow_volume_expansion)?;
        for (key, value) in &class.parameters {
            writeln!(out, "  {}: {}", key, value)?;
        }
    }

    heading(out, "Persistent Volumes")?;
    if snapshot.persistent_volumes.is_empty() {
        writeln!(out, "  none")?;
    }
    for pv in &snapshot.persistent_volumes {
        writeln!(
            out,
            "{} {} [{}] {} {} claim={} class={} age={}",
            pv.name,
            pv.size,
            list(&pv.access_modes),
            or_none(&pv.reclaim_policy),
            or_none(&pv.phase),
            or_none(&pv.claim),
            or_none(&pv.storage_class),
            days(pv.age_days)
        )?;
    }

    heading(out, "Persistent Volume Claims")?;
    if snapshot.persistent_volume_claims.is_empty() {
        writeln!(out, "  none")?;
    }
    for pvc in &snapshot.persistent_volume_claims {
        writeln!(
            out,
            "{}/{} {} volume={} capacity={} [{}] class={} age={}",
            pvc.namespace,
            pvc.name,
            or_none(&pvc.phase),
            or_none(&pvc.volume),
            or_none(&pvc.capacity),
            list(&pvc.access_modes),
            or_none(&pvc.storage_class),
            days(pvc.age_days)
        )?;
    }

    heading(out, "Config Maps")?;
    if snapshot.config_maps.is_empty() {
        writeln!(out, "  none")?;
    }
    for cm in &snapshot.config_maps {
        writeln!(
            out,
            "{}/{} keys=[{}] age={}",
            cm.namespace,
            cm.name,
            list(&cm.keys),
            days(cm.age_days)
        )?;
    }
    Ok(())
}

fn write_network<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    heading(out, "Services")?;
    if snapshot.services.is_empty() {
        writeln!(out, "  none")?;
    }
    for svc in &snapshot.services {
        writeln!(
            out,
            "{}/{} {} cluster-ip={} external-ip={} ports=[{}] age={}",
            svc.namespace,
            svc.name,
            svc.service_type,
            or_none(&svc.cluster_ip),
            or_none(&svc.external_ip),
            list(&svc.ports),
            days(svc.age_days)
        )?;
    }

    heading(out, "Ingresses")?;
    if snapshot.ingresses.is_empty() {
        writeln!(out, "  none")?;
    }
    for ingress in &snapshot.ingresses {
        writeln!(
            out,
            "{}/{} class={} addresses=[{}] age={}",
            ingress.namespace,
            ingress.name,
            or_none(&ingress.class),
            list(&ingress.addresses),
            days(ingress.age_days)
        )?;
        for rule in &ingress.rules {
            writeln!(out, "  {} -> {}", rule.host, list(&rule.paths))?;
        }
        if let Some(backend) = &ingress.default_backend {
            writeln!(
                out,
                "  default -> {}:{}",
                backend.service_name, backend.service_port
            )?;
        }
    }

    heading(out, "Network Policies")?;
    if snapshot.network_policies.is_empty() {
        writeln!(out, "  none")?;
    }
    for policy in &snapshot.network_policies {
        writeln!(
            out,
            "{}/{} selector={} types=[{}] ingress={} egress={} age={}",
            policy.namespace,
            policy.name,
            policy.pod_selector,
            list(&policy.policy_types),
            policy.ingress_rules,
            policy.egress_rules,
            age(policy.age)
        )?;
    }
    Ok(())
}

fn write_rbac<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    heading(out, "Cluster Roles")?;
    if snapshot.cluster_roles.is_empty() {
        writeln!(out, "  none")?;
    }
    for role in &snapshot.cluster_roles {
        writeln!(
            out,
            "{} rules={} verbs=[{}]",
            role.name,
            role.rule_count,
            list(&role.verbs)
        )?;
    }

    heading(out, "Cluster Role Bindings")?;
    if snapshot.cluster_role_bindings.is_empty() {
        writeln!(out, "  none")?;
    }
    for binding in &snapshot.cluster_role_bindings {
        writeln!(out, "{} -> {}", binding.name, binding.role_name)?;
        for subject in &binding.subjects {
            match &subject.namespace {
                Some(ns) => writeln!(out, "  {} {}/{}", subject.kind, ns, subject.name)?,
                None => writeln!(out, "  {} {}", subject.kind, subject.name)?,
            }
        }
    }

    heading(out, "Service Accounts")?;
    if snapshot.service_accounts.is_empty() {
        writeln!(out, "  none")?;
    }
    for account in &snapshot.service_accounts {
        writeln!(
            out,
            "{}/{} secrets={} age={}",
            account.namespace,
            account.name,
            account.secrets,
            age(account.age)
        )?;
    }
    Ok(())
}
