//! Workload tree grouping
//!
//! Flattens per-kind workload listings into a namespace -> kind -> names
//! hierarchy. Namespaces and kinds keep the order in which they were first
//! seen; names keep call order.

use serde::Serialize;
use std::fmt;

/// Workload kinds collected into the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorkloadKind {
    Deployment,
    DaemonSet,
    StatefulSet,
}

impl WorkloadKind {
    /// All kinds, in collection order
    pub const ALL: [WorkloadKind; 3] = [
        WorkloadKind::Deployment,
        WorkloadKind::DaemonSet,
        WorkloadKind::StatefulSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::DaemonSet => "DaemonSet",
            WorkloadKind::StatefulSet => "StatefulSet",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observed workload, as emitted by a collector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadRecord {
    pub name: String,
    pub namespace: String,
    pub kind: WorkloadKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindGroup {
    pub kind: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceGroup {
    pub namespace: String,
    pub kinds: Vec<KindGroup>,
}

/// Namespace-then-kind grouping of workload names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkloadTree {
    namespaces: Vec<NamespaceGroup>,
}

impl WorkloadTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a workload name under its namespace and kind.
    ///
    /// Identical triples are not deduplicated; each call appends a name.
    pub fn add_workload(&mut self, namespace: &str, kind: &str, name: &str) {
        let ns_index = match self
            .namespaces
            .iter()
            .position(|group| group.namespace == namespace)
        {
            Some(index) => index,
            None => {
                self.namespaces.push(NamespaceGroup {
                    namespace: namespace.to_string(),
                    kinds: Vec::new(),
                });
                self.namespaces.len() - 1
            }
        };

        let kinds = &mut self.namespaces[ns_index].kinds;
        match kinds.iter_mut().find(|group| group.kind == kind) {
            Some(group) => group.names.push(name.to_string()),
            None => kinds.push(KindGroup {
                kind: kind.to_string(),
                names: vec![name.to_string()],
            }),
        }
    }

    pub fn add_record(&mut self, record: &WorkloadRecord) {
        self.add_workload(&record.namespace, record.kind.as_str(), &record.name);
    }

    pub fn namespaces(&self) -> &[NamespaceGroup] {
        &self.namespaces
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Total number of workload names across all groups
    pub fn workload_count(&self) -> usize {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.kinds.iter())
            .map(|kind| kind.names.len())
            .sum()
    }
}

impl Extend<WorkloadRecord> for WorkloadTree {
    fn extend<I: IntoIterator<Item = WorkloadRecord>>(&mut self, records: I) {
        for record in records {
            self.add_record(&record);
        }
    }
}

impl FromIterator<WorkloadRecord> for WorkloadTree {
    fn from_iter<I: IntoIterator<Item = WorkloadRecord>>(records: I) -> Self {
        let mut tree = WorkloadTree::new();
        tree.extend(records);
        tree
    }
}
