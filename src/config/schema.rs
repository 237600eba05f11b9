//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde.

use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Report format written to stdout
    #[serde(default)]
    pub output: OutputFormat,

    /// Pod name markers used to detect the CNI
    #[serde(default = "default_network_plugins")]
    pub network_plugins: Vec<String>,

    /// Namespaces whose presence marks an installed add-on
    #[serde(default)]
    pub addons: AddonsConfig,
}

/// Add-on presence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddonsConfig {
    /// Distributed storage (Longhorn)
    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,

    /// Rancher monitoring stack
    #[serde(default = "default_monitoring_namespace")]
    pub monitoring_namespace: String,
}

fn default_network_plugins() -> Vec<String> {
    vec!["calico".to_string(), "cilium".to_string()]
}

fn default_storage_namespace() -> String {
    "longhorn-system".to_string()
}

fn default_monitoring_namespace() -> String {
    "cattle-monitoring-system".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            network_plugins: default_network_plugins(),
            addons: AddonsConfig::default(),
        }
    }
}

impl Default for AddonsConfig {
    fn default() -> Self {
        Self {
            storage_namespace: default_storage_namespace(),
            monitoring_namespace: default_monitoring_namespace(),
        }
    }
}
