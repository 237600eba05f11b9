//! Report rendering
//!
//! Turns a finished [`Snapshot`] into the text report or a machine-readable
//! document. Rendering never touches the cluster.

mod text;

pub use text::write_text;

use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output format for the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable assessment
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
    /// YAML document
    Yaml,
}

/// Render `snapshot` in the requested format
pub fn render<W: Write>(snapshot: &Snapshot, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(snapshot, &mut out).context("failed to write report")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, snapshot)
                .context("failed to serialize snapshot as JSON")?;
            writeln!(out).context("failed to write report")?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut out, snapshot)
                .context("failed to serialize snapshot as YAML")?;
        }
    }
    out.flush().context("failed to write report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Age, ServiceAccountItem};
    use chrono::{TimeZone, Utc};

    fn snapshot() -> Snapshot {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut snapshot = Snapshot::new(created, "0.4.0");
        let error = anyhow::anyhow!("unable to detect CNI");
        snapshot.errors.add(Some(error), false);
        snapshot
    }

    #[test]
    fn test_output_format_values() {
        assert_eq!(OutputFormat::from_str("yaml", true), Ok(OutputFormat::Yaml));
        assert!(OutputFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn test_render_json() {
        let mut buf = Vec::new();
        render(&snapshot(), OutputFormat::Json, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["bomFormat"], "kasba");
        assert_eq!(value["errors"]["hasErrors"], true);
        assert_eq!(value["errors"]["fatal"], false);
        assert_eq!(value["errors"]["errors"][0], "unable to detect CNI");
    }

    #[test]
    fn test_render_yaml() {
        let mut buf = Vec::new();
        render(&snapshot(), OutputFormat::Yaml, &mut buf).unwrap();

        let yaml = String::from_utf8(buf).unwrap();
        assert!(yaml.contains("bomFormat: kasba"));
        assert!(yaml.contains("version: 0.4.0"));
    }

    #[test]
    fn test_render_age_as_plain_string() {
        let mut snapshot = snapshot();
        snapshot.service_accounts.push(ServiceAccountItem {
            namespace: "default".to_string(),
            name: "builder".to_string(),
            secrets: 1,
            age: Some(Age::Days(31)),
        });

        let mut buf = Vec::new();
        render(&snapshot, OutputFormat::Yaml, &mut buf).unwrap();
        let yaml = String::from_utf8(buf).unwrap();
        assert!(yaml.contains("  age: 31d\n"));
        assert!(!yaml.contains('!'));

        let mut buf = Vec::new();
        render(&snapshot, OutputFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["serviceAccounts"][0]["age"], "31d");
    }
}
