//! Command-line surface
//!
//! Argument parsing, logging setup and the version flag.

mod logging;
mod version;

pub use logging::init_logging;
pub use version::{VERSION, display_version};

use crate::config::Config;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Kubernetes As-Built Assessment - a point-in-time report of a running cluster
#[derive(Parser, Debug)]
#[command(name = "kasba")]
#[command(about = "Kubernetes As-Built Assessment: inventory a running cluster", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Path to the kubeconfig file (falls back to KUBECONFIG, then ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, value_name = "NAME")]
    pub context: Option<String>,

    /// Report format
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Print version information and exit
    #[arg(long, short = 'v')]
    pub version: bool,
}

impl Args {
    /// Apply flag overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = self.output {
            config.output = output;
        }
    }
}
