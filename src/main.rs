//! KASBA - Kubernetes As-Built Assessment
//!
//! Collects one point-in-time snapshot of a cluster and writes the report
//! to stdout. Cluster failures end up in the report itself; only an
//! unusable configuration or a failed write makes the process exit non-zero.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use kasba::cli::{self, Args};
use kasba::cluster::{KubeCluster, resolve_from_env};
use kasba::{ConfigLoader, assemble, render};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        cli::display_version();
        return Ok(());
    }

    cli::init_logging(args.debug);

    let mut config = ConfigLoader::load().context("Failed to load configuration")?;
    args.apply(&mut config);
    tracing::debug!(
        "Configuration loaded: output={:?}, networkPlugins={:?}",
        config.output,
        config.network_plugins
    );

    let source = resolve_from_env(args.kubeconfig.as_deref());
    tracing::debug!("Using kubeconfig source: {}", source);

    let connect = KubeCluster::connect(&source, args.context.as_deref());
    let snapshot = assemble(connect, &config, Utc::now(), cli::VERSION).await;

    let stdout = std::io::stdout();
    render(&snapshot, config.output, stdout.lock())?;

    Ok(())
}
