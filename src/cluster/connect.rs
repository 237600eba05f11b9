//! Kubeconfig resolution and client construction
//!
//! Lookup order:
//! 1. `--kubeconfig` flag
//! 2. `KUBECONFIG` environment variable (may list several files)
//! 3. `~/.kube/config`
//! 4. In-cluster service account configuration

use super::KubeCluster;
use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the connection configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KubeconfigSource {
    Flag(PathBuf),
    Env(Vec<PathBuf>),
    Default(PathBuf),
    InCluster,
}

impl fmt::Display for KubeconfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KubeconfigSource::Flag(path) => write!(f, "--kubeconfig {}", path.display()),
            KubeconfigSource::Env(paths) => {
                let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "KUBECONFIG={}", joined.join(","))
            }
            KubeconfigSource::Default(path) => write!(f, "{}", path.display()),
            KubeconfigSource::InCluster => f.write_str("in-cluster config"),
        }
    }
}

/// Pick the kubeconfig source from the flag, environment and home directory
pub fn resolve_kubeconfig(
    flag: Option<&Path>,
    env: Option<OsString>,
    home: Option<&Path>,
) -> KubeconfigSource {
    if let Some(path) = flag.filter(|p| !p.as_os_str().is_empty()) {
        return KubeconfigSource::Flag(path.to_path_buf());
    }

    if let Some(value) = env.filter(|v| !v.is_empty()) {
        let paths: Vec<PathBuf> = std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if !paths.is_empty() {
            return KubeconfigSource::Env(paths);
        }
    }

    match home {
        Some(home) => KubeconfigSource::Default(home.join(".kube").join("config")),
        None => KubeconfigSource::InCluster,
    }
}

/// Resolve the source using the process environment
pub fn resolve_from_env(flag: Option<&Path>) -> KubeconfigSource {
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    resolve_kubeconfig(flag, std::env::var_os("KUBECONFIG"), home.as_deref())
}

fn read_kubeconfig(paths: &[PathBuf]) -> Result<Kubeconfig> {
    let mut merged: Option<Kubeconfig> = None;
    for path in paths {
        let next = Kubeconfig::read_from(path)
            .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;
        merged = Some(match merged {
            Some(current) => current.merge(next)?,
            None => next,
        });
    }
    merged.context("no kubeconfig files given")
}

async fn build_config(source: &KubeconfigSource, context: Option<&str>) -> Result<Config> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let kubeconfig = match source {
        KubeconfigSource::Flag(path) | KubeconfigSource::Default(path) => {
            read_kubeconfig(std::slice::from_ref(path))?
        }
        KubeconfigSource::Env(paths) => read_kubeconfig(paths)?,
        KubeconfigSource::InCluster => return Ok(Config::incluster()?),
    };

    Ok(Config::from_custom_kubeconfig(kubeconfig, &options).await?)
}

impl KubeCluster {
    /// Build a client for the given source and optional context name
    pub async fn connect(source: &KubeconfigSource, context: Option<&str>) -> Result<Self> {
        tracing::debug!("Loading cluster configuration from {}", source);

        let config = build_config(source, context)
            .await
            .context("failed to build config")?;
        let cluster_url = config.cluster_url.to_string();

        let client = Client::try_from(config).context("failed to create client")?;
        tracing::info!("Connected to API server {}", cluster_url);

        Ok(KubeCluster::new(client, cluster_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_takes_precedence() {
        let source = resolve_kubeconfig(
            Some(Path::new("/tmp/flag-config")),
            Some(OsString::from("/tmp/env-config")),
            Some(Path::new("/home/ops")),
        );
        assert_eq!(
            source,
            KubeconfigSource::Flag(PathBuf::from("/tmp/flag-config"))
        );
    }

    #[test]
    fn test_env_before_home() {
        let source = resolve_kubeconfig(
            None,
            Some(OsString::from("/tmp/env-config")),
            Some(Path::new("/home/ops")),
        );
        assert_eq!(
            source,
            KubeconfigSource::Env(vec![PathBuf::from("/tmp/env-config")])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_env_lists_several_files() {
        let source = resolve_kubeconfig(None, Some(OsString::from("/tmp/a:/tmp/b")), None);
        assert_eq!(
            source,
            KubeconfigSource::Env(vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")])
        );
    }

    #[test]
    fn test_empty_values_fall_through_to_home() {
        let source = resolve_kubeconfig(
            Some(Path::new("")),
            Some(OsString::new()),
            Some(Path::new("/home/ops")),
        );
        assert_eq!(
            source,
            KubeconfigSource::Default(PathBuf::from("/home/ops/.kube/config"))
        );
    }

    #[test]
    fn test_in_cluster_without_home() {
        assert_eq!(
            resolve_kubeconfig(None, None, None),
            KubeconfigSource::InCluster
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let source = KubeconfigSource::Flag(PathBuf::from("/nonexistent/kasba/kubeconfig"));
        let err = KubeCluster::connect(&source, None).await.err().unwrap();
        assert!(format!("{:#}", err).starts_with("failed to build config"));
    }
}
