use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{ConfigError, Persistable};

#[cfg(test)]
#[path = "./config.tests.rs"]
mod config_tests;

pub const APP_NAME: &str = "kui";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_DISCOVERY_CONCURRENCY: usize = 8;

/// User and groups to impersonate on every Kubernetes API request.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Impersonation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

impl Impersonation {
    /// Returns `true` if there is nothing to impersonate.
    pub fn is_empty(&self) -> bool {
        self.user.as_deref().is_none_or(str::is_empty) && self.groups.is_empty()
    }
}

/// Application configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Kubeconfig files to merge, used when none are given on the command line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kube_config_files: Vec<String>,

    /// Skips TLS certificate verification for every cluster.
    #[serde(default)]
    pub allow_insecure: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonate: Option<Impersonation>,

    /// Maximum number of API group versions queried at once during discovery.
    #[serde(default = "default_discovery_concurrency")]
    pub discovery_concurrency: usize,
}

fn default_discovery_concurrency() -> usize {
    DEFAULT_DISCOVERY_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kube_config_files: Vec::new(),
            allow_insecure: false,
            impersonate: None,
            discovery_concurrency: default_discovery_concurrency(),
        }
    }
}

impl Config {
    /// Loads the configuration from a file or creates a default one if the file does not exist.
    pub async fn load_or_create() -> Result<Self, ConfigError> {
        load_or_create_default(&Self::default_path()).await
    }

    /// Returns kubeconfig files to load.\
    /// **Note** that `overridden` paths (e.g. from the command line) take precedence over the configured ones,
    /// the defaults are used when neither is set.
    pub fn kube_config_files(&self, overridden: Option<&str>) -> Vec<PathBuf> {
        if let Some(overridden) = overridden.filter(|o| !o.is_empty()) {
            return split_kube_config_paths(overridden);
        }

        let configured = self
            .kube_config_files
            .iter()
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .collect::<Vec<_>>();
        if configured.is_empty() {
            default_kube_config_files()
        } else {
            configured
        }
    }

    /// Returns discovery concurrency, never less than `1`.
    pub fn discovery_concurrency(&self) -> usize {
        self.discovery_concurrency.max(1)
    }
}

impl Persistable<Config> for Config {
    /// Returns the default configuration path: `HOME/.kui/config.yaml`.
    fn default_path() -> PathBuf {
        match std::env::home_dir() {
            Some(path) => path.join(format!(".{APP_NAME}")).join("config.yaml"),
            None => PathBuf::from("config.yaml"),
        }
    }

    async fn load(path: &Path) -> Result<Config, ConfigError> {
        let mut file = File::open(path).await?;

        let mut config_str = String::new();
        file.read_to_string(&mut config_str).await?;

        Ok(serde_yaml::from_str::<Config>(&config_str)?)
    }

    async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config_str = serde_yaml::to_string(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(path).await?;
        file.write_all(config_str.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

/// Loads configuration from the `path`.\
/// **Note** that a file that cannot be parsed yields defaults, a missing one is created with defaults.
pub async fn load_or_create_default<T: Persistable<T> + Default>(path: &Path) -> Result<T, ConfigError> {
    let configuration = T::load(path).await;
    match configuration {
        Ok(configuration) => Ok(configuration),
        Err(ConfigError::SerializationError(error)) => {
            tracing::error!("Cannot deserialize config: {}", error);
            Ok(T::default())
        },
        Err(error) => {
            tracing::warn!("Cannot load config: {}", error);
            let configuration = T::default();
            configuration.save(path).await?;
            Ok(configuration)
        },
    }
}

/// Splits list of kubeconfig paths using the platform path separator, skipping empty entries.
pub fn split_kube_config_paths(value: &str) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

/// Returns kubeconfig files from the `KUBECONFIG` environment variable or `HOME/.kube/config`.
pub fn default_kube_config_files() -> Vec<PathBuf> {
    if let Ok(value) = std::env::var("KUBECONFIG") {
        let paths = split_kube_config_paths(&value);
        if !paths.is_empty() {
            return paths;
        }
    }

    match std::env::home_dir() {
        Some(path) => vec![path.join(".kube").join("config")],
        None => vec![PathBuf::from(".kube").join("config")],
    }
}
