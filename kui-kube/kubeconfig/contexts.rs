use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{Auth, read_data_or_file};
use crate::context::{ClientOptions, ConnectionInfo, Context, ContextError, RegistryCache};

use super::{ClusterInfo, ContextInfo, KubeConfigFile, UserInfo};

#[cfg(test)]
#[path = "./contexts.tests.rs"]
mod contexts_tests;

/// Server used for contexts without a cluster.
pub const DEFAULT_CLUSTER_SERVER: &str = "http://localhost:8080";

/// Catalog of named contexts merged from the kubeconfig files.\
/// **Note** that for clusters, users and contexts the first definition wins.
pub struct Contexts {
    clusters: HashMap<String, ClusterInfo>,
    users: HashMap<String, UserInfo>,
    contexts: HashMap<String, ContextInfo>,
    current_context: Option<String>,
    load_errors: Vec<String>,
    options: ClientOptions,
    registries: RegistryCache,
}

impl Contexts {
    /// Creates new empty [`Contexts`] instance.
    pub fn new(options: ClientOptions) -> Self {
        Self {
            clusters: HashMap::new(),
            users: HashMap::new(),
            contexts: HashMap::new(),
            current_context: None,
            load_errors: Vec::new(),
            options,
            registries: RegistryCache::default(),
        }
    }

    /// Loads and merges all kubeconfig `files`.\
    /// **Note** that files that cannot be read or parsed are skipped and recorded as load errors.
    pub async fn load(files: &[PathBuf], options: ClientOptions) -> Self {
        let mut contexts = Self::new(options);
        for file in files {
            match tokio::fs::read_to_string(file).await {
                Ok(content) => contexts.add_yaml(file, &content),
                Err(error) => contexts.add_load_error(format!("error loading {}, {}", file.display(), error)),
            }
        }

        contexts
    }

    /// Parses kubeconfig `yaml` read from the `file` and merges it into the catalog.
    pub fn add_yaml(&mut self, file: &Path, yaml: &str) {
        if yaml.trim().is_empty() {
            self.add_load_error(format!("unable to load YAML from {}", file.display()));
            return;
        }

        match KubeConfigFile::from_yaml(yaml) {
            Ok(config) => self.add_config(config),
            Err(error) => self.add_load_error(format!("unable to load YAML from {}, {}", file.display(), error)),
        }
    }

    /// Merges parsed kubeconfig into the catalog.
    pub fn add_config(&mut self, config: KubeConfigFile) {
        for cluster in config.clusters.unwrap_or_default() {
            add_if_missing(&mut self.clusters, cluster.name, cluster.cluster);
        }

        for user in config.users.unwrap_or_default() {
            add_if_missing(&mut self.users, user.name, user.user);
        }

        for context in config.contexts.unwrap_or_default() {
            add_if_missing(&mut self.contexts, context.name, context.context);
        }

        if self.current_context.is_none() {
            self.current_context = config.current_context.filter(|c| !c.is_empty());
        }
    }

    /// Records error that happened while loading kubeconfig files.
    pub fn add_load_error(&mut self, error: String) {
        warn!("{}", error);
        self.load_errors.push(error);
    }

    /// Returns sorted context names.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.contexts.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Returns current context name from the first kubeconfig file that sets it.
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// Returns default namespace of the named context.
    pub fn default_namespace(&self, context: &str) -> Option<&str> {
        self.contexts
            .get(context)
            .and_then(|c| c.namespace.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Returns errors recorded while loading kubeconfig files.
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    /// Resolves the named context to a new [`Context`] instance.\
    /// **Note** that certificate files referenced by the cluster and user entries are read here.
    pub async fn get_context(&self, name: &str) -> Result<Context, ContextError> {
        let info = self
            .contexts
            .get(name)
            .ok_or_else(|| ContextError::UnknownContext(name.to_owned()))?;

        let cluster = info.cluster.as_deref().and_then(|c| self.clusters.get(c));
        let user = info.user.as_deref().and_then(|u| self.users.get(u));

        let auth = match user {
            Some(user) => Auth::from_user(user).await,
            None => Auth::None,
        };
        let certificate_authority = match cluster {
            Some(cluster) => {
                read_data_or_file(
                    cluster.certificate_authority_data.as_deref(),
                    cluster.certificate_authority.as_deref(),
                )
                .await
            },
            None => None,
        };

        let connection = ConnectionInfo {
            server: cluster
                .and_then(|c| c.server.as_deref())
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_CLUSTER_SERVER)
                .to_owned(),
            auth,
            certificate_authority,
            insecure: cluster.and_then(|c| c.insecure_skip_tls_verify).unwrap_or_default(),
            default_namespace: self.default_namespace(name).map(String::from),
        };

        Ok(Context::new(
            name,
            connection,
            self.options.clone(),
            Arc::clone(&self.registries),
        ))
    }
}

fn add_if_missing<T: Default>(map: &mut HashMap<String, T>, name: Option<String>, value: Option<T>) {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return;
    };

    if let Entry::Vacant(entry) = map.entry(name) {
        entry.insert(value.unwrap_or_default());
    }
}
