use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::info;

use crate::auth::Auth;
use crate::client::{Client, ClientError, Resource};
use crate::registry::{DiscoveryError, ResourceRegistry};

#[cfg(test)]
#[path = "./context.tests.rs"]
mod context_tests;

/// Registries cached by the cluster server URL.
pub type RegistryCache = Arc<RwLock<HashMap<String, Arc<ResourceRegistry>>>>;

/// Possible errors when using a kube context.
#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    /// Context is not defined in any kubeconfig file.
    #[error("unknown context '{0}'")]
    UnknownContext(String),

    /// Resource is not served by the context's cluster.
    #[error("invalid resource: '{0}'")]
    UnknownResource(String),

    /// Cannot create client for the context.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Cannot discover resources served by the context's cluster.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Options applied to every client created from kube contexts.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub allow_insecure: bool,
    pub impersonate_user: Option<String>,
    pub impersonate_groups: Vec<String>,
    pub discovery_concurrency: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            allow_insecure: false,
            impersonate_user: None,
            impersonate_groups: Vec::new(),
            discovery_concurrency: 8,
        }
    }
}

/// Everything that is needed to connect to a cluster.
#[derive(Debug)]
pub struct ConnectionInfo {
    pub server: String,
    pub auth: Auth,

    /// PEM encoded certificate authority.
    pub certificate_authority: Option<Vec<u8>>,
    pub insecure: bool,
    pub default_namespace: Option<String>,
}

/// Named binding of the cluster, credentials and default namespace.\
/// **Note** that client is created on first use and the resource registry is shared between all contexts that
/// point to the same cluster server.
pub struct Context {
    name: String,
    connection: ConnectionInfo,
    options: ClientOptions,
    registries: RegistryCache,
    client: OnceCell<Client>,
}

impl Context {
    /// Creates new [`Context`] instance.
    pub fn new(
        name: impl Into<String>,
        connection: ConnectionInfo,
        options: ClientOptions,
        registries: RegistryCache,
    ) -> Self {
        Self {
            name: name.into(),
            connection,
            options,
            registries,
            client: OnceCell::new(),
        }
    }

    /// Sets already created client for the context.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = OnceCell::new_with(Some(client));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns cluster server URL.
    pub fn server(&self) -> &str {
        &self.connection.server
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.connection.default_namespace.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &ConnectionInfo {
        &self.connection
    }

    /// Returns registries cache shared with other contexts from the same catalog.
    #[cfg(test)]
    pub(crate) fn registries(&self) -> &RegistryCache {
        &self.registries
    }

    /// Returns client for the context, creating it on first use.
    pub async fn client(&self) -> Result<&Client, ClientError> {
        self.client
            .get_or_try_init(|| async {
                info!(
                    "Creating client for context '{}' ({}, auth: {})",
                    self.name,
                    self.connection.server,
                    self.connection.auth.kind()
                );
                Client::from_connection(&self.connection, &self.options)
            })
            .await
    }

    /// Returns resource registry of the context's cluster, discovering it on first use.
    pub async fn registry(&self) -> Result<Arc<ResourceRegistry>, ContextError> {
        if let Some(registry) = self.registries.read().await.get(self.server()) {
            return Ok(Arc::clone(registry));
        }

        let client = self.client().await?;
        let registry = Arc::new(client.discover(self.options.discovery_concurrency).await?);
        self.registries
            .write()
            .await
            .insert(self.server().to_owned(), Arc::clone(&registry));

        Ok(registry)
    }

    /// Returns client for the named resource collection in the `namespace`.\
    /// **Note** that namespace is ignored for cluster resources.
    pub async fn resource(&self, resource_name: &str, namespace: Option<&str>) -> Result<Resource, ContextError> {
        let registry = self.registry().await?;
        let info = registry
            .resource_info(resource_name)
            .ok_or_else(|| ContextError::UnknownResource(resource_name.to_owned()))?;

        Ok(self.client().await?.resource(info.resource_path(namespace)))
    }
}
