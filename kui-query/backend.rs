use kui_kube::{Context, Contexts, KubeConfigLoader, ListOptions, ResourceList, projection_for};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{ContextDetail, ContextList, FetchError, ResourceFetcher};

#[cfg(test)]
#[path = "./backend.tests.rs"]
mod backend_tests;

/// [`ResourceFetcher`] that talks to the clusters from the kubeconfig files.\
/// **Note** that contexts are reloaded whenever any of the kubeconfig files changes.
pub struct Backend {
    loader: Mutex<KubeConfigLoader>,
}

impl Backend {
    /// Creates new [`Backend`] instance.
    pub fn new(loader: KubeConfigLoader) -> Self {
        Self {
            loader: Mutex::new(loader),
        }
    }

    /// Returns current contexts catalog.
    pub async fn contexts(&self) -> Arc<Contexts> {
        self.loader.lock().await.contexts().await
    }

    async fn context(&self, name: &str) -> Result<Context, FetchError> {
        Ok(self.contexts().await.get_context(name).await?)
    }
}

impl ResourceFetcher for Backend {
    async fn list_contexts(&self) -> Result<ContextList, FetchError> {
        let contexts = self.contexts().await;
        Ok(ContextList {
            default: contexts.current_context().unwrap_or_default().to_owned(),
            items: contexts.names().into_iter().map(String::from).collect(),
            errors: contexts.load_errors().to_vec(),
        })
    }

    async fn get_context(&self, context: &str) -> Result<ContextDetail, FetchError> {
        let context = self.context(context).await?;
        let registry = context.registry().await?;

        Ok(ContextDetail::new(&registry, context.default_namespace()))
    }

    async fn list_resources(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> Result<ResourceList, FetchError> {
        debug!("Listing '{}' in '{}/{}'", resource, context, namespace.unwrap_or_default());
        let client = self.context(context).await?.resource(resource, namespace).await?;
        let options = ListOptions::from_params(params).with_projection(projection_for(resource));

        Ok(client.list(&options).await?)
    }

    async fn get_resource(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        _params: &BTreeMap<String, String>,
    ) -> Result<Value, FetchError> {
        debug!("Getting '{}/{}' in '{}/{}'", resource, name, context, namespace.unwrap_or_default());
        let client = self.context(context).await?.resource(resource, namespace).await?;

        Ok(client.get(name).await?)
    }
}
