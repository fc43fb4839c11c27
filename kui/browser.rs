use anyhow::{Result, anyhow};
use kui_query::{
    Action, ContextDetail, ContextList, Dispatcher, EVENTS_QUERY, ListPageSelection, NamespaceSelection,
    ObjectSelection, PODS_QUERY, ResourceFetcher, ResourceQueryResults, ResultsPath,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::cli::namespace_or_default;

#[cfg(test)]
#[path = "./browser.tests.rs"]
mod browser_tests;

/// Drives the [`Dispatcher`] for a single command and collects what it fetched.
pub struct Browser<F: ResourceFetcher> {
    fetcher: Arc<F>,
    dispatcher: Dispatcher<F>,
}

impl<F: ResourceFetcher> Browser<F> {
    /// Creates new [`Browser`] instance.
    pub fn new(fetcher: Arc<F>, runtime: Handle) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&fetcher), runtime),
            fetcher,
        }
    }

    /// Returns contexts from the kubeconfig files.
    pub async fn contexts(&self) -> Result<ContextList> {
        Ok(self.fetcher.list_contexts().await?)
    }

    /// Selects the `context` and waits until its detail and namespaces are loaded.
    pub async fn open_context(&mut self, context: &str) -> Result<&ContextDetail> {
        info!("Opening context '{}'", context);
        self.dispatcher.dispatch(Action::SelectContext(context.to_owned()));
        self.dispatcher.run_until_settled().await;

        let state = self.dispatcher.state();
        if let Some(error) = state.context_cache.as_ref().and_then(|c| c.err.as_ref()) {
            return Err(anyhow!("cannot load context '{}': {}", context, error));
        }

        if let Some(error) = state.namespace_cache.as_ref().and_then(|n| n.err.as_ref()) {
            return Err(anyhow!("cannot list namespaces of context '{}': {}", context, error));
        }

        state
            .context_detail()
            .ok_or_else(|| anyhow!("context '{}' is not loaded", context))
    }

    /// Lists `resources` in the namespace scope, all resources in the scope if none are given.\
    /// **Note** that `namespace` is resolved against the context's default namespace.
    pub async fn list(
        &mut self,
        resources: &[String],
        namespace: impl Fn(Option<&str>) -> NamespaceSelection,
    ) -> Result<Value> {
        let detail = self.loaded_detail()?;
        if let Some(unknown) = resources.iter().find(|r| !detail.has_resource(r)) {
            return Err(anyhow!("resource '{}' is not served by the cluster", unknown));
        }

        let namespace = namespace(detail.default_namespace.as_deref());
        let list = if resources.is_empty() {
            None
        } else {
            Some(ListPageSelection::new(resources.join(", "), resources.to_vec()))
        };

        self.dispatcher.dispatch(Action::SelectListPage(list));
        self.dispatcher.dispatch(Action::SelectNamespace(namespace));
        self.dispatcher.run_until_settled().await;

        let state = self.dispatcher.state();
        let mut result = Map::new();
        if let Some(list) = state.list_page_selection() {
            for resource in list.resources {
                let results = self.dispatcher.results_for_key(&state.list_query_key(&resource));
                result.insert(resource, results_to_value(results)?);
            }
        }

        Ok(Value::Object(result))
    }

    /// Returns the named object together with its events (and pods for replica sets).
    pub async fn get(&mut self, resource: &str, namespace: Option<&str>, name: &str) -> Result<Value> {
        let detail = self.loaded_detail()?;
        let summary = detail
            .resource(resource)
            .ok_or_else(|| anyhow!("resource '{}' is not served by the cluster", resource))?;

        let (namespace, object) = if summary.is_cluster_resource {
            (NamespaceSelection::cluster(), ObjectSelection::new(resource, None, name))
        } else {
            let namespace = namespace_or_default(namespace, detail.default_namespace.as_deref());
            let object = ObjectSelection::new(resource, Some(&namespace), name);
            (NamespaceSelection::single(namespace), object)
        };

        let list = ListPageSelection::new(resource, vec![resource.to_owned()]);
        self.dispatcher.dispatch(Action::SelectListPage(Some(list)));
        self.dispatcher.dispatch(Action::SelectObject(Some(object)));
        self.dispatcher.dispatch(Action::SelectNamespace(namespace));
        self.dispatcher.run_until_settled().await;

        let path = self.dispatcher.state().detail_query_key();
        let primary = self.dispatcher.results(&ResultsPath::primary(&path));
        if let Some(error) = primary.and_then(|r| r.err.as_ref()) {
            return Err(anyhow!("cannot get {} '{}': {}", resource, name, error));
        }

        let mut result = Map::new();
        result.insert("object".to_owned(), results_to_value(primary)?);
        for query in [EVENTS_QUERY, PODS_QUERY] {
            if let Some(results) = self.dispatcher.results(&ResultsPath::new(path.as_str(), query)) {
                result.insert(query.to_owned(), results_to_value(Some(results))?);
            }
        }

        Ok(Value::Object(result))
    }

    fn loaded_detail(&self) -> Result<&ContextDetail> {
        self.dispatcher
            .state()
            .context_detail()
            .ok_or_else(|| anyhow!("no context is opened"))
    }
}

/// Returns query data or `{"error": ...}` if the query failed.
fn results_to_value(results: Option<&ResourceQueryResults>) -> Result<Value> {
    let Some(results) = results else {
        return Ok(Value::Null);
    };

    if let Some(error) = &results.err {
        return Ok(json!({ "error": error.to_string() }));
    }

    match &results.results {
        Some(data) => Ok(serde_json::to_value(data)?),
        None => Ok(Value::Null),
    }
}
