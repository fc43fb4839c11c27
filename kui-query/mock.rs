use kui_kube::{ResourceInfo, ResourceList, ResourceRegistry};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{ContextDetail, ContextList, FetchError, ResourceFetcher, ResourceQuery};

/// Context detail with core and `apps` resources.
pub fn context_detail() -> ContextDetail {
    let registry = [
        ResourceInfo::new("pods", "Pod", false, "/api", "v1"),
        ResourceInfo::new("events", "Event", false, "/api", "v1"),
        ResourceInfo::new("namespaces", "Namespace", true, "/api", "v1"),
        ResourceInfo::new("nodes", "Node", true, "/api", "v1"),
        ResourceInfo::new("deployments", "Deployment", false, "/apis", "apps/v1"),
        ResourceInfo::new("replicasets", "ReplicaSet", false, "/apis", "apps/v1"),
    ]
    .into_iter()
    .collect::<ResourceRegistry>();

    ContextDetail::new(&registry, Some("default"))
}

/// Fetched object of the `kind`.
pub fn object(api_version: &str, kind: &str, name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "selector": { "matchLabels": { "app": name } } },
    })
}

/// Fetcher call, `op` is one of `context`, `list` or `get`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub query: ResourceQuery,
}

/// In-memory [`ResourceFetcher`] that records all calls.\
/// Lists of gated contexts are returned only after the gate is opened.
#[derive(Default)]
pub struct MockFetcher {
    objects: HashMap<String, Value>,
    failing_contexts: Vec<String>,
    panicking_resources: Vec<String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockFetcher {
    pub fn with_object(mut self, resource: &str, object: Value) -> Self {
        let name = object["metadata"]["name"].as_str().unwrap_or_default().to_owned();
        self.objects.insert(format!("{resource}/{name}"), object);
        self
    }

    pub fn with_failing_context(mut self, context: &str) -> Self {
        self.failing_contexts.push(context.to_owned());
        self
    }

    /// Makes lists of the `resource` panic.
    pub fn with_panicking_resource(mut self, resource: &str) -> Self {
        self.panicking_resources.push(resource.to_owned());
        self
    }

    /// Holds lists of the `context` until returned notify is triggered.
    pub fn gate(&self, context: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(context.to_owned(), Arc::clone(&notify));
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns recorded calls of the `op` for the `resource`.
    pub fn calls_for(&self, op: &str, resource: &str) -> Vec<ResourceQuery> {
        self.calls()
            .into_iter()
            .filter(|c| c.op == op && c.query.resource == resource)
            .map(|c| c.query)
            .collect()
    }

    fn record(&self, op: &'static str, query: ResourceQuery) {
        self.calls.lock().unwrap().push(Call { op, query });
    }
}

impl ResourceFetcher for MockFetcher {
    async fn list_contexts(&self) -> Result<ContextList, FetchError> {
        Ok(ContextList {
            default: "dev".to_owned(),
            items: vec!["dev".to_owned(), "prod".to_owned()],
            errors: Vec::new(),
        })
    }

    async fn get_context(&self, context: &str) -> Result<ContextDetail, FetchError> {
        self.record("context", ResourceQuery::list(context, "", None));
        if self.failing_contexts.iter().any(|c| c == context) {
            return Err(FetchError::Discovery("cannot list API groups".to_owned()));
        }

        Ok(context_detail())
    }

    async fn list_resources(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> Result<ResourceList, FetchError> {
        let mut query = ResourceQuery::list(context, resource, namespace);
        query.params = params.clone();
        self.record("list", query);
        if self.panicking_resources.iter().any(|r| r == resource) {
            panic!("listing '{resource}' panicked");
        }

        let gate = self.gates.lock().unwrap().get(context).cloned();
        if let Some(gate) = gate.filter(|_| resource != "namespaces") {
            gate.notified().await;
        }

        let names = if resource == "namespaces" {
            vec!["default".to_owned(), "kube-system".to_owned()]
        } else {
            vec![format!("{context}-{resource}")]
        };

        Ok(ResourceList {
            header: Map::new(),
            items: names.into_iter().map(|name| json!({ "metadata": { "name": name } })).collect(),
        })
    }

    async fn get_resource(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        _params: &BTreeMap<String, String>,
    ) -> Result<Value, FetchError> {
        self.record("get", ResourceQuery::object(context, resource, namespace, name));
        self.objects
            .get(&format!("{resource}/{name}"))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_owned()))
    }
}
