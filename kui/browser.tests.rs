use kui_kube::{ResourceInfo, ResourceList, ResourceRegistry};
use kui_query::{FetchError, QueryData, ResourceQuery};
use serde_json::json;
use std::collections::BTreeMap;

use super::*;
use crate::cli::ScopeArgs;

/// Fetcher with a single `dev` context that serves core and `apps` resources.
struct StaticFetcher;

impl ResourceFetcher for StaticFetcher {
    async fn list_contexts(&self) -> Result<ContextList, FetchError> {
        Ok(ContextList {
            default: "dev".to_owned(),
            items: vec!["dev".to_owned()],
            errors: Vec::new(),
        })
    }

    async fn get_context(&self, context: &str) -> Result<ContextDetail, FetchError> {
        if context != "dev" {
            return Err(FetchError::UnknownContext(context.to_owned()));
        }

        let registry = [
            ResourceInfo::new("pods", "Pod", false, "/api", "v1"),
            ResourceInfo::new("events", "Event", false, "/api", "v1"),
            ResourceInfo::new("namespaces", "Namespace", true, "/api", "v1"),
            ResourceInfo::new("nodes", "Node", true, "/api", "v1"),
            ResourceInfo::new("deployments", "Deployment", false, "/apis", "apps/v1"),
        ]
        .into_iter()
        .collect::<ResourceRegistry>();

        Ok(ContextDetail::new(&registry, Some("team")))
    }

    async fn list_resources(
        &self,
        _context: &str,
        resource: &str,
        namespace: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> Result<ResourceList, FetchError> {
        let item = json!({
            "metadata": { "name": format!("{resource}-1"), "namespace": namespace },
            "selector": params.get("k8s.fieldSelector"),
        });

        let mut list = ResourceList {
            items: vec![item],
            ..Default::default()
        };
        list.header.insert("kind".to_owned(), json!("List"));
        Ok(list)
    }

    async fn get_resource(
        &self,
        _context: &str,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        _params: &BTreeMap<String, String>,
    ) -> Result<Value, FetchError> {
        if resource != "deployments" || name == "missing" {
            return Err(FetchError::NotFound(format!("{resource} \"{name}\" not found")));
        }

        Ok(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": name, "namespace": namespace },
            "spec": { "selector": { "matchLabels": { "app": name } } },
        }))
    }
}

async fn browser() -> Browser<StaticFetcher> {
    let mut browser = Browser::new(Arc::new(StaticFetcher), Handle::current());
    browser.open_context("dev").await.unwrap();
    browser
}

#[tokio::test]
async fn contexts_test() {
    let browser = Browser::new(Arc::new(StaticFetcher), Handle::current());

    let contexts = browser.contexts().await.unwrap();

    assert_eq!("dev", contexts.default);
    assert_eq!(vec!["dev"], contexts.items);
}

#[tokio::test]
async fn open_unknown_context_test() {
    let mut browser = Browser::new(Arc::new(StaticFetcher), Handle::current());

    let error = browser.open_context("prod").await.err().unwrap();

    assert_eq!("cannot load context 'prod': unknown context 'prod'", error.to_string());
}

#[tokio::test]
async fn open_context_test() {
    let mut browser = Browser::new(Arc::new(StaticFetcher), Handle::current());

    let detail = browser.open_context("dev").await.unwrap();

    assert_eq!(Some("team"), detail.default_namespace.as_deref());
    assert!(detail.has_resource("deployments"));
}

#[tokio::test]
async fn list_in_default_namespace_test() {
    let mut browser = browser().await;
    let scope = ScopeArgs::default();

    let result = browser.list(&["pods".to_owned()], |d| scope.selection(d)).await.unwrap();

    assert_eq!(json!("pods-1"), result["pods"]["items"][0]["metadata"]["name"]);
    assert_eq!(json!("team"), result["pods"]["items"][0]["metadata"]["namespace"]);
    assert_eq!(json!("List"), result["pods"]["kind"]);
}

#[tokio::test]
async fn list_cluster_overview_test() {
    let mut browser = browser().await;
    let scope = ScopeArgs {
        cluster: true,
        ..Default::default()
    };

    let result = browser.list(&[], |d| scope.selection(d)).await.unwrap();

    let mut resources = result.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    resources.sort();
    assert_eq!(vec!["namespaces", "nodes"], resources);
    assert_eq!(json!(null), result["nodes"]["items"][0]["metadata"]["namespace"]);
}

#[tokio::test]
async fn list_unknown_resource_test() {
    let mut browser = browser().await;

    let result = browser
        .list(&["pods".to_owned(), "widgets".to_owned()], |_| NamespaceSelection::all())
        .await;

    assert_eq!(
        "resource 'widgets' is not served by the cluster",
        result.err().unwrap().to_string()
    );
}

#[tokio::test]
async fn get_object_with_events_test() {
    let mut browser = browser().await;

    let result = browser.get("deployments", Some("web"), "frontend").await.unwrap();

    assert_eq!(json!("Deployment"), result["object"]["kind"]);
    assert_eq!(json!("web"), result["object"]["metadata"]["namespace"]);
    assert_eq!(json!("events-1"), result["events"]["items"][0]["metadata"]["name"]);
    assert_eq!(
        json!("involvedObject.name=frontend,involvedObject.kind=Deployment,involvedObject.namespace=web"),
        result["events"]["items"][0]["selector"]
    );
    assert!(result.get("pods").is_none());
}

#[tokio::test]
async fn get_missing_object_test() {
    let mut browser = browser().await;

    let result = browser.get("deployments", None, "missing").await;

    assert_eq!(
        "cannot get deployments 'missing': not found: deployments \"missing\" not found",
        result.err().unwrap().to_string()
    );
}

#[test]
fn results_to_value_test() {
    let query = ResourceQuery::object("dev", "pods", Some("default"), "web");
    let pod = json!({ "metadata": { "name": "web" } });

    assert_eq!(Value::Null, results_to_value(None).unwrap());
    assert_eq!(Value::Null, results_to_value(Some(&ResourceQueryResults::loading(query.clone()))).unwrap());
    assert_eq!(
        pod,
        results_to_value(Some(&ResourceQueryResults::finished(query.clone(), Ok(QueryData::Object(pod.clone())))))
            .unwrap()
    );
    assert_eq!(
        json!({ "error": FetchError::NotFound("web".to_owned()).to_string() }),
        results_to_value(Some(&ResourceQueryResults::finished(query, Err(FetchError::NotFound("web".to_owned())))))
            .unwrap()
    );
}
