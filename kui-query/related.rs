use kui_kube::utils::to_label_selector;
use kui_kube::{EVENTS, PODS, ResourceKey};
use serde_json::Value;

use crate::{ContextDetail, QueryWithLocation, ResourceQuery, ResultsPath};

#[cfg(test)]
#[path = "./related.tests.rs"]
mod related_tests;

/// Name of the query with events of the primary object.
pub const EVENTS_QUERY: &str = "events";

/// Name of the query with pods selected by the primary object.
pub const PODS_QUERY: &str = "pods";

const FIELD_SELECTOR: &str = "k8s.fieldSelector";
const LABEL_SELECTOR: &str = "k8s.labelSelector";

/// Kinds for which events are loaded together with the object.
const KINDS_WITH_EVENTS: [&str; 6] = ["DaemonSet", "Deployment", "ReplicaSet", "Pod", "Service", "StatefulSet"];

/// Returns secondary queries for the fetched `item`, stored under the primary query `path`.\
/// **Note** that only kinds served by the context's cluster get related queries.
pub fn related_queries(detail: &ContextDetail, context: &str, path: &str, item: &Value) -> Vec<QueryWithLocation> {
    let Some(kind) = item.get("kind").and_then(Value::as_str) else {
        return Vec::new();
    };

    if !KINDS_WITH_EVENTS.contains(&kind) || detail.find_by_key(&item_key(item, kind)).is_none() {
        return Vec::new();
    }

    let metadata = item.get("metadata");
    let name = metadata.and_then(|m| m.get("name")).and_then(Value::as_str).unwrap_or_default();
    let namespace = metadata
        .and_then(|m| m.get("namespace"))
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty());

    let mut queries = Vec::with_capacity(2);
    if kind == "ReplicaSet" && detail.has_resource(PODS) {
        let selector = item.get("spec").and_then(|s| s.get("selector"));
        if let Some(selector) = to_label_selector(selector).filter(|s| !s.is_empty()) {
            queries.push(QueryWithLocation::new(
                ResultsPath::new(path, PODS_QUERY),
                ResourceQuery::list(context, PODS, namespace).with_param(LABEL_SELECTOR, selector),
            ));
        }
    }

    if detail.has_resource(EVENTS) {
        queries.push(QueryWithLocation::new(
            ResultsPath::new(path, EVENTS_QUERY),
            ResourceQuery::list(context, EVENTS, namespace)
                .with_param(FIELD_SELECTOR, involved_object_selector(name, kind, namespace)),
        ));
    }

    queries
}

/// Returns field selector that matches events of the object.
pub fn involved_object_selector(name: &str, kind: &str, namespace: Option<&str>) -> String {
    let mut selector = format!("involvedObject.name={name},involvedObject.kind={kind}");
    if let Some(namespace) = namespace {
        selector.push_str(",involvedObject.namespace=");
        selector.push_str(namespace);
    }

    selector
}

fn item_key(item: &Value, kind: &str) -> ResourceKey {
    let api_version = item.get("apiVersion").and_then(Value::as_str).unwrap_or_default();
    let group = api_version.split_once('/').map(|(group, _)| group).unwrap_or_default();

    ResourceKey::new(group, kind)
}
