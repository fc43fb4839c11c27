use rstest::rstest;
use serde_json::json;

use super::*;
use crate::mock::{context_detail, object};

const PATH: &str = "dev/pods/default/web";

#[rstest]
#[case("apps/v1", "DaemonSet")]
#[case("apps/v1", "Deployment")]
#[case("v1", "Pod")]
#[case("v1", "Service")]
#[case("apps/v1", "StatefulSet")]
fn events_query_test(#[case] api_version: &str, #[case] kind: &str) {
    let mut detail = context_detail();
    for (name, kind, version) in [
        ("daemonsets", "DaemonSet", "apps/v1"),
        ("services", "Service", "v1"),
        ("statefulsets", "StatefulSet", "apps/v1"),
    ] {
        let registry = [kui_kube::ResourceInfo::new(name, kind, false, "/apis", version)]
            .into_iter()
            .collect::<kui_kube::ResourceRegistry>();
        detail.resources.extend(ContextDetail::new(&registry, None).resources);
    }

    let queries = related_queries(&detail, "dev", PATH, &object(api_version, kind, "web", "default"));

    assert_eq!(1, queries.len());
    assert_eq!(ResultsPath::new(PATH, EVENTS_QUERY), queries[0].location);
    assert_eq!("events", queries[0].query.resource);
    assert_eq!(Some("default"), queries[0].query.namespace.as_deref());
    assert_eq!(
        Some(&format!("involvedObject.name=web,involvedObject.kind={kind},involvedObject.namespace=default")),
        queries[0].query.params.get("k8s.fieldSelector")
    );
}

#[test]
fn replica_set_pods_query_test() {
    let queries = related_queries(
        &context_detail(),
        "dev",
        PATH,
        &object("apps/v1", "ReplicaSet", "web-7d4f", "default"),
    );

    assert_eq!(2, queries.len());
    assert_eq!(ResultsPath::new(PATH, PODS_QUERY), queries[0].location);
    assert_eq!(
        Some("app=web-7d4f"),
        queries[0].query.params.get("k8s.labelSelector").map(String::as_str)
    );
    assert_eq!(ResultsPath::new(PATH, EVENTS_QUERY), queries[1].location);
}

#[test]
fn unrelated_kinds_test() {
    let detail = context_detail();

    assert!(related_queries(&detail, "dev", PATH, &object("v1", "Namespace", "default", "")).is_empty());
    assert!(related_queries(&detail, "dev", PATH, &json!({ "metadata": { "name": "web" } })).is_empty());
}

#[test]
fn kinds_not_served_by_cluster_test() {
    let detail = context_detail();

    assert!(related_queries(&detail, "dev", PATH, &object("apps/v1", "StatefulSet", "db", "default")).is_empty());
    assert!(related_queries(&detail, "dev", PATH, &object("extensions/v1beta1", "Deployment", "web", "default")).is_empty());
}

#[test]
fn no_events_resource_test() {
    let mut detail = context_detail();
    detail.resources.retain(|r| r.name != "events");

    let queries = related_queries(&detail, "dev", PATH, &object("apps/v1", "Deployment", "web", "default"));

    assert!(queries.is_empty());
}

#[rstest]
#[case("web", "Node", None, "involvedObject.name=web,involvedObject.kind=Node")]
#[case("web", "Pod", Some("prod"), "involvedObject.name=web,involvedObject.kind=Pod,involvedObject.namespace=prod")]
fn involved_object_selector_test(
    #[case] name: &str,
    #[case] kind: &str,
    #[case] namespace: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(expected, involved_object_selector(name, kind, namespace));
}
