use rstest::rstest;

use super::*;

#[rstest]
#[case("dev", "pods", None, None, "dev/pods")]
#[case("dev", "pods", Some("default"), None, "dev/pods/default")]
#[case("dev", "pods", Some("default"), Some("web-1"), "dev/pods/default/web-1")]
#[case("dev", "nodes", None, Some("node-1"), "dev/nodes/node-1")]
#[case("dev", "nodes", Some(""), Some("node-1"), "dev/nodes/node-1")]
fn resource_query_key_test(
    #[case] context: &str,
    #[case] resource: &str,
    #[case] namespace: Option<&str>,
    #[case] object_id: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(expected, resource_query_key(context, resource, namespace, object_id));
}

#[test]
fn object_id_makes_key_distinct_test() {
    let list = ResourceQuery::list("dev", "pods", Some("default"));
    let object = ResourceQuery::object("dev", "pods", Some("default"), "web-1");

    assert_ne!(list.key(), object.key());
    assert!(!list.is_object());
    assert!(object.is_object());
}

#[test]
fn params_do_not_change_key_test() {
    let query = ResourceQuery::list("dev", "events", Some("default")).with_param("k8s.fieldSelector", "a=b");

    assert_eq!("dev/events/default", query.key());
    assert_eq!(Some("a=b"), query.params.get("k8s.fieldSelector").map(String::as_str));
}

#[test]
fn finished_results_test() {
    let query = ResourceQuery::object("dev", "pods", None, "web-1");

    let success = ResourceQueryResults::finished(query.clone(), Ok(QueryData::Object(serde_json::json!({}))));
    assert!(success.is_success());
    assert!(success.results.as_ref().and_then(QueryData::object).is_some());

    let failure = ResourceQueryResults::finished(query.clone(), Err(FetchError::NotFound("web-1".to_owned())));
    assert!(!failure.is_success());
    assert!(!failure.loading);
    assert!(failure.results.is_none());

    assert!(!ResourceQueryResults::loading(query).is_success());
}
