use serde_json::json;

use super::*;
use crate::{FetchError, QueryData, ResourceQuery};

fn query(path: &str, query_name: &str, query: ResourceQuery) -> QueryWithLocation {
    QueryWithLocation::new(ResultsPath::new(path, query_name), query)
}

#[test]
fn lookup_returns_written_results_test() {
    let mut store = QueryStore::default();
    let pod = ResourceQuery::object("dev", "pods", Some("default"), "web-1");
    let location = ResultsPath::primary(pod.key());
    let results = ResourceQueryResults::finished(pod.clone(), Ok(QueryData::Object(json!({ "kind": "Pod" }))));

    store.set(&location, results.clone());

    assert_eq!(Some(&results), store.get(&location));
    assert_eq!(Some(&results), store.get_by_key("dev/pods/default/web-1"));
    assert_eq!(None, store.get_by_key("dev/pods/default"));
}

#[test]
fn secondary_queries_do_not_overwrite_primary_test() {
    let mut store = QueryStore::default();
    let pod = ResourceQuery::object("dev", "pods", Some("default"), "web-1");
    let events = ResourceQuery::list("dev", "events", Some("default"));
    let path = pod.key();

    store.start(&[query(&path, "", pod.clone()), query(&path, "events", events.clone())]);
    store.set(
        &ResultsPath::new(&path, "events"),
        ResourceQueryResults::finished(events, Err(FetchError::NotFound("events".to_owned()))),
    );

    assert_eq!(2, store.len());
    assert!(store.get(&ResultsPath::primary(&path)).is_some_and(|r| r.loading));
    assert!(store.get(&ResultsPath::new(&path, "events")).is_some_and(|r| r.err.is_some()));
    assert!(store.is_loading());
}

#[test]
fn clear_starts_new_generation_test() {
    let mut store = QueryStore::default();
    let pods = ResourceQuery::list("dev", "pods", None);
    store.start(&[query(&pods.key(), "", pods.clone())]);

    store.clear();

    assert_eq!(1, store.generation());
    assert!(store.is_empty());
    assert!(!store.is_loading());
    assert!(!store.has(&ResultsPath::primary(pods.key())));
}
