use serde_json::json;

use super::*;
use crate::mock::{MockFetcher, object};
use crate::{ListPageSelection, NamespaceSelection, ObjectSelection};

fn dispatcher(fetcher: MockFetcher) -> (Dispatcher<MockFetcher>, Arc<MockFetcher>) {
    let fetcher = Arc::new(fetcher);
    (Dispatcher::new(Arc::clone(&fetcher), Handle::current()), fetcher)
}

fn list_page(resource: &str) -> Action {
    Action::SelectListPage(Some(ListPageSelection::new(resource, vec![resource.to_owned()])))
}

async fn select_context(dispatcher: &mut Dispatcher<MockFetcher>, context: &str) {
    dispatcher.dispatch(Action::SelectContext(context.to_owned()));
    dispatcher.run_until_settled().await;
}

fn item_names(results: Option<&ResourceQueryResults>) -> Vec<String> {
    results
        .and_then(|r| r.results.as_ref())
        .map(|r| {
            r.items()
                .iter()
                .filter_map(|i| i["metadata"]["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn select_context_loads_detail_and_namespaces_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());

    dispatcher.dispatch(Action::SelectContext("dev".to_owned()));
    assert!(dispatcher.state().is_context_loading());
    assert!(!dispatcher.is_settled());

    dispatcher.run_until_settled().await;

    let state = dispatcher.state();
    assert!(state.context_detail().is_some_and(|d| d.has_resource("pods")));
    assert_eq!(
        Some(&vec!["default".to_owned(), "kube-system".to_owned()]),
        state.namespace_cache.as_ref().and_then(|n| n.namespaces.as_ref())
    );
    assert_eq!(1, fetcher.calls_for("context", "").len());
    assert_eq!(1, fetcher.calls_for("list", "namespaces").len());
    assert!(state.store.is_empty());
}

#[tokio::test]
async fn overview_lists_namespaced_resources_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;

    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;

    for resource in ["pods", "events", "deployments", "replicasets"] {
        let key = format!("dev/{resource}/default");
        assert!(dispatcher.results_for_key(&key).is_some_and(ResourceQueryResults::is_success));
    }
    assert_eq!(vec!["dev-pods"], item_names(dispatcher.results_for_key("dev/pods/default")));
    assert!(fetcher.calls_for("list", "nodes").is_empty());
    assert_eq!(4, dispatcher.state().store.len());
}

#[tokio::test]
async fn cluster_scope_lists_cluster_resources_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;

    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::cluster()));
    dispatcher.run_until_settled().await;

    assert!(dispatcher.results_for_key("dev/nodes").is_some_and(ResourceQueryResults::is_success));
    assert!(dispatcher.results_for_key("dev/namespaces").is_some());
    assert!(fetcher.calls_for("list", "pods").is_empty());
    assert_eq!(2, fetcher.calls_for("list", "namespaces").len());
}

#[tokio::test]
async fn all_namespaces_scope_lists_without_namespace_test() {
    let (mut dispatcher, _) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;

    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::all()));
    dispatcher.run_until_settled().await;

    assert!(dispatcher.results_for_key("dev/pods").is_some_and(ResourceQueryResults::is_success));
    assert_eq!(1, dispatcher.state().store.len());
}

#[tokio::test]
async fn loading_query_is_not_fetched_again_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;

    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    assert!(dispatcher.results_for_key("dev/pods/default").is_some_and(|r| r.loading));

    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectObject(None));
    dispatcher.run_until_settled().await;
    dispatcher.dispatch(list_page("pods"));
    dispatcher.process_results();

    assert_eq!(1, fetcher.calls_for("list", "pods").len());
    assert!(dispatcher.is_settled());
}

#[tokio::test]
async fn clear_cache_fetches_again_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;
    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;

    dispatcher.clear_cache();
    assert!(dispatcher.results_for_key("dev/pods/default").is_some_and(|r| r.loading));
    dispatcher.run_until_settled().await;

    assert_eq!(2, fetcher.calls_for("list", "pods").len());
    assert_eq!(1, fetcher.calls_for("context", "").len());
}

#[tokio::test]
async fn failed_query_is_not_retried_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;
    let missing = ObjectSelection::new("pods", Some("default"), "missing");

    dispatcher.dispatch(Action::SelectObject(Some(missing.clone())));
    dispatcher.run_until_settled().await;
    dispatcher.dispatch(Action::SelectObject(Some(missing)));
    dispatcher.run_until_settled().await;

    let results = dispatcher.results_for_key("dev/pods/default/missing");
    assert_eq!(Some(&FetchError::NotFound("missing".to_owned())), results.and_then(|r| r.err.as_ref()));
    assert_eq!(1, fetcher.calls_for("get", "pods").len());
    assert!(fetcher.calls_for("list", "events").is_empty());
}

#[tokio::test]
async fn deployment_loads_its_events_once_test() {
    let deployment = object("apps/v1", "Deployment", "web", "default");
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default().with_object("deployments", deployment.clone()));
    select_context(&mut dispatcher, "dev").await;
    dispatcher.dispatch(list_page("deployments"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;

    dispatcher.dispatch(Action::SelectObject(Some(ObjectSelection::new(
        "deployments",
        Some("default"),
        "web",
    ))));
    dispatcher.run_until_settled().await;
    dispatcher.dispatch(Action::SelectObject(Some(ObjectSelection::new(
        "deployments",
        Some("default"),
        "web",
    ))));
    dispatcher.run_until_settled().await;

    let events = fetcher.calls_for("list", "events");
    assert_eq!(1, events.len());
    assert_eq!(
        Some("involvedObject.name=web,involvedObject.kind=Deployment,involvedObject.namespace=default"),
        events[0].params.get("k8s.fieldSelector").map(String::as_str)
    );
    assert_eq!(Some("default"), events[0].namespace.as_deref());

    let path = "dev/deployments/default/web";
    let primary = dispatcher.results(&ResultsPath::primary(path));
    assert_eq!(
        Some(&deployment),
        primary.and_then(|r| r.results.as_ref()).and_then(QueryData::object)
    );
    let events = dispatcher.results(&ResultsPath::new(path, "events"));
    assert_eq!(vec!["dev-events"], item_names(events));
    assert!(dispatcher.results(&ResultsPath::new(path, "pods")).is_none());
}

#[tokio::test]
async fn replica_set_loads_its_pods_and_events_test() {
    let replica_set = object("apps/v1", "ReplicaSet", "web-7d4f", "default");
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default().with_object("replicasets", replica_set));
    select_context(&mut dispatcher, "dev").await;

    dispatcher.dispatch(Action::SelectObject(Some(ObjectSelection::new(
        "replicasets",
        Some("default"),
        "web-7d4f",
    ))));
    dispatcher.run_until_settled().await;

    let pods = fetcher.calls_for("list", "pods");
    assert_eq!(1, pods.len());
    assert_eq!(Some("app=web-7d4f"), pods[0].params.get("k8s.labelSelector").map(String::as_str));
    assert_eq!(1, fetcher.calls_for("list", "events").len());

    let path = "dev/replicasets/default/web-7d4f";
    assert!(dispatcher.results(&ResultsPath::new(path, "pods")).is_some_and(ResourceQueryResults::is_success));
    assert!(dispatcher.results(&ResultsPath::new(path, "events")).is_some_and(ResourceQueryResults::is_success));
}

#[tokio::test]
async fn stale_result_does_not_land_in_new_context_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    let gate = fetcher.gate("old");
    select_context(&mut dispatcher, "old").await;
    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    assert!(dispatcher.results_for_key("old/pods/default").is_some_and(|r| r.loading));

    dispatcher.dispatch(Action::SelectContext("new".to_owned()));
    gate.notify_one();
    dispatcher.run_until_settled().await;
    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;
    tokio::task::yield_now().await;
    dispatcher.process_results();

    assert!(dispatcher.results_for_key("old/pods/default").is_none());
    assert_eq!(vec!["new-pods"], item_names(dispatcher.results_for_key("new/pods/default")));
    assert_eq!(1, dispatcher.state().store.len());
}

#[tokio::test]
async fn result_from_older_generation_is_dropped_test() {
    let (mut dispatcher, _) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;
    let query = ResourceQuery::list("dev", "pods", Some("default"));
    let location = ResultsPath::primary(query.key());
    let results = ResourceQueryResults::finished(query, Ok(QueryData::Object(json!({}))));

    let generation = dispatcher.state().store.generation();
    dispatcher.apply(FetchResult::Query {
        generation: generation - 1,
        action: Action::DataResult(location.clone(), results.clone()),
    });
    assert!(dispatcher.results(&location).is_none());

    dispatcher.apply(FetchResult::Query {
        generation,
        action: Action::DataResult(location.clone(), results.clone()),
    });
    assert_eq!(Some(&results), dispatcher.results(&location));
}

#[tokio::test]
async fn context_load_error_blocks_queries_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default().with_failing_context("broken"));
    select_context(&mut dispatcher, "broken").await;

    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.dispatch(Action::SelectObject(Some(ObjectSelection::new("pods", Some("default"), "web"))));
    dispatcher.process_results();

    assert!(dispatcher.state().context_cache.as_ref().is_some_and(|c| c.err.is_some()));
    assert!(dispatcher.is_settled());
    assert!(dispatcher.state().store.is_empty());
    assert!(fetcher.calls_for("get", "pods").is_empty());
}

#[tokio::test]
async fn select_context_again_reuses_loaded_detail_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;

    select_context(&mut dispatcher, "dev").await;

    assert_eq!(1, fetcher.calls_for("context", "").len());
    assert!(dispatcher.state().store.is_empty());
    assert_eq!(
        Some(&NamespaceSelection::single("")),
        dispatcher.state().selection.namespace.as_ref()
    );
}

#[tokio::test]
async fn follow_up_action_keeps_related_queries_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default());
    select_context(&mut dispatcher, "dev").await;
    dispatcher.state.selection.object = Some(ObjectSelection::new("deployments", Some("default"), "web"));

    let query = ResourceQuery::object("dev", "replicasets", Some("default"), "web-7d4f");
    let location = ResultsPath::primary(query.key());
    let replica_set = object("apps/v1", "ReplicaSet", "web-7d4f", "default");
    dispatcher.dispatch(Action::DataResult(
        location.clone(),
        ResourceQueryResults::finished(query, Ok(QueryData::Object(replica_set))),
    ));
    dispatcher.run_until_settled().await;

    assert_eq!(1, fetcher.calls_for("get", "deployments").len());
    assert_eq!(1, fetcher.calls_for("list", "pods").len());
    assert_eq!(1, fetcher.calls_for("list", "events").len());
    let path = location.path.as_str();
    assert!(dispatcher.results(&ResultsPath::new(path, "pods")).is_some_and(ResourceQueryResults::is_success));
    assert!(dispatcher.results(&ResultsPath::new(path, "events")).is_some_and(ResourceQueryResults::is_success));
}

#[tokio::test]
async fn panicking_fetch_finishes_with_error_test() {
    let (mut dispatcher, fetcher) = dispatcher(MockFetcher::default().with_panicking_resource("pods"));
    select_context(&mut dispatcher, "dev").await;
    dispatcher.dispatch(list_page("pods"));
    dispatcher.dispatch(Action::SelectNamespace(NamespaceSelection::single("default")));
    dispatcher.run_until_settled().await;

    assert_eq!(1, fetcher.calls_for("list", "pods").len());
    let results = dispatcher.results_for_key("dev/pods/default");
    assert!(results.is_some_and(|r| !r.loading));
    assert!(matches!(
        results.and_then(|r| r.err.as_ref()),
        Some(FetchError::Client(message)) if message.starts_with("fetch task failed")
    ));
}
