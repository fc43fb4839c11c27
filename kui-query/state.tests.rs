use super::*;
use crate::mock::context_detail;

fn loaded_state(namespace: NamespaceSelection) -> State {
    let mut state = State::default();
    state.reduce(Action::SelectContext("dev".to_owned()));
    state.reduce(Action::ContextDetail(ContextCache::finished("dev", Ok(context_detail()))));
    state.reduce(Action::SelectNamespace(namespace));
    state
}

#[test]
fn select_context_resets_selection_test() {
    let mut state = loaded_state(NamespaceSelection::single("default"));
    state.reduce(Action::SelectObject(Some(ObjectSelection::new("pods", Some("default"), "web"))));

    state.reduce(Action::SelectContext("prod".to_owned()));

    assert_eq!(Some("prod"), state.context());
    assert_eq!(Some(NamespaceSelection::single("")), state.selection.namespace);
    assert_eq!(None, state.selection.object);
    assert!(!state.is_namespace_selected());
    assert!(state.context_detail().is_none());
}

#[test]
fn overview_contains_resources_in_scope_test() {
    let state = loaded_state(NamespaceSelection::single("default"));
    let overview = state.list_page_selection().unwrap();
    assert_eq!(OVERVIEW_TITLE, overview.title);
    assert_eq!(vec!["deployments", "events", "pods", "replicasets"], overview.resources);

    let state = loaded_state(NamespaceSelection::cluster());
    assert_eq!(
        vec!["namespaces", "nodes"],
        state.list_page_selection().unwrap().resources
    );
}

#[test]
fn list_page_needs_namespace_test() {
    let state = loaded_state(NamespaceSelection::single(""));

    assert_eq!(None, state.list_page_selection());
}

#[test]
fn explicit_list_page_test() {
    let mut state = loaded_state(NamespaceSelection::all());
    let pods = ListPageSelection::new("Pods", vec!["pods".to_owned()]);

    state.reduce(Action::SelectListPage(Some(pods.clone())));

    assert_eq!(Some(pods), state.list_page_selection());
}

#[test]
fn list_query_key_test() {
    let state = loaded_state(NamespaceSelection::single("default"));
    assert_eq!("dev/pods/default", state.list_query_key("pods"));
    assert_eq!("dev/nodes", state.list_query_key("nodes"));

    let state = loaded_state(NamespaceSelection::all());
    assert_eq!("dev/pods", state.list_query_key("pods"));
}

#[test]
fn detail_query_key_test() {
    let mut state = loaded_state(NamespaceSelection::all());
    assert_eq!("dev", state.detail_query_key());

    state.reduce(Action::SelectObject(Some(ObjectSelection::new("pods", Some("kube-system"), "dns"))));
    assert_eq!("dev/pods/kube-system/dns", state.detail_query_key());

    state.reduce(Action::SelectObject(Some(ObjectSelection::new("nodes", None, "node-1"))));
    assert_eq!("dev/nodes/node-1", state.detail_query_key());
}

#[test]
fn context_loading_and_errors_test() {
    let mut state = State::default();
    state.reduce(Action::StartContextLoad(
        ContextCache::loading("dev"),
        NamespaceListCache::loading("dev"),
    ));
    assert!(state.is_context_loading());

    state.reduce(Action::ContextDetail(ContextCache::finished("dev", Ok(context_detail()))));
    assert!(state.is_context_loading());

    state.reduce(Action::NamespaceList(NamespaceListCache::finished(
        "dev",
        Err(crate::FetchError::Auth {
            code: 403,
            message: "forbidden".to_owned(),
        }),
    )));
    assert!(!state.is_context_loading());
    assert!(state.has_context_error());
}
