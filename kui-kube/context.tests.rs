use serde_json::{Value, json};

use super::*;
use crate::client::ListOptions;
use crate::client::mock::{Requests, mock_client};

fn connection(server: &str) -> ConnectionInfo {
    ConnectionInfo {
        server: server.to_owned(),
        auth: Auth::None,
        certificate_authority: None,
        insecure: false,
        default_namespace: None,
    }
}

fn discovery_routes() -> Vec<(&'static str, u16, Value)> {
    vec![
        ("/apis", 200, json!({ "kind": "APIGroupList", "apiVersion": "v1", "groups": [] })),
        (
            "/api/v1",
            200,
            json!({
                "kind": "APIResourceList",
                "apiVersion": "v1",
                "groupVersion": "v1",
                "resources": [
                    { "name": "pods", "singularName": "", "namespaced": true, "kind": "Pod", "verbs": ["get", "list"] },
                    { "name": "pods/log", "singularName": "", "namespaced": true, "kind": "Pod", "verbs": ["get"] },
                    { "name": "nodes", "singularName": "", "namespaced": false, "kind": "Node", "verbs": ["get", "list"] },
                ],
            }),
        ),
    ]
}

fn context(name: &str, server: &str, client: &Client, registries: &RegistryCache) -> Context {
    Context::new(name, connection(server), ClientOptions::default(), Arc::clone(registries)).with_client(client.clone())
}

fn count(requests: &Requests, path: &str) -> usize {
    requests.lock().unwrap().iter().filter(|r| *r == path).count()
}

#[tokio::test]
async fn registry_is_shared_by_server_test() {
    let (client, requests) = mock_client(discovery_routes());
    let registries = RegistryCache::default();
    let dev = context("dev", "https://127.0.0.1:6443", &client, &registries);
    let admin = context("admin", "https://127.0.0.1:6443", &client, &registries);

    let first = dev.registry().await.unwrap();
    let second = admin.registry().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(2, first.len());
    assert!(first.has_resource("pods"));
    assert!(!first.has_resource("pods/log"));
    assert_eq!(1, count(&requests, "/apis"));
    assert_eq!(1, count(&requests, "/api/v1"));
}

#[tokio::test]
async fn registry_is_discovered_per_server_test() {
    let (client, requests) = mock_client(discovery_routes());
    let registries = RegistryCache::default();

    context("dev", "https://127.0.0.1:6443", &client, &registries).registry().await.unwrap();
    context("prod", "https://10.0.0.1:6443", &client, &registries).registry().await.unwrap();

    assert_eq!(2, count(&requests, "/apis"));
    assert_eq!(2, registries.read().await.len());
}

#[tokio::test]
async fn resource_test() {
    let mut routes = discovery_routes();
    routes.push((
        "/api/v1/nodes",
        200,
        json!({ "kind": "NodeList", "items": [{ "metadata": { "name": "node-1" } }] }),
    ));
    let (client, _) = mock_client(routes);
    let registries = RegistryCache::default();
    let dev = context("dev", "https://127.0.0.1:6443", &client, &registries);

    let nodes = dev.resource("nodes", Some("default")).await.unwrap();
    assert_eq!("/api/v1/nodes", nodes.path().collection_path());

    let list = nodes.list(&ListOptions::default()).await.unwrap();
    assert_eq!(json!("node-1"), list.items[0]["metadata"]["name"]);

    let pods = dev.resource("pods", Some("default")).await.unwrap();
    assert_eq!("/api/v1/namespaces/default/pods", pods.path().collection_path());
}

#[tokio::test]
async fn unknown_resource_test() {
    let (client, _) = mock_client(discovery_routes());
    let dev = context("dev", "https://127.0.0.1:6443", &client, &RegistryCache::default());

    let result = dev.resource("widgets", None).await;

    assert!(matches!(result, Err(ContextError::UnknownResource(name)) if name == "widgets"));
}

#[tokio::test]
async fn failed_discovery_is_not_cached_test() {
    let (client, _) = mock_client(Vec::new());
    let registries = RegistryCache::default();
    let dev = context("dev", "https://127.0.0.1:6443", &client, &registries);

    let result = dev.registry().await;

    assert!(matches!(result, Err(ContextError::Discovery(DiscoveryError::Groups(_)))));
    assert!(registries.read().await.is_empty());
}
