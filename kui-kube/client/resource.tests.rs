use serde_json::json;

use super::*;
use crate::client::mock::mock_client;
use crate::projection::projection_for;
use crate::registry::{CORE_API_PREFIX, ResourceInfo};

fn pods_path(namespace: Option<&str>) -> ResourcePath {
    ResourceInfo::new("pods", "Pod", false, CORE_API_PREFIX, "v1").resource_path(namespace)
}

fn pod(name: &str, ready: &[bool]) -> Value {
    json!({
        "metadata": { "name": name, "namespace": "default", "creationTimestamp": "2024-01-01T00:00:00Z" },
        "spec": { "nodeName": "node-1" },
        "status": {
            "phase": "Running",
            "podIP": "10.1.0.7",
            "containerStatuses": ready
                .iter()
                .map(|r| json!({ "ready": r, "restartCount": 1 }))
                .collect::<Vec<_>>(),
        },
    })
}

#[test]
fn options_from_params_test() {
    let params = [
        ("k8s.fieldSelector", "involvedObject.name=web"),
        ("k8s.labelSelector", "app=web"),
        ("k8s.limit", "50"),
        ("k8s.continue", "token"),
        ("k8s.timeoutSeconds", "not-a-number"),
        ("k8s.resourceVersion", "7"),
        ("page", "2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect::<BTreeMap<_, _>>();

    let options = ListOptions::from_params(&params);

    assert_eq!(Some("involvedObject.name=web"), options.field_selector.as_deref());
    assert_eq!(Some("app=web"), options.label_selector.as_deref());
    assert_eq!(Some(50), options.limit);
    assert_eq!(Some("token"), options.continue_token.as_deref());
    assert_eq!(None, options.timeout_seconds);
    assert_eq!(
        vec![
            ("resourceVersion".to_owned(), "7".to_owned()),
            ("timeoutSeconds".to_owned(), "not-a-number".to_owned()),
        ],
        options.extra
    );
}

#[tokio::test]
async fn list_url_test() {
    let (client, _) = mock_client(Vec::new());
    let resource = client.resource(pods_path(Some("default")));

    assert_eq!("/api/v1/namespaces/default/pods", resource.list_url(&ListOptions::default()));

    let options = ListOptions {
        field_selector: Some("involvedObject.name=web,involvedObject.kind=Deployment".to_owned()),
        limit: Some(10),
        ..Default::default()
    };
    assert_eq!(
        "/api/v1/namespaces/default/pods?fieldSelector=involvedObject.name%3Dweb%2CinvolvedObject.kind%3DDeployment&limit=10",
        resource.list_url(&options)
    );
}

#[tokio::test]
async fn list_with_projection_test() {
    let body = json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "100" },
        "items": [pod("web-1", &[true, true]), { "kind": "Broken" }],
    });
    let (client, requests) = mock_client(vec![("/api/v1/namespaces/default/pods", 200, body)]);
    let options = ListOptions::default().with_projection(projection_for("pods"));

    let list = client.resource(pods_path(Some("default"))).list(&options).await.unwrap();

    assert_eq!(Some("PodList"), list.kind());
    assert_eq!(None, list.continue_token());
    assert_eq!(2, list.items.len());
    assert_eq!(json!("2/2"), list.items[0]["ready"]);
    assert_eq!(json!(2), list.items[0]["restarts"]);
    assert_eq!(json!("web-1"), list.items[0]["metadata"]["name"]);
    assert_eq!(None, list.items[0].get("spec"));
    assert_eq!(json!("projection error"), list.items[1]["msg"]);
    assert!(list.items[1]["err"].is_string());
    assert_eq!(vec!["/api/v1/namespaces/default/pods"], *requests.lock().unwrap());
}

#[tokio::test]
async fn list_without_projection_keeps_items_test() {
    let body = json!({ "kind": "PodList", "metadata": { "continue": "next" }, "items": [pod("web-1", &[false])] });
    let (client, _) = mock_client(vec![("/api/v1/pods", 200, body)]);

    let list = client.resource(pods_path(None)).list(&ListOptions::default()).await.unwrap();

    assert_eq!(Some("next"), list.continue_token());
    assert_eq!(json!("node-1"), list.items[0]["spec"]["nodeName"]);
}

#[tokio::test]
async fn get_object_test() {
    let (client, _) = mock_client(vec![("/api/v1/namespaces/default/pods/web-1", 200, pod("web-1", &[true]))]);

    let object = client.resource(pods_path(Some("default"))).get("web-1").await.unwrap();

    assert_eq!(json!("Running"), object["status"]["phase"]);
}

#[tokio::test]
async fn status_errors_test() {
    let forbidden = json!({ "kind": "Status", "message": "pods is forbidden", "code": 403 });
    let (client, _) = mock_client(vec![
        ("/api/v1/namespaces/secret/pods", 403, forbidden),
        ("/api/v1/namespaces/default/pods/broken", 500, json!("internal error")),
    ]);

    let result = client.resource(pods_path(Some("secret"))).list(&ListOptions::default()).await;
    assert!(matches!(result, Err(ClientError::Auth { code: 403, message }) if message == "pods is forbidden"));

    let result = client.resource(pods_path(Some("default"))).get("missing").await;
    assert!(matches!(result, Err(ClientError::NotFound(_))));

    let result = client.resource(pods_path(Some("default"))).get("broken").await;
    assert!(matches!(result, Err(ClientError::Http { code: 500, .. })));
}
