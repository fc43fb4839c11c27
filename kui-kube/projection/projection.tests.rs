use serde_json::json;

use super::*;

fn metadata() -> Value {
    json!({
        "name": "web",
        "namespace": "default",
        "uid": "8d1f",
        "creationTimestamp": "2024-01-01T00:00:00Z",
        "labels": { "app": "web" },
    })
}

#[test]
fn generic_projection_test() {
    let item = json!({ "kind": "ConfigMap", "metadata": metadata(), "data": { "key": "value" } });

    assert_eq!(
        json!({
            "creationTimestamp": "2024-01-01T00:00:00Z",
            "labels": { "app": "web" },
            "metadata": { "name": "web", "namespace": "default" },
        }),
        generic(&item).unwrap()
    );
}

#[test]
fn generic_projection_defaults_labels_test() {
    let item = json!({ "metadata": { "name": "node-1" } });

    assert_eq!(
        json!({ "labels": {}, "metadata": { "name": "node-1" } }),
        generic(&item).unwrap()
    );
}

#[test]
fn missing_metadata_test() {
    let result = generic(&json!({ "kind": "Pod" }));

    assert_eq!(Err(ProjectionError::MissingField("metadata")), result);
    assert_eq!(
        json!({ "msg": "projection error", "err": "missing field 'metadata'" }),
        projection_error(&result.unwrap_err())
    );
}

#[test]
fn projection_for_test() {
    let item = json!({ "metadata": metadata(), "spec": {}, "status": {} });

    assert_eq!(pod(&item), projection_for("pods")(&item));
    assert_eq!(generic(&item), projection_for("configmaps")(&item));
    assert_eq!(generic(&item), projection_for("statefulsets")(&item));
}

#[test]
fn daemon_set_projection_test() {
    let item = json!({
        "metadata": metadata(),
        "spec": { "selector": { "matchLabels": { "app": "web" } } },
        "status": { "numberReady": 2 },
    });

    let projected = daemon_set(&item).unwrap();

    assert_eq!(json!("2/0"), projected["ready"]);
    assert_eq!(json!("app = web"), projected["selector"]);
    assert_eq!(json!("web"), projected["metadata"]["name"]);
}

#[test]
fn deployment_projection_test() {
    let item = json!({
        "metadata": metadata(),
        "spec": { "replicas": 3, "selector": { "matchLabels": { "app": "web" } } },
        "status": { "readyReplicas": 1 },
    });

    let projected = deployment(&item).unwrap();

    assert_eq!(json!("1/3"), projected["ready"]);
    assert_eq!(json!("app = web"), projected["selector"]);
    assert_eq!(replica_set(&item), Ok(projected));
}

#[test]
fn deployment_without_status_test() {
    let item = json!({ "metadata": metadata(), "spec": { "replicas": 3 } });

    assert_eq!(Err(ProjectionError::MissingField("status")), deployment(&item));
}

#[test]
fn event_projection_test() {
    let item = json!({
        "metadata": metadata(),
        "involvedObject": { "kind": "Pod", "name": "web-1" },
        "reason": "Pulled",
    });

    let projected = event(&item).unwrap();

    assert_eq!(json!(0), projected["count"]);
    assert_eq!(json!(""), projected["message"]);
    assert_eq!(json!(""), projected["type"]);
    assert_eq!(json!("web-1"), projected["involvedObject"]["name"]);
    assert_eq!(None, projected.get("reason"));
}

#[test]
fn pod_projection_test() {
    let item = json!({
        "metadata": metadata(),
        "spec": { "nodeName": "node-1" },
        "status": {
            "phase": "Pending",
            "podIP": "10.1.0.7",
            "initContainerStatuses": [{ "ready": true, "restartCount": 3 }],
            "containerStatuses": [{ "ready": false, "restartCount": 1 }, { "ready": true }],
        },
    });

    let projected = pod(&item).unwrap();

    assert_eq!(json!("2/3"), projected["ready"]);
    assert_eq!(json!(4), projected["restarts"]);
    assert_eq!(json!("Pending"), projected["status"]);
    assert_eq!(json!("10.1.0.7"), projected["ip"]);
    assert_eq!(json!("node-1"), projected["node"]);
}

#[test]
fn pod_without_containers_test() {
    let item = json!({ "metadata": metadata(), "spec": {}, "status": { "phase": "Pending" } });

    let projected = pod(&item).unwrap();

    assert_eq!(json!("0/0"), projected["ready"]);
    assert_eq!(json!(0), projected["restarts"]);
}

#[test]
fn service_projection_test() {
    let item = json!({
        "metadata": metadata(),
        "spec": {
            "clusterIP": "10.0.0.10",
            "selector": { "app": "web" },
            "ports": [{ "port": 80, "protocol": "TCP" }, { "port": 443, "protocol": "TCP" }],
        },
    });

    let projected = service(&item).unwrap();

    assert_eq!(json!("10.0.0.10"), projected["clusterIP"]);
    assert_eq!(json!("80,443"), projected["ports"]);
    assert_eq!(2, projected["portsArray"].as_array().unwrap().len());
    assert_eq!(json!("app = web"), projected["selector"]);
}

#[test]
fn service_without_ports_test() {
    let item = json!({ "metadata": metadata(), "spec": { "type": "ExternalName" } });

    let projected = service(&item).unwrap();

    assert_eq!(json!(""), projected["ports"]);
    assert_eq!(json!([]), projected["portsArray"]);
    assert_eq!(json!("false (does not match anything)"), projected["selector"]);
}
