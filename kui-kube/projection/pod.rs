use serde::Serialize;
use serde_json::Value;

use super::{BaseProjection, ProjectionError, count, required, to_value};

#[derive(Serialize)]
struct PodProjection<'a> {
    #[serde(flatten)]
    base: BaseProjection<'a>,

    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<&'a Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<&'a Value>,
    ready: String,
    restarts: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a Value>,
}

/// Projects pod to its IP, node, phase, ready containers and restarts.\
/// **Note** that init containers are counted too.
pub fn pod(item: &Value) -> Result<Value, ProjectionError> {
    let status = required(item, "status")?;
    let spec = required(item, "spec")?;
    let containers = container_statuses(status).collect::<Vec<_>>();
    let ready = containers
        .iter()
        .filter(|c| c.get("ready").and_then(Value::as_bool).unwrap_or_default())
        .count();

    to_value(&PodProjection {
        base: BaseProjection::new(item)?,
        ip: status.get("podIP"),
        node: spec.get("nodeName"),
        ready: format!("{}/{}", ready, containers.len()),
        restarts: containers.iter().map(|c| count(c, "restartCount")).sum(),
        status: status.get("phase"),
    })
}

fn container_statuses(status: &Value) -> impl Iterator<Item = &Value> {
    ["initContainerStatuses", "containerStatuses"]
        .into_iter()
        .filter_map(|field| status.get(field).and_then(Value::as_array))
        .flatten()
}
