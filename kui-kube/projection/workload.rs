use serde::Serialize;
use serde_json::Value;

use super::{ProjectionError, SelectorProjection, count, required, to_value};

/// Workload projection with `ready` as `ready/desired` counts.
#[derive(Serialize)]
struct WorkloadProjection<'a> {
    #[serde(flatten)]
    base: SelectorProjection<'a>,
    ready: String,
}

/// Projects daemon set, `ready` is `numberReady/numberAvailable`.
pub fn daemon_set(item: &Value) -> Result<Value, ProjectionError> {
    let status = required(item, "status")?;
    to_value(&WorkloadProjection {
        base: SelectorProjection::new(item)?,
        ready: format!("{}/{}", count(status, "numberReady"), count(status, "numberAvailable")),
    })
}

/// Projects deployment, `ready` is `readyReplicas/spec.replicas`.
pub fn deployment(item: &Value) -> Result<Value, ProjectionError> {
    replicas_projection(item)
}

/// Projects replica set, `ready` is `readyReplicas/spec.replicas`.
pub fn replica_set(item: &Value) -> Result<Value, ProjectionError> {
    replicas_projection(item)
}

fn replicas_projection(item: &Value) -> Result<Value, ProjectionError> {
    let status = required(item, "status")?;
    let spec = required(item, "spec")?;
    to_value(&WorkloadProjection {
        base: SelectorProjection::new(item)?,
        ready: format!("{}/{}", count(status, "readyReplicas"), count(spec, "replicas")),
    })
}
