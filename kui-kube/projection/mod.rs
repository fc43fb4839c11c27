use serde::Serialize;
use serde_json::{Value, json};

use crate::kinds::{DAEMON_SETS, DEPLOYMENTS, EVENTS, PODS, REPLICA_SETS, SERVICES};
use crate::utils::selector_to_string;

pub use self::event::event;
pub use self::pod::pod;
pub use self::service::service;
pub use self::workload::{daemon_set, deployment, replica_set};

mod event;
mod pod;
mod service;
mod workload;

#[cfg(test)]
#[path = "./projection.tests.rs"]
mod projection_tests;

/// Function that reduces a Kubernetes object to the fields a list view needs.
pub type Projection = fn(&Value) -> Result<Value, ProjectionError>;

/// Possible errors when projecting a Kubernetes object.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Object lacks a field the projection depends on.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// Projected value cannot be serialized.
    #[error("cannot serialize projection: {0}")]
    Serialization(String),
}

/// Returns projection registered for the resource name or the generic one.
pub fn projection_for(resource_name: &str) -> Projection {
    match resource_name {
        DAEMON_SETS => daemon_set,
        DEPLOYMENTS => deployment,
        EVENTS => event,
        PODS => pod,
        REPLICA_SETS => replica_set,
        SERVICES => service,
        _ => generic,
    }
}

/// Projects any object to its creation timestamp, labels, name and namespace.
pub fn generic(item: &Value) -> Result<Value, ProjectionError> {
    to_value(&BaseProjection::new(item)?)
}

/// Returns object that replaces an item for which projection failed.
pub fn projection_error(error: &ProjectionError) -> Value {
    json!({
        "msg": "projection error",
        "err": error.to_string(),
    })
}

/// Fields shared by all projections.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BaseProjection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    creation_timestamp: Option<&'a Value>,
    labels: Value,
    metadata: BaseMetadata<'a>,
}

#[derive(Serialize)]
struct BaseMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a Value>,
}

impl<'a> BaseProjection<'a> {
    fn new(item: &'a Value) -> Result<Self, ProjectionError> {
        let metadata = item
            .get("metadata")
            .filter(|m| m.is_object())
            .ok_or(ProjectionError::MissingField("metadata"))?;

        Ok(Self {
            creation_timestamp: metadata.get("creationTimestamp"),
            labels: metadata
                .get("labels")
                .filter(|l| !l.is_null())
                .cloned()
                .unwrap_or_else(|| json!({})),
            metadata: BaseMetadata {
                name: metadata.get("name"),
                namespace: metadata.get("namespace"),
            },
        })
    }
}

/// Base fields together with the human readable `spec.selector`.
#[derive(Serialize)]
struct SelectorProjection<'a> {
    #[serde(flatten)]
    base: BaseProjection<'a>,
    selector: String,
}

impl<'a> SelectorProjection<'a> {
    fn new(item: &'a Value) -> Result<Self, ProjectionError> {
        let spec = required(item, "spec")?;
        Ok(Self {
            base: BaseProjection::new(item)?,
            selector: selector_to_string(spec.get("selector")),
        })
    }
}

/// Returns the object field that must be present.
fn required<'a>(item: &'a Value, field: &'static str) -> Result<&'a Value, ProjectionError> {
    item.get(field)
        .filter(|v| v.is_object())
        .ok_or(ProjectionError::MissingField(field))
}

/// Returns `field` of the object as a number, `0` if it is not set.
fn count(object: &Value, field: &str) -> i64 {
    object.get(field).and_then(Value::as_i64).unwrap_or_default()
}

fn to_value<T: Serialize>(projection: &T) -> Result<Value, ProjectionError> {
    serde_json::to_value(projection).map_err(|error| ProjectionError::Serialization(error.to_string()))
}
