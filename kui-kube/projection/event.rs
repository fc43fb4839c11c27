use serde::Serialize;
use serde_json::Value;

use super::{BaseProjection, ProjectionError, count, to_value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventProjection<'a> {
    #[serde(flatten)]
    base: BaseProjection<'a>,
    count: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    involved_object: Option<&'a Value>,
    message: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
}

/// Projects event to its count, involved object, message and type.
pub fn event(item: &Value) -> Result<Value, ProjectionError> {
    to_value(&EventProjection {
        base: BaseProjection::new(item)?,
        count: count(item, "count"),
        involved_object: item.get("involvedObject"),
        message: item.get("message").and_then(Value::as_str).unwrap_or_default(),
        event_type: item.get("type").and_then(Value::as_str).unwrap_or_default(),
    })
}
