use serde::Serialize;
use serde_json::{Value, json};

use super::{ProjectionError, SelectorProjection, required, to_value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceProjection<'a> {
    #[serde(flatten)]
    base: SelectorProjection<'a>,

    #[serde(rename = "clusterIP", skip_serializing_if = "Option::is_none")]
    cluster_ip: Option<&'a Value>,
    ports: String,
    ports_array: Value,
}

/// Projects service to its cluster IP and ports.
pub fn service(item: &Value) -> Result<Value, ProjectionError> {
    let spec = required(item, "spec")?;
    let ports = spec.get("ports").and_then(Value::as_array);

    to_value(&ServiceProjection {
        base: SelectorProjection::new(item)?,
        cluster_ip: spec.get("clusterIP"),
        ports: ports
            .map(|ports| {
                ports
                    .iter()
                    .map(|p| p.get("port").map(port_to_string).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default(),
        ports_array: ports.map(|p| Value::Array(p.clone())).unwrap_or_else(|| json!([])),
    })
}

fn port_to_string(port: &Value) -> String {
    match port {
        Value::String(port) => port.clone(),
        port => port.to_string(),
    }
}
