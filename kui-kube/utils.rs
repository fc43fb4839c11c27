use serde_json::{Map, Value};

#[cfg(test)]
#[path = "./utils.tests.rs"]
mod utils_tests;

const MATCHES_NOTHING: &str = "false (does not match anything)";
const MATCHES_EVERYTHING: &str = "true (matches everything)";
const INVALID_SELECTOR: &str = "<invalid: selector not object>";
const UNKNOWN_EXPRESSION: &str = "<unknown expression>";
const UNKNOWN_KEY: &str = "__unknown__";

/// Returns human readable form of the label selector, e.g. `app = web, tier in front, back`.\
/// **Note** that missing selector matches nothing and empty one matches everything.
pub fn selector_to_string(selector: Option<&Value>) -> String {
    let selector = match selector {
        None | Some(Value::Null) => return MATCHES_NOTHING.to_owned(),
        Some(Value::Object(selector)) => selector,
        Some(_) => return INVALID_SELECTOR.to_owned(),
    };

    let mut expressions = Vec::new();
    if is_set_based(selector) {
        if let Some(Value::Object(labels)) = selector.get("matchLabels") {
            expressions.extend(labels.iter().map(|(k, v)| format!("{} = {}", k, label_value(v))));
        }

        if let Some(Value::Array(items)) = selector.get("matchExpressions") {
            expressions.extend(items.iter().map(expression_to_string));
        }
    } else {
        expressions.extend(selector.iter().map(|(k, v)| format!("{} = {}", k, label_value(v))));
    }

    if expressions.is_empty() {
        MATCHES_EVERYTHING.to_owned()
    } else {
        expressions.join(", ")
    }
}

/// Returns label selector in the form accepted by the Kubernetes API `labelSelector` query parameter.\
/// **Note** that it returns `None` if the selector is missing or contains unsupported operator.
pub fn to_label_selector(selector: Option<&Value>) -> Option<String> {
    let selector = selector?.as_object()?;

    let mut expressions = Vec::new();
    if is_set_based(selector) {
        if let Some(Value::Object(labels)) = selector.get("matchLabels") {
            expressions.extend(labels.iter().map(|(k, v)| format!("{}={}", k, label_value(v))));
        }

        if let Some(Value::Array(items)) = selector.get("matchExpressions") {
            for item in items {
                expressions.push(expression_to_query(item)?);
            }
        }
    } else {
        expressions.extend(selector.iter().map(|(k, v)| format!("{}={}", k, label_value(v))));
    }

    Some(expressions.join(","))
}

fn is_set_based(selector: &Map<String, Value>) -> bool {
    selector.get("matchLabels").is_some_and(Value::is_object)
        || selector.get("matchExpressions").is_some_and(|e| e.is_object() || e.is_array())
}

fn expression_to_string(expression: &Value) -> String {
    let key = expression_key(expression);
    match expression.get("operator").and_then(Value::as_str) {
        Some("In") => format!("{} in {}", key, expression_values(expression).join(", ")),
        Some("NotIn") => format!("{} not in {}", key, expression_values(expression).join(", ")),
        Some("Exists") => key.to_owned(),
        Some("DoesNotExist") => format!("!{key}"),
        _ => UNKNOWN_EXPRESSION.to_owned(),
    }
}

fn expression_to_query(expression: &Value) -> Option<String> {
    let key = expression.get("key").and_then(Value::as_str)?;
    match expression.get("operator").and_then(Value::as_str)? {
        "In" => Some(format!("{} in ({})", key, expression_values(expression).join(","))),
        "NotIn" => Some(format!("{} notin ({})", key, expression_values(expression).join(","))),
        "Exists" => Some(key.to_owned()),
        "DoesNotExist" => Some(format!("!{key}")),
        _ => None,
    }
}

fn expression_key(expression: &Value) -> &str {
    expression
        .get("key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
        .unwrap_or(UNKNOWN_KEY)
}

fn expression_values(expression: &Value) -> Vec<String> {
    expression
        .get("values")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(label_value).collect())
        .unwrap_or_default()
}

fn label_value(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        value => value.to_string(),
    }
}
