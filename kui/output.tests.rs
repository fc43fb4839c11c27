use serde_json::json;

use super::*;

#[test]
fn render_json_test() {
    let value = json!({ "pods": { "items": [] } });

    assert_eq!("{\n  \"pods\": {\n    \"items\": []\n  }\n}\n", render(&value, OutputFormat::Json).unwrap());
}

#[test]
fn render_yaml_test() {
    let value = json!({ "default": "dev", "items": ["dev", "prod"] });

    assert_eq!("default: dev\nitems:\n- dev\n- prod\n", render(&value, OutputFormat::Yaml).unwrap());
}
