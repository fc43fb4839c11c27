use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(None, "false (does not match anything)")]
#[case(Some(json!(null)), "false (does not match anything)")]
#[case(Some(json!("app=web")), "<invalid: selector not object>")]
#[case(Some(json!({})), "true (matches everything)")]
#[case(Some(json!({ "app": "web", "tier": "front" })), "app = web, tier = front")]
#[case(Some(json!({ "matchLabels": { "app": "web" } })), "app = web")]
#[case(Some(json!({ "matchLabels": {}, "matchExpressions": [] })), "true (matches everything)")]
fn selector_to_string_test(#[case] selector: Option<Value>, #[case] expected: &str) {
    assert_eq!(expected, selector_to_string(selector.as_ref()));
}

#[test]
fn selector_to_string_expressions_test() {
    let selector = json!({
        "matchLabels": { "app": "web" },
        "matchExpressions": [
            { "key": "tier", "operator": "In", "values": ["front", "back"] },
            { "key": "env", "operator": "NotIn", "values": ["dev"] },
            { "key": "canary", "operator": "Exists" },
            { "key": "legacy", "operator": "DoesNotExist" },
            { "operator": "Exists" },
            { "key": "zone", "operator": "Near" },
        ],
    });

    assert_eq!(
        "app = web, tier in front, back, env not in dev, canary, !legacy, __unknown__, <unknown expression>",
        selector_to_string(Some(&selector))
    );
}

#[test]
fn selector_with_expressions_only_is_set_based_test() {
    let selector = json!({ "matchExpressions": [{ "key": "canary", "operator": "Exists" }] });

    assert_eq!("canary", selector_to_string(Some(&selector)));
}

#[test]
fn to_label_selector_test() {
    let selector = json!({
        "matchLabels": { "app": "web", "tier": "front" },
        "matchExpressions": [
            { "key": "env", "operator": "In", "values": ["prod", "stage"] },
            { "key": "zone", "operator": "NotIn", "values": ["a"] },
            { "key": "canary", "operator": "Exists" },
            { "key": "legacy", "operator": "DoesNotExist" },
        ],
    });

    assert_eq!(
        Some("app=web,tier=front,env in (prod,stage),zone notin (a),canary,!legacy".to_owned()),
        to_label_selector(Some(&selector))
    );
    assert_eq!(Some("app=web".to_owned()), to_label_selector(Some(&json!({ "app": "web" }))));
    assert_eq!(Some(String::new()), to_label_selector(Some(&json!({}))));
}

#[test]
fn to_label_selector_rejects_invalid_test() {
    let unknown = json!({ "matchExpressions": [{ "key": "zone", "operator": "Near" }] });
    let no_key = json!({ "matchExpressions": [{ "operator": "Exists" }] });

    assert_eq!(None, to_label_selector(None));
    assert_eq!(None, to_label_selector(Some(&json!("app=web"))));
    assert_eq!(None, to_label_selector(Some(&unknown)));
    assert_eq!(None, to_label_selector(Some(&no_key)));
}
