use rstest::rstest;

use super::*;

#[rstest]
#[case("FooBarPolicy", "Foo Bar Policy")]
#[case("Pod", "Pod")]
#[case("APIService", "APIService")]
#[case("HorizontalPodAutoscaler", "Horizontal Pod Autoscaler")]
#[case("CSIStorageCapacity", "CSIStorage Capacity")]
fn display_name_test(#[case] kind: &str, #[case] expected: &str) {
    let info = ResourceInfo::new("any", kind, false, GROUPS_API_PREFIX, "example.com/v1");

    assert_eq!(expected, info.display_name());
}

#[rstest]
#[case("foobarpolicies", "FooBarPolicy", "Foo Bar Policies")]
#[case("deployments", "Deployment", "Deployments")]
#[case("networkpolicies", "NetworkPolicy", "Network Policies")]
#[case("endpoints", "Endpoints", "Endpoints")]
#[case("ingresses", "Ingress", "Ingresses")]
#[case("pods", "Service", "pods")]
fn plural_name_test(#[case] resource_name: &str, #[case] kind: &str, #[case] expected: &str) {
    let info = ResourceInfo::new(resource_name, kind, false, GROUPS_API_PREFIX, "example.com/v1");

    assert_eq!(expected, info.plural_name());
}

#[test]
fn resource_path_test() {
    let deployments = ResourceInfo::new("deployments", "Deployment", false, GROUPS_API_PREFIX, "apps/v1");
    let nodes = ResourceInfo::new("nodes", "Node", true, CORE_API_PREFIX, "v1");

    let path = deployments.resource_path(Some("default"));
    assert_eq!("/apis/apps/v1/namespaces/default/deployments", path.collection_path());
    assert_eq!("/apis/apps/v1/namespaces/default/deployments/web", path.object_path("web"));

    let path = deployments.resource_path(Some(""));
    assert_eq!(None, path.namespace);
    assert_eq!("/apis/apps/v1/deployments", path.collection_path());

    let path = nodes.resource_path(Some("default"));
    assert_eq!(None, path.namespace);
    assert_eq!("/api/v1/nodes/node-1", path.object_path("node-1"));
    assert_eq!("/api/v1/nodes", path.object_path(""));
}

#[test]
fn groups_test() {
    let pods = ResourceInfo::new("pods", "Pod", false, CORE_API_PREFIX, "v1");
    let deployments = ResourceInfo::new("deployments", "Deployment", false, GROUPS_API_PREFIX, "apps/v1");

    assert_eq!("", pods.group());
    assert_eq!("core", pods.display_group());
    assert_eq!("apps", deployments.group());
    assert_eq!("apps", deployments.display_group());
}

#[test]
fn resource_key_test() {
    let pods = ResourceInfo::new("pods", "Pod", false, CORE_API_PREFIX, "v1");
    let deployments = ResourceInfo::new("deployments", "Deployment", false, GROUPS_API_PREFIX, "apps/v1beta2");

    assert_eq!("core/Pod", pods.key().to_string());
    assert_eq!("apps/Deployment", deployments.key().to_string());

    let parsed: ResourceKey = "core/Pod".parse().unwrap();
    assert_eq!(pods.key(), parsed);
    assert_eq!("", parsed.group());

    let parsed: ResourceKey = "apps/Deployment".parse().unwrap();
    assert_eq!(deployments.key(), parsed);

    assert!("Pod".parse::<ResourceKey>().is_err());
    assert!("/Pod".parse::<ResourceKey>().is_err());
    assert!("apps/".parse::<ResourceKey>().is_err());
}

#[test]
fn resource_key_serialization_test() {
    let key = ResourceKey::new("apps", "StatefulSet");

    let json = serde_json::to_string(&key).unwrap();
    assert_eq!("\"apps/StatefulSet\"", json);
    assert_eq!(key, serde_json::from_str::<ResourceKey>(&json).unwrap());
}
