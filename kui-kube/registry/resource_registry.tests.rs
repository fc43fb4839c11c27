use super::*;
use crate::registry::{CORE_API_PREFIX, GROUPS_API_PREFIX};

fn registry() -> ResourceRegistry {
    [
        ResourceInfo::new("pods", "Pod", false, CORE_API_PREFIX, "v1"),
        ResourceInfo::new("nodes", "Node", true, CORE_API_PREFIX, "v1"),
        ResourceInfo::new("events", "Event", false, CORE_API_PREFIX, "v1"),
        ResourceInfo::new("deployments", "Deployment", false, GROUPS_API_PREFIX, "apps/v1"),
        ResourceInfo::new("daemonsets", "DaemonSet", false, GROUPS_API_PREFIX, "apps/v1"),
        ResourceInfo::new("clusterroles", "ClusterRole", true, GROUPS_API_PREFIX, "rbac.authorization.k8s.io/v1"),
    ]
    .into_iter()
    .collect()
}

fn names(resources: &[&ResourceInfo]) -> Vec<String> {
    resources.iter().map(|r| r.resource_name().to_owned()).collect()
}

#[test]
fn lookup_test() {
    let registry = registry();

    assert_eq!(6, registry.len());
    assert!(registry.has_resource("pods"));
    assert!(!registry.has_resource("pod"));
    assert_eq!("Deployment", registry.resource_info("deployments").unwrap().kind());
    assert_eq!(None, registry.resource_info("jobs"));
}

#[test]
fn sorted_by_display_name_test() {
    let registry = registry();

    assert_eq!(
        vec!["clusterroles", "daemonsets", "deployments", "events", "nodes", "pods"],
        names(&registry.all_resources())
    );
    assert_eq!(
        vec!["daemonsets", "deployments", "events", "pods"],
        names(&registry.namespaced_resources())
    );
    assert_eq!(vec!["clusterroles", "nodes"], names(&registry.cluster_resources()));
}

#[test]
fn grouped_test() {
    let registry = registry();
    let groups = registry.grouped(ResourceScope::Namespaced);

    assert_eq!(2, groups.len());
    assert_eq!("apps", groups[0].0);
    assert_eq!(vec!["daemonsets", "deployments"], names(&groups[0].1));
    assert_eq!("core", groups[1].0);
    assert_eq!(vec!["events", "pods"], names(&groups[1].1));
}

#[test]
fn find_test() {
    let registry = registry();

    let key = "core/Node".parse::<ResourceKey>().unwrap();
    assert_eq!("nodes", registry.find_by_key(&key).unwrap().resource_name());

    let key = "extensions/Deployment".parse::<ResourceKey>().unwrap();
    assert_eq!(None, registry.find_by_key(&key));
}
