use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Mutex;

use super::*;

struct FakeSource {
    groups: Value,
    resources: HashMap<String, Value>,
    requested: Mutex<Vec<String>>,
}

impl FakeSource {
    fn new(groups: Value) -> Self {
        Self {
            groups,
            resources: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn with(mut self, prefix: &str, group_version: &str, resources: Vec<Value>) -> Self {
        self.resources.insert(
            format!("{prefix}/{group_version}"),
            json!({
                "kind": "APIResourceList",
                "apiVersion": "v1",
                "groupVersion": group_version,
                "resources": resources,
            }),
        );
        self
    }
}

impl DiscoverySource for FakeSource {
    async fn api_groups(&self) -> Result<APIGroupList, ClientError> {
        Ok(serde_json::from_value(self.groups.clone())?)
    }

    async fn api_resources(&self, prefix: &str, group_version: &str) -> Result<APIResourceList, ClientError> {
        let path = format!("{prefix}/{group_version}");
        self.requested.lock().unwrap().push(path.clone());
        match self.resources.get(&path) {
            Some(list) => Ok(serde_json::from_value(list.clone())?),
            None => Err(ClientError::NotFound(path)),
        }
    }
}

fn resource(name: &str, kind: &str, namespaced: bool, verbs: &[&str]) -> Value {
    json!({
        "name": name,
        "singularName": "",
        "namespaced": namespaced,
        "kind": kind,
        "verbs": verbs,
    })
}

fn group(name: &str, versions: &[&str], preferred: &str) -> Value {
    let version = |gv: &str| {
        json!({
            "groupVersion": gv,
            "version": gv.split_once('/').map(|(_, v)| v).unwrap_or(gv),
        })
    };

    json!({
        "name": name,
        "versions": versions.iter().map(|v| version(*v)).collect::<Vec<_>>(),
        "preferredVersion": version(preferred),
    })
}

fn groups(groups: Vec<Value>) -> Value {
    json!({ "kind": "APIGroupList", "apiVersion": "v1", "groups": groups })
}

const ALL: &[&str] = &["create", "delete", "get", "list", "patch", "update", "watch"];

#[tokio::test]
async fn discover_core_and_groups_test() {
    let source = FakeSource::new(groups(vec![group("apps", &["apps/v1"], "apps/v1")]))
        .with(
            "/api",
            "v1",
            vec![
                resource("pods", "Pod", true, ALL),
                resource("pods/log", "Pod", true, &["get"]),
                resource("nodes", "Node", false, ALL),
                resource("bindings", "Binding", true, &["create"]),
            ],
        )
        .with("/apis", "apps/v1", vec![resource("deployments", "Deployment", true, ALL)]);

    let registry = discover(&source, 4).await.unwrap();

    assert_eq!(3, registry.len());
    assert!(!registry.has_resource("pods/log"));
    assert!(!registry.has_resource("bindings"));

    let pods = registry.resource_info("pods").unwrap();
    assert_eq!("/api", pods.prefix());
    assert_eq!("v1", pods.version());
    assert!(!pods.is_cluster_resource());

    let nodes = registry.resource_info("nodes").unwrap();
    assert!(nodes.is_cluster_resource());

    let deployments = registry.resource_info("deployments").unwrap();
    assert_eq!("/apis", deployments.prefix());
    assert_eq!("apps/v1", deployments.version());
    assert_eq!(
        "/apis/apps/v1/namespaces/default/deployments",
        deployments.resource_path(Some("default")).collection_path()
    );
}

#[tokio::test]
async fn discover_reconciles_versions_test() {
    let source = FakeSource::new(groups(vec![
        group("extensions", &["extensions/v1beta1"], "extensions/v1beta1"),
        group("apps", &["apps/v1", "apps/v1beta1"], "apps/v1"),
    ]))
    .with("/api", "v1", vec![])
    .with(
        "/apis",
        "extensions/v1beta1",
        vec![
            resource("deployments", "Deployment", true, ALL),
            resource("ingresses", "Ingress", true, ALL),
        ],
    )
    .with("/apis", "apps/v1", vec![resource("deployments", "Deployment", true, ALL)])
    .with(
        "/apis",
        "apps/v1beta1",
        vec![
            resource("deployments", "Deployment", true, ALL),
            resource("controllerrevisions", "ControllerRevision", true, ALL),
        ],
    );

    let registry = discover(&source, 2).await.unwrap();

    assert_eq!("apps/v1", registry.resource_info("deployments").unwrap().version());
    assert_eq!("extensions/v1beta1", registry.resource_info("ingresses").unwrap().version());
    assert_eq!("apps/v1beta1", registry.resource_info("controllerrevisions").unwrap().version());

    let mut requested = source.requested.lock().unwrap().clone();
    requested.sort();
    assert_eq!(
        vec!["/api/v1", "/apis/apps/v1", "/apis/apps/v1beta1", "/apis/extensions/v1beta1"],
        requested
    );
}

#[tokio::test]
async fn discover_fails_on_any_error_test() {
    let source = FakeSource::new(groups(vec![group("apps", &["apps/v1"], "apps/v1")]))
        .with("/api", "v1", vec![resource("pods", "Pod", true, ALL)]);

    let result = discover(&source, 1).await;

    assert!(matches!(
        result,
        Err(DiscoveryError::Resources { group_version, .. }) if group_version == "apps/v1"
    ));
}

#[test]
fn builder_keeps_preferred_entry_test() {
    let mut builder = RegistryBuilder::default();
    builder.add(ResourceInfo::new("jobs", "Job", false, GROUPS_API_PREFIX, "batch/v1"), true);
    builder.add(ResourceInfo::new("jobs", "Job", false, GROUPS_API_PREFIX, "batch/v2"), false);
    builder.add(ResourceInfo::new("jobs", "Job", false, GROUPS_API_PREFIX, "other/v1"), true);

    builder.add(ResourceInfo::new("crons", "Cron", false, GROUPS_API_PREFIX, "batch/v1beta1"), false);
    builder.add(ResourceInfo::new("crons", "Cron", false, GROUPS_API_PREFIX, "batch/v2alpha1"), false);

    let registry = builder.build();

    assert_eq!("batch/v1", registry.resource_info("jobs").unwrap().version());
    assert_eq!("batch/v2alpha1", registry.resource_info("crons").unwrap().version());
}

#[rstest]
#[case(&["extensions/v1beta1", "apps/v1"], "apps/v1")]
#[case(&["apps/v1", "extensions/v1beta1"], "apps/v1")]
#[case(&["apps/v1", "other/v1"], "apps/v1")]
#[case(&["other/v1", "apps/v1"], "other/v1")]
fn builder_preferred_collision_test(#[case] versions: &[&str], #[case] expected: &str) {
    let mut builder = RegistryBuilder::default();
    for version in versions {
        builder.add(
            ResourceInfo::new("deployments", "Deployment", false, GROUPS_API_PREFIX, *version),
            true,
        );
    }

    let registry = builder.build();

    assert_eq!(expected, registry.resource_info("deployments").unwrap().version());
}
