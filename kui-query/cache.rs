use kui_kube::{ResourceInfo, ResourceKey, ResourceRegistry};
use serde::Serialize;

use crate::{FetchError, QueryScope};

/// Kubeconfig contexts available to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContextList {
    /// Current context from the kubeconfig files, empty if none is set.
    pub default: String,
    pub items: Vec<String>,

    /// Errors from loading kubeconfig files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Resource served by the context's cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub name: String,
    pub key: ResourceKey,
    pub kind: String,
    pub display_group: String,
    pub display_name: String,
    pub plural_name: String,
    pub is_cluster_resource: bool,
}

impl From<&ResourceInfo> for ResourceSummary {
    fn from(value: &ResourceInfo) -> Self {
        Self {
            name: value.resource_name().to_owned(),
            key: value.key(),
            kind: value.kind().to_owned(),
            display_group: value.display_group().to_owned(),
            display_name: value.display_name().to_owned(),
            plural_name: value.plural_name().to_owned(),
            is_cluster_resource: value.is_cluster_resource(),
        }
    }
}

/// Details of the context: its default namespace and resources served by its cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,
    pub resources: Vec<ResourceSummary>,
}

impl ContextDetail {
    /// Creates new [`ContextDetail`] from the cluster resource registry.
    pub fn new(registry: &ResourceRegistry, default_namespace: Option<&str>) -> Self {
        Self {
            default_namespace: default_namespace.map(String::from),
            resources: registry.all_resources().into_iter().map(ResourceSummary::from).collect(),
        }
    }

    /// Returns the named resource.
    pub fn resource(&self, name: &str) -> Option<&ResourceSummary> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Returns `true` if the named resource is served by the cluster.
    pub fn has_resource(&self, name: &str) -> bool {
        self.resource(name).is_some()
    }

    /// Returns resource for the version independent key.
    pub fn find_by_key(&self, key: &ResourceKey) -> Option<&ResourceSummary> {
        self.resources.iter().find(|r| r.key == *key)
    }

    /// Returns names of the resources that can be listed in the query scope.
    pub fn resources_in(&self, scope: QueryScope) -> Vec<&str> {
        let cluster = scope == QueryScope::ClusterObjects;
        self.resources
            .iter()
            .filter(|r| r.is_cluster_resource == cluster)
            .map(|r| r.name.as_str())
            .collect()
    }
}

/// Cached details of the selected context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextCache {
    pub context_name: String,
    pub loading: bool,
    pub detail: Option<ContextDetail>,
    pub err: Option<FetchError>,
}

impl ContextCache {
    /// Creates cache for the context detail that is being loaded.
    pub fn loading(context_name: &str) -> Self {
        Self {
            context_name: context_name.to_owned(),
            loading: true,
            ..Default::default()
        }
    }

    /// Creates cache for the loaded context detail.
    pub fn finished(context_name: &str, result: Result<ContextDetail, FetchError>) -> Self {
        let (detail, err) = match result {
            Ok(detail) => (Some(detail), None),
            Err(err) => (None, Some(err)),
        };

        Self {
            context_name: context_name.to_owned(),
            loading: false,
            detail,
            err,
        }
    }
}

/// Cached namespaces of the selected context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceListCache {
    pub context_name: String,
    pub loading: bool,
    pub namespaces: Option<Vec<String>>,
    pub err: Option<FetchError>,
}

impl NamespaceListCache {
    /// Creates cache for the namespace list that is being loaded.
    pub fn loading(context_name: &str) -> Self {
        Self {
            context_name: context_name.to_owned(),
            loading: true,
            ..Default::default()
        }
    }

    /// Creates cache for the loaded namespace list.
    pub fn finished(context_name: &str, result: Result<Vec<String>, FetchError>) -> Self {
        let (namespaces, err) = match result {
            Ok(namespaces) => (Some(namespaces), None),
            Err(err) => (None, Some(err)),
        };

        Self {
            context_name: context_name.to_owned(),
            loading: false,
            namespaces,
            err,
        }
    }
}
