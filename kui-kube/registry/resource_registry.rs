use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::{ResourceInfo, ResourceKey};

#[cfg(test)]
#[path = "./resource_registry.tests.rs"]
mod resource_registry_tests;

/// Which resources to take from the [`ResourceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    All,
    Namespaced,
    Cluster,
}

impl ResourceScope {
    /// Returns `true` if the resource belongs to the scope.
    pub fn contains(self, resource: &ResourceInfo) -> bool {
        match self {
            ResourceScope::All => true,
            ResourceScope::Namespaced => !resource.is_cluster_resource(),
            ResourceScope::Cluster => resource.is_cluster_resource(),
        }
    }
}

/// Immutable set of resources served by a cluster, indexed by resource name.
#[derive(Debug, Default, Clone)]
pub struct ResourceRegistry {
    resources: HashMap<String, ResourceInfo>,
}

impl ResourceRegistry {
    /// Creates new [`ResourceRegistry`] instance.
    pub fn new(resources: HashMap<String, ResourceInfo>) -> Self {
        Self { resources }
    }

    /// Returns `true` if registry knows resource with the specified name.
    pub fn has_resource(&self, resource_name: &str) -> bool {
        self.resources.contains_key(resource_name)
    }

    /// Returns [`ResourceInfo`] for the specified resource name.
    pub fn resource_info(&self, resource_name: &str) -> Option<&ResourceInfo> {
        self.resources.get(resource_name)
    }

    /// Returns all resources sorted by display name.
    pub fn all_resources(&self) -> Vec<&ResourceInfo> {
        self.resources_in(ResourceScope::All)
    }

    /// Returns namespaced resources sorted by display name.
    pub fn namespaced_resources(&self) -> Vec<&ResourceInfo> {
        self.resources_in(ResourceScope::Namespaced)
    }

    /// Returns cluster resources sorted by display name.
    pub fn cluster_resources(&self) -> Vec<&ResourceInfo> {
        self.resources_in(ResourceScope::Cluster)
    }

    /// Returns resources from the `scope` sorted by display name.
    pub fn resources_in(&self, scope: ResourceScope) -> Vec<&ResourceInfo> {
        let mut result = self.resources.values().filter(|r| scope.contains(r)).collect::<Vec<_>>();
        result.sort_by(|a, b| by_display_name(a, b));
        result
    }

    /// Returns resources from the `scope` grouped by their display group.\
    /// **Note** that groups are sorted by name and resources in each group by display name.
    pub fn grouped(&self, scope: ResourceScope) -> Vec<(&str, Vec<&ResourceInfo>)> {
        let mut groups: BTreeMap<&str, Vec<&ResourceInfo>> = BTreeMap::new();
        for resource in self.resources_in(scope) {
            groups.entry(resource.display_group()).or_default().push(resource);
        }

        groups.into_iter().collect()
    }

    /// Finds resource by its version independent [`ResourceKey`].
    pub fn find_by_key(&self, key: &ResourceKey) -> Option<&ResourceInfo> {
        self.resources
            .values()
            .find(|r| r.kind() == key.kind() && r.group() == key.group())
    }

    /// Returns number of resources in the registry.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<ResourceInfo> for ResourceRegistry {
    fn from_iter<T: IntoIterator<Item = ResourceInfo>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|r| (r.resource_name().to_owned(), r))
                .collect(),
        )
    }
}

fn by_display_name(a: &ResourceInfo, b: &ResourceInfo) -> Ordering {
    a.display_name()
        .cmp(b.display_name())
        .then_with(|| a.resource_name().cmp(b.resource_name()))
}
