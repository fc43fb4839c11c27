use futures::{StreamExt, TryStreamExt};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroupList, APIResource, APIResourceList};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::CORE_VERSION;
use crate::client::ClientError;

use super::{CORE_API_PREFIX, GROUPS_API_PREFIX, ResourceInfo, ResourceRegistry};

#[cfg(test)]
#[path = "./discovery.tests.rs"]
mod discovery_tests;

/// Possible errors when discovering resources served by a cluster.
#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    /// Cannot list API groups.
    #[error("cannot list API groups: {0}")]
    Groups(#[source] ClientError),

    /// Cannot list resources of the API group version.
    #[error("cannot list resources of '{group_version}': {source}")]
    Resources {
        group_version: String,
        #[source]
        source: ClientError,
    },
}

/// Source of the API discovery documents.
pub trait DiscoverySource: Sync {
    /// Returns API groups served under `/apis`.
    fn api_groups(&self) -> impl Future<Output = Result<APIGroupList, ClientError>> + Send;

    /// Returns resources served for the group version under the specified API `prefix`.
    fn api_resources(
        &self,
        prefix: &str,
        group_version: &str,
    ) -> impl Future<Output = Result<APIResourceList, ClientError>> + Send;
}

/// API group with its versions to query.
struct DiscoveryGroup {
    prefix: &'static str,
    versions: Vec<String>,
    preferred: Option<String>,
}

/// Discovers all resources served by a cluster and builds [`ResourceRegistry`] from them.\
/// **Note** that group versions are queried concurrently (at most `concurrency` at once), but reconciled in the
/// order they were requested. Any failure fails the whole discovery.
pub async fn discover<S: DiscoverySource>(source: &S, concurrency: usize) -> Result<ResourceRegistry, DiscoveryError> {
    let groups = source.api_groups().await.map_err(DiscoveryError::Groups)?;

    let mut plan = vec![DiscoveryGroup {
        prefix: CORE_API_PREFIX,
        versions: vec![CORE_VERSION.to_owned()],
        preferred: Some(CORE_VERSION.to_owned()),
    }];
    plan.extend(groups.groups.into_iter().map(|group| DiscoveryGroup {
        prefix: GROUPS_API_PREFIX,
        versions: group.versions.into_iter().map(|v| v.group_version).collect(),
        preferred: group.preferred_version.map(|v| v.group_version),
    }));

    let groups_count = plan.len();
    let requests = plan
        .into_iter()
        .flat_map(|group| {
            group.versions.into_iter().map(move |version| {
                let preferred = group.preferred.as_deref() == Some(version.as_str());
                (group.prefix, version, preferred)
            })
        })
        .collect::<Vec<(&'static str, String, bool)>>();
    let requests = requests
        .into_iter()
        .map(|(prefix, version, preferred)| fetch_resources(source, prefix, version, preferred))
        .collect::<Vec<_>>();
    let lists = futures::stream::iter(requests)
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .await?;

    let mut builder = RegistryBuilder::default();
    for (prefix, version, preferred, list) in lists {
        for resource in &list.resources {
            if let Some(info) = to_resource_info(resource, prefix, &version) {
                builder.add(info, preferred);
            }
        }
    }

    let registry = builder.build();
    info!("Discovered {} resources in {} API groups", registry.len(), groups_count);

    Ok(registry)
}

/// Queries resources of a single group version for [`discover`].
async fn fetch_resources<S: DiscoverySource>(
    source: &S,
    prefix: &'static str,
    version: String,
    preferred: bool,
) -> Result<(&'static str, String, bool, APIResourceList), DiscoveryError> {
    match source.api_resources(prefix, &version).await {
        Ok(list) => Ok((prefix, version, preferred, list)),
        Err(error) => Err(DiscoveryError::Resources {
            group_version: version,
            source: error,
        }),
    }
}

/// Converts discovered [`APIResource`] to [`ResourceInfo`].\
/// Returns `None` for subresources and for resources that cannot be both listed and read.
pub fn to_resource_info(resource: &APIResource, prefix: &str, group_version: &str) -> Option<ResourceInfo> {
    if resource.name.contains('/') {
        return None;
    }

    let has_verb = |verb: &str| resource.verbs.iter().any(|v| v == verb);
    if !has_verb("get") || !has_verb("list") {
        return None;
    }

    Some(ResourceInfo::new(
        resource.name.as_str(),
        resource.kind.as_str(),
        !resource.namespaced,
        prefix,
        group_version,
    ))
}

/// Collects discovered resources and reconciles duplicated resource names.
#[derive(Default)]
pub struct RegistryBuilder {
    resources: HashMap<String, (ResourceInfo, bool)>,
}

impl RegistryBuilder {
    /// Adds resource discovered in the preferred or non-preferred group version.\
    /// A new entry replaces the existing one unless the existing one is preferred. A preferred entry still replaces
    /// a preferred one that comes from the `extensions` group.
    pub fn add(&mut self, resource: ResourceInfo, preferred: bool) {
        let overwrite = match self.resources.get(resource.resource_name()) {
            None => true,
            Some((existing, existing_preferred)) => {
                !existing_preferred || (preferred && existing.version().starts_with("extensions"))
            },
        };

        if overwrite {
            self.resources
                .insert(resource.resource_name().to_owned(), (resource, preferred));
        } else {
            debug!(
                "Skipping '{}' from '{}', already served by the preferred version",
                resource.resource_name(),
                resource.version()
            );
        }
    }

    /// Builds [`ResourceRegistry`] from the collected resources.
    pub fn build(self) -> ResourceRegistry {
        ResourceRegistry::new(
            self.resources
                .into_iter()
                .map(|(name, (resource, _))| (name, resource))
                .collect(),
        )
    }
}
