use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

#[cfg(test)]
#[path = "./info.tests.rs"]
mod info_tests;

pub const CORE_API_PREFIX: &str = "/api";
pub const GROUPS_API_PREFIX: &str = "/apis";
pub const CORE_GROUP_NAME: &str = "core";

/// Describes one kind of Kubernetes resource served by a cluster.\
/// **Note** that display and plural names are derived once, when the instance is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    resource_name: String,
    kind: String,
    is_cluster_resource: bool,
    prefix: String,
    version: String,
    display_name: String,
    plural_name: String,
}

impl ResourceInfo {
    /// Creates new [`ResourceInfo`] instance.
    pub fn new(
        resource_name: impl Into<String>,
        kind: impl Into<String>,
        is_cluster_resource: bool,
        prefix: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let resource_name = resource_name.into();
        let kind = kind.into();
        let display_name = split_words(&kind);
        let plural_name = plural_name(&kind, &resource_name);

        Self {
            resource_name,
            kind,
            is_cluster_resource,
            prefix: prefix.into(),
            version: version.into(),
            display_name,
            plural_name,
        }
    }

    /// Returns resource name used in the URL path, e.g. `deployments`.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns `true` if the resource is not namespaced.
    pub fn is_cluster_resource(&self) -> bool {
        self.is_cluster_resource
    }

    /// Returns API prefix, `/api` for the core group and `/apis` for the others.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns group version string, e.g. `apps/v1` or `v1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns kind split into words, e.g. `Foo Bar Policy`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns resource name in the kind casing split into words, e.g. `Foo Bar Policies`.
    pub fn plural_name(&self) -> &str {
        &self.plural_name
    }

    /// Returns API group name, empty for the core group.
    pub fn group(&self) -> &str {
        match self.version.split_once('/') {
            Some((group, _)) => group,
            None => "",
        }
    }

    /// Returns API group name suitable for grouping resources in views, `core` for the core group.
    pub fn display_group(&self) -> &str {
        let group = self.group();
        if group.is_empty() { CORE_GROUP_NAME } else { group }
    }

    /// Returns stable key identifying resource kind regardless of its version.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.group(), &self.kind)
    }

    /// Returns path to the resource collection in the specified `namespace`.\
    /// **Note** that namespace is dropped for cluster resources.
    pub fn resource_path(&self, namespace: Option<&str>) -> ResourcePath {
        let namespace = if self.is_cluster_resource {
            None
        } else {
            namespace.filter(|n| !n.is_empty()).map(String::from)
        };

        ResourcePath {
            prefix: self.prefix.clone(),
            version: self.version.clone(),
            resource_name: self.resource_name.clone(),
            namespace,
        }
    }
}

/// Location of the resource collection on the Kubernetes API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub prefix: String,
    pub version: String,
    pub resource_name: String,
    pub namespace: Option<String>,
}

impl ResourcePath {
    /// Returns path to the resource collection, e.g. `/apis/apps/v1/namespaces/default/deployments`.
    pub fn collection_path(&self) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!(
                "{}/{}/namespaces/{}/{}",
                self.prefix, self.version, namespace, self.resource_name
            ),
            _ => format!("{}/{}/{}", self.prefix, self.version, self.resource_name),
        }
    }

    /// Returns path to the named object in the resource collection.
    pub fn object_path(&self, name: &str) -> String {
        if name.is_empty() {
            self.collection_path()
        } else {
            format!("{}/{}", self.collection_path(), name)
        }
    }
}

/// Error returned when [`ResourceKey`] cannot be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid resource key '{0}', expected 'group/Kind'")]
pub struct InvalidResourceKey(pub String);

/// Version independent key of the resource kind, rendered as `{group}/{kind}` with `core` for the core group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    group: String,
    kind: String,
}

impl ResourceKey {
    /// Creates new [`ResourceKey`] instance.
    pub fn new(group: &str, kind: &str) -> Self {
        let group = if group == CORE_GROUP_NAME { "" } else { group };
        Self {
            group: group.to_owned(),
            kind: kind.to_owned(),
        }
    }

    /// Returns API group name, empty for the core group.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let group = if self.group.is_empty() {
            CORE_GROUP_NAME
        } else {
            &self.group
        };
        write!(f, "{}/{}", group, self.kind)
    }
}

impl FromStr for ResourceKey {
    type Err = InvalidResourceKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((group, kind)) if !group.is_empty() && !kind.is_empty() && !kind.contains('/') => {
                Ok(Self::new(group, kind))
            },
            _ => Err(InvalidResourceKey(s.to_owned())),
        }
    }
}

impl Serialize for ResourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Inserts a space between every lower case letter followed by an upper case one.
pub fn split_words(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 4);
    let mut previous: Option<char> = None;
    for ch in value.chars() {
        if previous.is_some_and(|p| p.is_ascii_lowercase()) && ch.is_ascii_uppercase() {
            result.push(' ');
        }

        result.push(ch);
        previous = Some(ch);
    }

    result
}

/// Builds human readable plural name from the `kind` and its `resource_name`.\
/// Takes `kind` letters as long as they match `resource_name` case insensitively, the rest comes from the
/// `resource_name`, e.g. `NetworkPolicy` and `networkpolicies` give `Network Policies`.
pub fn plural_name(kind: &str, resource_name: &str) -> String {
    let kind = kind.chars().collect::<Vec<_>>();
    let mut result = String::with_capacity(resource_name.len());
    let mut rest = resource_name.chars().enumerate().peekable();

    while let Some((i, ch)) = rest.peek() {
        match kind.get(*i) {
            Some(k) if k.to_lowercase().eq(std::iter::once(*ch)) => {
                result.push(*k);
                rest.next();
            },
            _ => break,
        }
    }

    result.extend(rest.map(|(_, ch)| ch));
    split_words(&result)
}
