use kui_kube::ResourceList;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::FetchError;

#[cfg(test)]
#[path = "./query.tests.rs"]
mod query_tests;

/// Query for a list of resources or, if `object_id` is set, for a single object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuery {
    pub context: String,
    pub resource: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl ResourceQuery {
    /// Creates new [`ResourceQuery`] for a list of resources.
    pub fn list(context: &str, resource: &str, namespace: Option<&str>) -> Self {
        Self {
            context: context.to_owned(),
            resource: resource.to_owned(),
            namespace: namespace.filter(|n| !n.is_empty()).map(String::from),
            object_id: None,
            params: BTreeMap::new(),
        }
    }

    /// Creates new [`ResourceQuery`] for a single object.
    pub fn object(context: &str, resource: &str, namespace: Option<&str>, name: &str) -> Self {
        Self {
            object_id: Some(name.to_owned()),
            ..Self::list(context, resource, namespace)
        }
    }

    /// Adds query parameter, e.g. `k8s.fieldSelector`.
    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }

    /// Returns `true` if the query is for a single object.
    pub fn is_object(&self) -> bool {
        self.object_id.as_deref().is_some_and(|o| !o.is_empty())
    }

    /// Returns string identity of the query.
    pub fn key(&self) -> String {
        resource_query_key(
            &self.context,
            &self.resource,
            self.namespace.as_deref(),
            self.object_id.as_deref(),
        )
    }
}

/// Builds query key `context/resource[/namespace][/object]`, empty parts are skipped.
pub fn resource_query_key(context: &str, resource: &str, namespace: Option<&str>, object_id: Option<&str>) -> String {
    [Some(context), Some(resource), namespace, object_id]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Place in the query store where results are kept.\
/// **Note** that secondary queries share `path` with their primary query, but have their own `query_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResultsPath {
    pub path: String,
    pub query_name: String,
}

impl ResultsPath {
    /// Creates new [`ResultsPath`] instance.
    pub fn new(path: impl Into<String>, query_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query_name: query_name.into(),
        }
    }

    /// Creates new [`ResultsPath`] for the primary query stored under `path`.
    pub fn primary(path: impl Into<String>) -> Self {
        Self::new(path, String::new())
    }

    /// Returns `true` if location holds the primary query results.
    pub fn is_primary(&self) -> bool {
        self.query_name.is_empty()
    }
}

/// Query together with the place its results should be stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWithLocation {
    pub location: ResultsPath,
    pub query: ResourceQuery,
}

impl QueryWithLocation {
    /// Creates new [`QueryWithLocation`] instance.
    pub fn new(location: ResultsPath, query: ResourceQuery) -> Self {
        Self { location, query }
    }
}

/// Data returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryData {
    List(ResourceList),
    Object(Value),
}

impl QueryData {
    /// Returns listed items, empty for a single object.
    pub fn items(&self) -> &[Value] {
        match self {
            QueryData::List(list) => &list.items,
            QueryData::Object(_) => &[],
        }
    }

    /// Returns fetched object if this is a single object result.
    pub fn object(&self) -> Option<&Value> {
        match self {
            QueryData::List(_) => None,
            QueryData::Object(object) => Some(object),
        }
    }
}

/// Outcome of a query: loading, success with results or failure with an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQueryResults {
    pub query: ResourceQuery,
    pub loading: bool,
    pub results: Option<QueryData>,
    pub err: Option<FetchError>,
}

impl ResourceQueryResults {
    /// Creates results for the query that is in flight.
    pub fn loading(query: ResourceQuery) -> Self {
        Self {
            query,
            loading: true,
            results: None,
            err: None,
        }
    }

    /// Creates results for the finished query.
    pub fn finished(query: ResourceQuery, result: Result<QueryData, FetchError>) -> Self {
        let (results, err) = match result {
            Ok(results) => (Some(results), None),
            Err(err) => (None, Some(err)),
        };

        Self {
            query,
            loading: false,
            results,
            err,
        }
    }

    /// Returns `true` if query finished successfully.
    pub fn is_success(&self) -> bool {
        !self.loading && self.err.is_none() && self.results.is_some()
    }
}
