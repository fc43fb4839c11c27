use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::projection::{Projection, projection_error};
use crate::registry::ResourcePath;

use super::{Client, ClientError, ListEvent, ListEvents, parse_list};

#[cfg(test)]
#[path = "./resource.tests.rs"]
mod resource_tests;

/// Prefix of the query parameters that are forwarded to the Kubernetes API.
pub const K8S_PARAM_PREFIX: &str = "k8s.";

/// Options for listing Kubernetes resources.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub field_selector: Option<String>,
    pub label_selector: Option<String>,
    pub limit: Option<u32>,
    pub continue_token: Option<String>,
    pub timeout_seconds: Option<u32>,

    /// Other query parameters passed to the API server as they are.
    pub extra: Vec<(String, String)>,

    /// Function applied to every listed item.
    pub projection: Option<Projection>,
}

impl ListOptions {
    /// Creates [`ListOptions`] from query parameters.\
    /// **Note** that only parameters prefixed with `k8s.` are taken into account, the prefix is stripped.
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        let mut options = Self::default();
        for (key, value) in params {
            let Some(key) = key.strip_prefix(K8S_PARAM_PREFIX) else {
                continue;
            };

            match key {
                "fieldSelector" => options.field_selector = Some(value.clone()),
                "labelSelector" => options.label_selector = Some(value.clone()),
                "continue" => options.continue_token = Some(value.clone()),
                "limit" if value.parse::<u32>().is_ok() => options.limit = value.parse().ok(),
                "timeoutSeconds" if value.parse::<u32>().is_ok() => options.timeout_seconds = value.parse().ok(),
                _ => options.extra.push((key.to_owned(), value.clone())),
            }
        }

        options
    }

    /// Sets projection applied to every listed item.
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Returns URL encoded query string, empty if there is nothing to pass.
    pub fn query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(field_selector) = &self.field_selector {
            query.append_pair("fieldSelector", field_selector);
        }
        if let Some(label_selector) = &self.label_selector {
            query.append_pair("labelSelector", label_selector);
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(continue_token) = &self.continue_token {
            query.append_pair("continue", continue_token);
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            query.append_pair("timeoutSeconds", &timeout_seconds.to_string());
        }
        for (key, value) in &self.extra {
            query.append_pair(key, value);
        }

        query.finish()
    }
}

/// List of Kubernetes objects together with the list's own top level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceList {
    #[serde(flatten)]
    pub header: Map<String, Value>,
    pub items: Vec<Value>,
}

impl ResourceList {
    /// Returns list kind, e.g. `PodList`.
    pub fn kind(&self) -> Option<&str> {
        self.header.get("kind").and_then(Value::as_str)
    }

    /// Returns token for the next page of the list if there is one.
    pub fn continue_token(&self) -> Option<&str> {
        self.header
            .get("metadata")
            .and_then(|m| m.get("continue"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// Client for one Kubernetes resource collection.
#[derive(Clone)]
pub struct Resource {
    client: Client,
    path: ResourcePath,
}

impl Resource {
    /// Creates new [`Resource`] instance.
    pub fn new(client: Client, path: ResourcePath) -> Self {
        Self { client, path }
    }

    /// Returns path of the resource collection.
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// Returns URL used to list resources with the specified `options`.
    pub fn list_url(&self, options: &ListOptions) -> String {
        let query = options.query_string();
        if query.is_empty() {
            self.path.collection_path()
        } else {
            format!("{}?{}", self.path.collection_path(), query)
        }
    }

    /// Lists resources returning them as a stream of parse events.\
    /// **Note** that projection from the `options` is not applied to the events.
    pub async fn list_events(&self, options: &ListOptions) -> Result<ListEvents, ClientError> {
        let body = self.client.get_stream(&self.list_url(options)).await?;
        Ok(parse_list(body))
    }

    /// Lists resources, applying projection from the `options` to every item.\
    /// **Note** that an item for which projection fails is replaced with a projection error object.
    pub async fn list(&self, options: &ListOptions) -> Result<ResourceList, ClientError> {
        let mut events = self.list_events(options).await?;
        let mut list = ResourceList::default();

        while let Some(event) = events.next().await {
            match event? {
                ListEvent::Header(header) => list.header.extend(header),
                ListEvent::Item(item) => list.items.push(project(options.projection, item)),
                ListEvent::Done(footer) => {
                    list.header.extend(footer);
                    return Ok(list);
                },
            }
        }

        Err(ClientError::Incomplete)
    }

    /// Gets the named object from the resource collection.
    pub async fn get(&self, name: &str) -> Result<Value, ClientError> {
        self.client.get_json(&self.path.object_path(name)).await
    }
}

fn project(projection: Option<Projection>, item: Value) -> Value {
    let Some(projection) = projection else {
        return item;
    };

    match projection(&item) {
        Ok(projected) => projected,
        Err(error) => {
            warn!("Cannot project list item: {}", error);
            projection_error(&error)
        },
    }
}
