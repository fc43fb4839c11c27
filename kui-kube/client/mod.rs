use bytes::Bytes;
use futures::Stream;
use http::header::{ACCEPT, USER_AGENT};
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroupList, APIResourceList};
use kube::client::Body;
use serde::de::DeserializeOwned;

use crate::context::{ClientOptions, ConnectionInfo};
use crate::registry::{DiscoveryError, DiscoverySource, GROUPS_API_PREFIX, ResourcePath, ResourceRegistry, discover};

pub use self::connection::kube_config;
pub use self::errors::ClientError;
pub use self::resource::{K8S_PARAM_PREFIX, ListOptions, Resource, ResourceList};
pub use self::stream::{ListEvent, ListEvents, parse_list};

mod connection;
mod errors;
#[cfg(test)]
pub(crate) mod mock;
mod resource;
mod stream;

const APPLICATION_JSON: &str = "application/json";
const CLIENT_USER_AGENT: &str = concat!("kui/", env!("CARGO_PKG_VERSION"));

/// Wrapper for the kubernetes [`kube::Client`] that performs raw, path based `GET` requests.
#[derive(Clone)]
pub struct Client {
    client: kube::Client,
}

impl Client {
    /// Creates new [`Client`] instance.
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Creates new [`Client`] instance authenticated with the `connection` settings.
    pub fn from_connection(connection: &ConnectionInfo, options: &ClientOptions) -> Result<Self, ClientError> {
        let config = kube_config(connection, options)?;
        Ok(Self::new(kube::Client::try_from(config)?))
    }

    /// Returns [`Resource`] client for the specified collection path.
    pub fn resource(&self, path: ResourcePath) -> Resource {
        Resource::new(self.clone(), path)
    }

    /// Discovers resources served by the cluster.
    pub async fn discover(&self, concurrency: usize) -> Result<ResourceRegistry, DiscoveryError> {
        discover(self, concurrency).await
    }

    /// Gets the `path` and returns the whole response body.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, ClientError> {
        let response = self.get(path).await?;
        Ok(response.into_body().collect().await?.to_bytes())
    }

    /// Gets the `path` and deserializes the response body from JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.get_bytes(path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Gets the `path` and returns the response body as a stream of chunks.
    pub async fn get_stream(
        &self,
        path: &str,
    ) -> Result<impl Stream<Item = Result<Bytes, kube::Error>> + Send + 'static, ClientError> {
        let response = self.get(path).await?;
        Ok(response.into_body().into_data_stream())
    }

    async fn get(&self, path: &str) -> Result<Response<Body>, ClientError> {
        let request = Request::get(path)
            .header(ACCEPT, APPLICATION_JSON)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .body(Body::empty())?;

        let response = self.client.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.into_body().collect().await {
            Ok(body) => body.to_bytes(),
            Err(_) => Bytes::new(),
        };
        Err(ClientError::from_status(status, &body))
    }
}

impl DiscoverySource for Client {
    async fn api_groups(&self) -> Result<APIGroupList, ClientError> {
        self.get_json(GROUPS_API_PREFIX).await
    }

    async fn api_resources(&self, prefix: &str, group_version: &str) -> Result<APIResourceList, ClientError> {
        self.get_json(&format!("{prefix}/{group_version}")).await
    }
}
