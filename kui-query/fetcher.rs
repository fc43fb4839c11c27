use kui_kube::ResourceList;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{ContextDetail, ContextList, FetchError};

/// Source of the Kubernetes data for the [`Dispatcher`](crate::Dispatcher).
pub trait ResourceFetcher: Send + Sync + 'static {
    /// Returns contexts defined in the kubeconfig files.
    fn list_contexts(&self) -> impl Future<Output = Result<ContextList, FetchError>> + Send;

    /// Returns details of the named context, discovering its cluster resources if needed.
    fn get_context(&self, context: &str) -> impl Future<Output = Result<ContextDetail, FetchError>> + Send;

    /// Lists `resource` objects in the `namespace` or in all namespaces if it is `None`.\
    /// **Note** that only `k8s.` prefixed `params` are forwarded to the Kubernetes API.
    fn list_resources(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<ResourceList, FetchError>> + Send;

    /// Returns the named `resource` object.
    fn get_resource(
        &self,
        context: &str,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send;
}
