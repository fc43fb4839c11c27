use kui_kube::{ClientError, ContextError, DiscoveryError};

#[cfg(test)]
#[path = "./errors.tests.rs"]
mod errors_tests;

/// Error stored in the query results.\
/// **Note** that it can be cloned, as the same error is read by all views that show the query results.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Credentials were rejected or do not allow the operation.
    #[error("access denied ({code}): {message}")]
    Auth { code: u16, message: String },

    /// Request was rejected as malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unsuccessful HTTP status.
    #[error("unexpected HTTP status {code}: {message}")]
    Http { code: u16, message: String },

    /// Context is not defined in kubeconfig files.
    #[error("unknown context '{0}'")]
    UnknownContext(String),

    /// Resource is not served by the cluster.
    #[error("invalid resource: '{0}'")]
    UnknownResource(String),

    /// Resources served by the cluster cannot be discovered.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// Connection, transport or parsing failure.
    #[error("{0}")]
    Client(String),
}

impl FetchError {
    /// Returns `true` if the error means there is no access to the resource.
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Auth { .. })
    }
}

impl From<ClientError> for FetchError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Auth { code, message } => FetchError::Auth { code, message },
            ClientError::BadRequest(message) => FetchError::BadRequest(message),
            ClientError::NotFound(message) => FetchError::NotFound(message),
            ClientError::Http { code, message } => FetchError::Http { code, message },
            error => FetchError::Client(error.to_string()),
        }
    }
}

impl From<DiscoveryError> for FetchError {
    fn from(value: DiscoveryError) -> Self {
        FetchError::Discovery(value.to_string())
    }
}

impl From<ContextError> for FetchError {
    fn from(value: ContextError) -> Self {
        match value {
            ContextError::UnknownContext(name) => FetchError::UnknownContext(name),
            ContextError::UnknownResource(name) => FetchError::UnknownResource(name),
            ContextError::Client(error) => error.into(),
            ContextError::Discovery(error) => error.into(),
        }
    }
}
