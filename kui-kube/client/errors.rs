use http::StatusCode;
use serde_json::Value;

#[cfg(test)]
#[path = "./errors.tests.rs"]
mod errors_tests;

/// Possible errors from the Kubernetes API calls.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Credentials were rejected or do not allow the operation (401, 403).
    #[error("access denied ({code}): {message}")]
    Auth { code: u16, message: String },

    /// Request was rejected as malformed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Requested resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unsuccessful HTTP status.
    #[error("unexpected HTTP status {code}: {message}")]
    Http { code: u16, message: String },

    /// Cluster server address is not a valid URL.
    #[error("invalid cluster URL '{0}'")]
    InvalidUrl(String),

    /// Certificate authority data cannot be used.
    #[error("invalid certificate data: {0}")]
    Certificate(String),

    /// Cannot build the HTTP request.
    #[error("cannot build request: {0}")]
    Request(#[from] http::Error),

    /// Kubernetes client or transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] kube::Error),

    /// Response body cannot be parsed.
    #[error("cannot parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body ended before the whole list was read.
    #[error("list response ended unexpectedly")]
    Incomplete,
}

impl ClientError {
    /// Creates [`ClientError`] for the unsuccessful HTTP `status` with the response `body`.\
    /// **Note** that the message of the Kubernetes `Status` object is used when the body contains one.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = status_message(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth {
                code: status.as_u16(),
                message,
            },
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Http {
                code: status.as_u16(),
                message,
            },
        }
    }
}

/// Maximum number of characters of the raw response body kept in the error message.
const MAX_BODY_MESSAGE_LEN: usize = 512;

fn status_message(body: &[u8]) -> String {
    if let Ok(status) = serde_json::from_slice::<Value>(body)
        && let Some(message) = status.get("message").and_then(Value::as_str)
    {
        return message.to_owned();
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(MAX_BODY_MESSAGE_LEN) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_owned(),
    }
}
