use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kube::config::AuthInfo;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::warn;

use crate::kubeconfig::UserInfo;

#[cfg(test)]
#[path = "./auth.tests.rs"]
mod auth_tests;

/// Authentication material used to access a cluster.
#[derive(Debug)]
pub enum Auth {
    /// Bearer token.
    Token(SecretString),

    /// HTTP basic authentication.
    Basic { username: String, password: SecretString },

    /// TLS client certificate with its private key, both PEM encoded.
    ClientCertificate { certificate: Vec<u8>, key: SecretString },

    /// No credentials.
    None,
}

impl Auth {
    /// Resolves authentication from the kubeconfig user entry.\
    /// **Note** that the priority is: token, then username and password, then client certificate and key.
    /// Certificate material that cannot be read or decoded is treated as absent.
    pub async fn from_user(user: &UserInfo) -> Self {
        if let Some(token) = non_empty(user.token.as_deref()) {
            return Auth::Token(SecretString::from(token));
        }

        let username = non_empty(user.username.as_deref());
        let password = non_empty(user.password.as_deref());
        if let (Some(username), Some(password)) = (username, password) {
            return Auth::Basic {
                username: username.to_owned(),
                password: SecretString::from(password),
            };
        }

        let certificate = read_data_or_file(
            user.client_certificate_data.as_deref(),
            user.client_certificate.as_deref(),
        )
        .await;
        let key = read_data_or_file(user.client_key_data.as_deref(), user.client_key.as_deref()).await;
        if let (Some(certificate), Some(key)) = (certificate, key) {
            return Auth::ClientCertificate {
                certificate,
                key: SecretString::from(String::from_utf8_lossy(&key).into_owned()),
            };
        }

        Auth::None
    }

    /// Returns auth kind name, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Token(_) => "token",
            Auth::Basic { .. } => "basic",
            Auth::ClientCertificate { .. } => "client certificate",
            Auth::None => "none",
        }
    }

    /// Converts [`Auth`] to the kube [`AuthInfo`].
    pub fn to_auth_info(&self) -> AuthInfo {
        match self {
            Auth::Token(token) => AuthInfo {
                token: Some(token.clone()),
                ..Default::default()
            },
            Auth::Basic { username, password } => AuthInfo {
                username: Some(username.clone()),
                password: Some(password.clone()),
                ..Default::default()
            },
            Auth::ClientCertificate { certificate, key } => AuthInfo {
                client_certificate_data: Some(STANDARD.encode(certificate)),
                client_key_data: Some(SecretString::from(STANDARD.encode(key.expose_secret().as_bytes()))),
                ..Default::default()
            },
            Auth::None => AuthInfo::default(),
        }
    }
}

/// Returns bytes of the base64 encoded `data` or, when there is no data, the content of the `file`.
pub async fn read_data_or_file(data: Option<&str>, file: Option<&str>) -> Option<Vec<u8>> {
    if let Some(data) = non_empty(data) {
        return match STANDARD.decode(data.trim()) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!("Cannot decode base64 data: {}", error);
                None
            },
        };
    }

    let file = non_empty(file)?;
    match tokio::fs::read(Path::new(file)).await {
        Ok(content) => Some(content),
        Err(error) => {
            warn!("Cannot read file '{}': {}", file, error);
            None
        },
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
