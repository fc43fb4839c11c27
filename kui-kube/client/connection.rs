use kube::config::AuthInfo;

use crate::context::{ClientOptions, ConnectionInfo};

use super::ClientError;

#[cfg(test)]
#[path = "./connection.tests.rs"]
mod connection_tests;

/// Builds [`kube::Config`] for the cluster described by `connection`.\
/// **Note** that TLS verification is skipped when either the cluster or the `options` allow it.
pub fn kube_config(connection: &ConnectionInfo, options: &ClientOptions) -> Result<kube::Config, ClientError> {
    let cluster_url = connection
        .server
        .parse::<http::Uri>()
        .map_err(|_| ClientError::InvalidUrl(connection.server.clone()))?;
    if cluster_url.scheme().is_none() || cluster_url.host().is_none() {
        return Err(ClientError::InvalidUrl(connection.server.clone()));
    }

    let mut config = kube::Config::new(cluster_url);
    if let Some(namespace) = connection.default_namespace.as_deref().filter(|n| !n.is_empty()) {
        config.default_namespace = namespace.to_owned();
    }

    config.accept_invalid_certs = connection.insecure || options.allow_insecure;
    if let Some(certificate_authority) = &connection.certificate_authority {
        config.root_cert = Some(to_der_certificates(certificate_authority)?);
    }

    config.auth_info = impersonate(connection.auth.to_auth_info(), options);

    Ok(config)
}

fn impersonate(mut auth_info: AuthInfo, options: &ClientOptions) -> AuthInfo {
    if let Some(user) = options.impersonate_user.as_deref().filter(|u| !u.is_empty()) {
        auth_info.impersonate = Some(user.to_owned());
    }

    if !options.impersonate_groups.is_empty() {
        auth_info.impersonate_groups = Some(options.impersonate_groups.clone());
    }

    auth_info
}

/// Converts PEM encoded certificates to the list of DER encoded ones.
fn to_der_certificates(pem_data: &[u8]) -> Result<Vec<Vec<u8>>, ClientError> {
    let certificates = pem::parse_many(pem_data).map_err(|error| ClientError::Certificate(error.to_string()))?;
    if certificates.is_empty() {
        return Err(ClientError::Certificate("no PEM certificates found".to_owned()));
    }

    Ok(certificates.iter().map(|c| c.contents().to_vec()).collect())
}
