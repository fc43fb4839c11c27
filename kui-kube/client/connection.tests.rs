use secrecy::{ExposeSecret, SecretString};

use super::*;
use crate::Auth;

const CA_PEM: &[u8] = b"-----BEGIN CERTIFICATE-----\nAQID\n-----END CERTIFICATE-----\n";

fn connection(server: &str, auth: Auth) -> ConnectionInfo {
    ConnectionInfo {
        server: server.to_owned(),
        auth,
        certificate_authority: None,
        insecure: false,
        default_namespace: None,
    }
}

#[test]
fn kube_config_with_token_test() {
    let mut connection = connection("https://10.0.0.1:6443", Auth::Token(SecretString::from("abc")));
    connection.default_namespace = Some("team-a".to_owned());
    connection.certificate_authority = Some(CA_PEM.to_vec());

    let config = kube_config(&connection, &ClientOptions::default()).unwrap();

    assert_eq!(Some("10.0.0.1"), config.cluster_url.host());
    assert_eq!(Some(6443), config.cluster_url.port_u16());
    assert_eq!("team-a", config.default_namespace);
    assert_eq!(Some(vec![vec![1, 2, 3]]), config.root_cert);
    assert!(!config.accept_invalid_certs);
    assert_eq!(
        Some("abc"),
        config.auth_info.token.as_ref().map(|t| t.expose_secret())
    );
    assert_eq!(None, config.auth_info.impersonate);
}

#[test]
fn kube_config_with_basic_auth_and_impersonation_test() {
    let connection = connection(
        "http://localhost:8080",
        Auth::Basic {
            username: "admin".to_owned(),
            password: SecretString::from("secret"),
        },
    );
    let options = ClientOptions {
        allow_insecure: true,
        impersonate_user: Some("jane".to_owned()),
        impersonate_groups: vec!["devs".to_owned()],
        ..Default::default()
    };

    let config = kube_config(&connection, &options).unwrap();

    assert!(config.accept_invalid_certs);
    assert_eq!("default", config.default_namespace);
    assert_eq!(Some("admin"), config.auth_info.username.as_deref());
    assert_eq!(
        Some("secret"),
        config.auth_info.password.as_ref().map(|p| p.expose_secret())
    );
    assert_eq!(Some("jane"), config.auth_info.impersonate.as_deref());
    assert_eq!(Some(vec!["devs".to_owned()]), config.auth_info.impersonate_groups);
}

#[test]
fn kube_config_insecure_cluster_test() {
    let mut connection = connection("https://cluster.local", Auth::None);
    connection.insecure = true;

    let config = kube_config(&connection, &ClientOptions::default()).unwrap();

    assert!(config.accept_invalid_certs);
    assert!(config.auth_info.token.is_none());
}

#[test]
fn kube_config_invalid_input_test() {
    let invalid_url = connection("not a url", Auth::None);
    assert!(matches!(
        kube_config(&invalid_url, &ClientOptions::default()),
        Err(ClientError::InvalidUrl(_))
    ));

    let mut invalid_ca = connection("https://cluster.local", Auth::None);
    invalid_ca.certificate_authority = Some(b"not a certificate".to_vec());
    assert!(matches!(
        kube_config(&invalid_ca, &ClientOptions::default()),
        Err(ClientError::Certificate(_))
    ));
}
