use std::io::Write;

use super::*;

fn user() -> UserInfo {
    UserInfo::default()
}

#[tokio::test]
async fn token_has_priority_test() {
    let user = UserInfo {
        token: Some("abc".to_owned()),
        username: Some("admin".to_owned()),
        password: Some("secret".to_owned()),
        client_certificate_data: Some(STANDARD.encode("cert")),
        client_key_data: Some(STANDARD.encode("key")),
        ..self::user()
    };

    assert!(matches!(Auth::from_user(&user).await, Auth::Token(token) if token.expose_secret() == "abc"));
}

#[tokio::test]
async fn basic_needs_both_username_and_password_test() {
    let user = UserInfo {
        username: Some("admin".to_owned()),
        password: Some("secret".to_owned()),
        ..self::user()
    };
    assert!(matches!(
        Auth::from_user(&user).await,
        Auth::Basic { username, password } if username == "admin" && password.expose_secret() == "secret"
    ));

    let user = UserInfo {
        username: Some("admin".to_owned()),
        ..self::user()
    };
    assert!(matches!(Auth::from_user(&user).await, Auth::None));
}

#[tokio::test]
async fn client_certificate_from_data_test() {
    let user = UserInfo {
        client_certificate_data: Some(STANDARD.encode("cert-pem")),
        client_key_data: Some(STANDARD.encode("key-pem")),
        ..self::user()
    };

    let auth = Auth::from_user(&user).await;
    assert!(matches!(
        &auth,
        Auth::ClientCertificate { certificate, key } if certificate == b"cert-pem" && key.expose_secret() == "key-pem"
    ));

    let info = auth.to_auth_info();
    assert_eq!(Some(STANDARD.encode("cert-pem")), info.client_certificate_data);
    assert_eq!(
        Some(STANDARD.encode("key-pem")),
        info.client_key_data.map(|k| k.expose_secret().to_owned())
    );
}

#[tokio::test]
async fn client_certificate_from_files_test() {
    let mut certificate = tempfile::NamedTempFile::new().unwrap();
    certificate.write_all(b"cert-file").unwrap();
    let mut key = tempfile::NamedTempFile::new().unwrap();
    key.write_all(b"key-file").unwrap();

    let user = UserInfo {
        client_certificate: Some(certificate.path().to_string_lossy().into_owned()),
        client_key: Some(key.path().to_string_lossy().into_owned()),
        ..self::user()
    };

    assert!(matches!(
        Auth::from_user(&user).await,
        Auth::ClientCertificate { certificate, .. } if certificate == b"cert-file"
    ));
}

#[tokio::test]
async fn client_certificate_needs_both_parts_test() {
    let user = UserInfo {
        client_certificate_data: Some(STANDARD.encode("cert-pem")),
        client_key: Some("/path/that/does/not/exist.key".to_owned()),
        ..self::user()
    };
    assert!(matches!(Auth::from_user(&user).await, Auth::None));

    let user = UserInfo {
        client_certificate_data: Some("%%% not base64 %%%".to_owned()),
        client_key_data: Some(STANDARD.encode("key-pem")),
        ..self::user()
    };
    assert!(matches!(Auth::from_user(&user).await, Auth::None));
}

#[tokio::test]
async fn auth_kind_test() {
    assert_eq!("none", Auth::from_user(&user()).await.kind());
    assert_eq!("token", Auth::Token(SecretString::from("t")).kind());
}
