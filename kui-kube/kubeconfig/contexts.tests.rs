use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempDir;

use super::*;

const FIRST: &str = r#"
current-context: dev
clusters:
- name: local
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
users:
- name: admin
  user:
    token: first-token
contexts:
- name: dev
  context:
    cluster: local
    user: admin
    namespace: web
- name: orphan
  context:
    cluster: missing
"#;

const SECOND: &str = r#"
current-context: prod
clusters:
- name: local
  cluster:
    server: https://10.0.0.1:6443
- name: remote
  cluster:
    server: https://10.0.0.2:6443
users:
- name: admin
  user:
    token: second-token
- user:
    token: unnamed
contexts:
- name: dev
  context:
    cluster: remote
- name: prod
  context:
    cluster: remote
    user: admin
"#;

fn contexts() -> Contexts {
    let mut contexts = Contexts::new(ClientOptions::default());
    contexts.add_yaml(Path::new("first"), FIRST);
    contexts.add_yaml(Path::new("second"), SECOND);
    contexts
}

#[tokio::test]
async fn first_definition_wins_test() {
    let contexts = contexts();

    assert_eq!(vec!["dev", "orphan", "prod"], contexts.names());
    assert_eq!(Some("dev"), contexts.current_context());
    assert_eq!(1, contexts.users.len());

    let dev = contexts.get_context("dev").await.unwrap();
    assert_eq!("https://127.0.0.1:6443", dev.server());
    assert!(dev.connection().insecure);
    assert!(matches!(&dev.connection().auth, Auth::Token(_)));
    assert_eq!(Some("web"), dev.default_namespace());

    let prod = contexts.get_context("prod").await.unwrap();
    assert_eq!("https://10.0.0.2:6443", prod.server());
    assert!(!prod.connection().insecure);
    assert_eq!(None, prod.default_namespace());
}

#[tokio::test]
async fn context_without_cluster_uses_default_server_test() {
    let orphan = contexts().get_context("orphan").await.unwrap();

    assert_eq!(DEFAULT_CLUSTER_SERVER, orphan.server());
    assert!(matches!(orphan.connection().auth, Auth::None));
    assert!(orphan.connection().certificate_authority.is_none());
}

#[tokio::test]
async fn unknown_context_test() {
    let result = contexts().get_context("staging").await;

    assert!(matches!(result, Err(ContextError::UnknownContext(name)) if name == "staging"));
}

#[test]
fn invalid_yaml_is_recorded_test() {
    let mut contexts = Contexts::new(ClientOptions::default());
    contexts.add_yaml(Path::new("/tmp/empty"), "  \n");
    contexts.add_yaml(Path::new("/tmp/broken"), "contexts: [");
    contexts.add_yaml(Path::new("first"), FIRST);

    assert_eq!(2, contexts.load_errors().len());
    assert_eq!("unable to load YAML from /tmp/empty", contexts.load_errors()[0]);
    assert!(contexts.load_errors()[1].starts_with("unable to load YAML from /tmp/broken, "));
    assert_eq!(vec!["dev", "orphan"], contexts.names());
}

#[tokio::test]
async fn load_files_test() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config");
    let ca = dir.path().join("ca.crt");
    std::fs::write(&ca, "certificate").unwrap();
    std::fs::write(
        &config,
        format!(
            "clusters:\n- name: a\n  cluster:\n    server: https://a:6443\n    certificate-authority: {}\n- name: b\n  cluster:\n    server: https://b:6443\n    certificate-authority-data: {}\ncontexts:\n- name: a\n  context:\n    cluster: a\n- name: b\n  context:\n    cluster: b\n",
            ca.display(),
            STANDARD.encode("inline"),
        ),
    )
    .unwrap();
    let missing = dir.path().join("missing");

    let contexts = Contexts::load(&[missing.clone(), config], ClientOptions::default()).await;

    assert_eq!(vec!["a", "b"], contexts.names());
    assert_eq!(1, contexts.load_errors().len());
    assert!(contexts.load_errors()[0].starts_with(&format!("error loading {}, ", missing.display())));

    let a = contexts.get_context("a").await.unwrap();
    assert_eq!(Some(b"certificate".to_vec()), a.connection().certificate_authority);
    let b = contexts.get_context("b").await.unwrap();
    assert_eq!(Some(b"inline".to_vec()), b.connection().certificate_authority);
}

#[tokio::test]
async fn contexts_share_registries_test() {
    let contexts = contexts();

    let dev = contexts.get_context("dev").await.unwrap();
    let prod = contexts.get_context("prod").await.unwrap();

    assert!(Arc::ptr_eq(dev.registries(), prod.registries()));
    assert!(Arc::ptr_eq(&contexts.registries, dev.registries()));
}
