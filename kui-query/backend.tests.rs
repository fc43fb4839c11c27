use tempfile::TempDir;

use super::*;

const KUBE_CONFIG: &str = r#"
current-context: dev
clusters:
- name: local
  cluster:
    server: https://127.0.0.1:6443
contexts:
- name: dev
  context:
    cluster: local
    namespace: web
- name: prod
  context:
    cluster: local
"#;

fn backend(dir: &TempDir) -> Backend {
    let config = dir.path().join("config");
    std::fs::write(&config, KUBE_CONFIG).unwrap();
    let missing = dir.path().join("missing");

    Backend::new(KubeConfigLoader::new(vec![config, missing], Default::default()))
}

#[tokio::test]
async fn list_contexts_test() {
    let dir = TempDir::new().unwrap();

    let contexts = backend(&dir).list_contexts().await.unwrap();

    assert_eq!("dev", contexts.default);
    assert_eq!(vec!["dev", "prod"], contexts.items);
    assert_eq!(1, contexts.errors.len());
    assert!(contexts.errors[0].starts_with("error loading "));
}

#[tokio::test]
async fn unknown_context_test() {
    let dir = TempDir::new().unwrap();
    let backend = backend(&dir);

    let result = backend.get_context("staging").await;
    assert_eq!(Err(FetchError::UnknownContext("staging".to_owned())), result);

    let result = backend
        .list_resources("staging", "pods", Some("default"), &BTreeMap::new())
        .await;
    assert_eq!(Err(FetchError::UnknownContext("staging".to_owned())), result);
}
