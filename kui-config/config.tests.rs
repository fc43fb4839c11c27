use super::*;

#[test]
fn deserialize_partial_config_test() {
    let config = serde_yaml::from_str::<Config>("allow_insecure: true\n").unwrap();

    assert!(config.allow_insecure);
    assert!(config.kube_config_files.is_empty());
    assert_eq!(None, config.impersonate);
    assert_eq!(DEFAULT_DISCOVERY_CONCURRENCY, config.discovery_concurrency);
}

#[test]
fn deserialize_impersonation_test() {
    let yaml = "impersonate:\n  user: jane\n  groups: [devs, ops]\ndiscovery_concurrency: 0\n";
    let config = serde_yaml::from_str::<Config>(yaml).unwrap();
    let impersonate = config.impersonate.clone().unwrap();

    assert_eq!(Some("jane"), impersonate.user.as_deref());
    assert_eq!(vec!["devs".to_owned(), "ops".to_owned()], impersonate.groups);
    assert!(!impersonate.is_empty());
    assert_eq!(1, config.discovery_concurrency());
}

#[test]
fn kube_config_files_precedence_test() {
    let config = Config {
        kube_config_files: vec!["/etc/kube/a.yaml".to_owned(), String::new()],
        ..Default::default()
    };

    assert_eq!(vec![PathBuf::from("/etc/kube/a.yaml")], config.kube_config_files(None));
    assert_eq!(vec![PathBuf::from("/etc/kube/a.yaml")], config.kube_config_files(Some("")));

    let joined = std::env::join_paths(["/tmp/one", "/tmp/two"]).unwrap();
    assert_eq!(
        vec![PathBuf::from("/tmp/one"), PathBuf::from("/tmp/two")],
        config.kube_config_files(joined.to_str())
    );
}

#[test]
fn split_kube_config_paths_skips_empty_entries_test() {
    let joined = std::env::join_paths(["/tmp/one", "", "/tmp/two"]).unwrap();

    assert_eq!(
        vec![PathBuf::from("/tmp/one"), PathBuf::from("/tmp/two")],
        split_kube_config_paths(joined.to_str().unwrap())
    );
}

#[tokio::test]
async fn load_or_create_default_creates_missing_file_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = load_or_create_default::<Config>(&path).await.unwrap();

    assert_eq!(Config::default(), config);
    assert!(path.exists());
}

#[tokio::test]
async fn save_and_load_config_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let config = Config {
        kube_config_files: vec!["/tmp/kubeconfig".to_owned()],
        allow_insecure: true,
        impersonate: Some(Impersonation {
            user: Some("admin".to_owned()),
            groups: Vec::new(),
        }),
        discovery_concurrency: 3,
    };

    config.save(&path).await.unwrap();

    assert_eq!(config, Config::load(&path).await.unwrap());
}

#[tokio::test]
async fn load_or_create_default_ignores_broken_file_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "allow_insecure: [not a bool").unwrap();

    let config = load_or_create_default::<Config>(&path).await.unwrap();

    assert_eq!(Config::default(), config);
}
