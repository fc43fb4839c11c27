use std::fs::File;
use std::io::Write;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use super::*;

fn write_config(dir: &TempDir, name: &str, context: &str) -> PathBuf {
    let path = dir.path().join(name);
    let yaml = format!(
        "contexts:\n- name: {context}\n  context:\n    cluster: local\nclusters:\n- name: local\n  cluster:\n    server: https://127.0.0.1:6443\n"
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

fn set_modified(path: &PathBuf, time: SystemTime) {
    File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

#[tokio::test]
async fn empty_file_names_are_ignored_test() {
    let loader = KubeConfigLoader::new(vec![PathBuf::new(), PathBuf::from("config")], ClientOptions::default());

    assert_eq!(&[PathBuf::from("config")][..], loader.files);
}

#[tokio::test]
async fn contexts_are_cached_until_file_changes_test() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "config", "dev");
    set_modified(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
    let mut loader = KubeConfigLoader::new(vec![path.clone()], ClientOptions::default());

    let first = loader.contexts().await;
    let second = loader.contexts().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(vec!["dev"], first.names());

    write_config(&dir, "config", "prod");
    set_modified(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(2_000));

    let third = loader.contexts().await;
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(vec!["prod"], third.names());
}

#[tokio::test]
async fn appearing_file_reloads_contexts_test() {
    let dir = TempDir::new().unwrap();
    let first_file = write_config(&dir, "first", "dev");
    let second_file = dir.path().join("second");
    let mut loader = KubeConfigLoader::new(vec![first_file, second_file.clone()], ClientOptions::default());

    let contexts = loader.contexts().await;
    assert_eq!(vec!["dev"], contexts.names());
    assert_eq!(1, contexts.load_errors().len());

    let mut file = File::create(&second_file).unwrap();
    file.write_all(b"contexts:\n- name: prod\n  context: {}\n").unwrap();
    drop(file);

    let contexts = loader.contexts().await;
    assert_eq!(vec!["dev", "prod"], contexts.names());
    assert!(contexts.load_errors().is_empty());
}
