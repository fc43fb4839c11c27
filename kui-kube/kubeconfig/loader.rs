use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::info;

use crate::context::ClientOptions;

use super::Contexts;

#[cfg(test)]
#[path = "./loader.tests.rs"]
mod loader_tests;

/// Loads [`Contexts`] from the kubeconfig files and reloads them when any of the files changes.
pub struct KubeConfigLoader {
    files: Vec<PathBuf>,
    options: ClientOptions,
    file_times: HashMap<PathBuf, SystemTime>,
    contexts: Option<Arc<Contexts>>,
}

impl KubeConfigLoader {
    /// Creates new [`KubeConfigLoader`] instance.\
    /// **Note** that empty file names are ignored.
    pub fn new(files: Vec<PathBuf>, options: ClientOptions) -> Self {
        Self {
            files: files.into_iter().filter(|f| !f.as_os_str().is_empty()).collect(),
            options,
            file_times: HashMap::new(),
            contexts: None,
        }
    }

    /// Returns contexts catalog, loading it again if modification time of any file has changed.
    pub async fn contexts(&mut self) -> Arc<Contexts> {
        let file_times = self.modification_times().await;
        if file_times != self.file_times {
            if self.contexts.is_some() {
                info!("Kubeconfig files changed, reloading contexts");
            }

            self.file_times = file_times;
            self.contexts = None;
        }

        if let Some(contexts) = &self.contexts {
            return Arc::clone(contexts);
        }

        let contexts = Arc::new(Contexts::load(&self.files, self.options.clone()).await);
        self.contexts = Some(Arc::clone(&contexts));
        contexts
    }

    async fn modification_times(&self) -> HashMap<PathBuf, SystemTime> {
        let mut times = HashMap::with_capacity(self.files.len());
        for file in &self.files {
            if let Ok(modified) = tokio::fs::metadata(file).await.and_then(|m| m.modified()) {
                times.insert(file.clone(), modified);
            }
        }

        times
    }
}
