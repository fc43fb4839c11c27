pub use self::config::{
    APP_NAME, APP_VERSION, Config, DEFAULT_DISCOVERY_CONCURRENCY, Impersonation, default_kube_config_files,
    load_or_create_default, split_kube_config_paths,
};
pub use self::errors::ConfigError;
pub use self::persistable::Persistable;

mod config;
mod errors;
mod persistable;
