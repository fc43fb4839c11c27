pub use self::contexts::{Contexts, DEFAULT_CLUSTER_SERVER};
pub use self::file::{ClusterInfo, ContextInfo, KubeConfigFile, NamedCluster, NamedContext, NamedUser, UserInfo};
pub use self::loader::KubeConfigLoader;

mod contexts;
mod file;
mod loader;
