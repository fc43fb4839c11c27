pub use self::auth::Auth;
pub use self::client::{Client, ClientError, ListEvent, ListEvents, ListOptions, Resource, ResourceList};
pub use self::context::{ClientOptions, ConnectionInfo, Context, ContextError, RegistryCache};
pub use self::kinds::{
    CORE_VERSION, DAEMON_SETS, DEPLOYMENTS, EVENTS, NAMESPACES, NODES, PODS, REPLICA_SETS, SERVICES, STATEFUL_SETS,
};
pub use self::kubeconfig::{Contexts, KubeConfigFile, KubeConfigLoader};
pub use self::projection::{Projection, ProjectionError, projection_for};
pub use self::registry::{
    DiscoveryError, DiscoverySource, InvalidResourceKey, RegistryBuilder, ResourceInfo, ResourceKey, ResourcePath,
    ResourceRegistry, ResourceScope, discover,
};

pub mod kubeconfig;
pub mod projection;
pub mod utils;

mod auth;
mod client;
mod context;
mod kinds;
mod registry;
