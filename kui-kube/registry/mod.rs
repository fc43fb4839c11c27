pub use self::discovery::{DiscoveryError, DiscoverySource, RegistryBuilder, discover};
pub use self::info::{
    CORE_API_PREFIX, CORE_GROUP_NAME, GROUPS_API_PREFIX, InvalidResourceKey, ResourceInfo, ResourceKey, ResourcePath,
};
pub use self::resource_registry::{ResourceRegistry, ResourceScope};

mod discovery;
mod info;
mod resource_registry;
