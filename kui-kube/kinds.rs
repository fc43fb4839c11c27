pub const CORE_VERSION: &str = "v1";

pub const NAMESPACES: &str = "namespaces";
pub const NODES: &str = "nodes";
pub const PODS: &str = "pods";
pub const SERVICES: &str = "services";
pub const DEPLOYMENTS: &str = "deployments";
pub const REPLICA_SETS: &str = "replicasets";
pub const DAEMON_SETS: &str = "daemonsets";
pub const STATEFUL_SETS: &str = "statefulsets";
pub const EVENTS: &str = "events";
