//! Task configuration

/// Default ECS cluster name
pub const DEFAULT_CLUSTER: &str = "default";

/// Default name of the container in the task definition that runs the SSH server
pub const DEFAULT_CONTAINER_NAME: &str = "cli";

/// Default SSH login user on the task container
pub const DEFAULT_SSH_USER: &str = "root";

/// Default SSH port on the task container
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Environment variable the task container reads the authorized public key from
pub const PUBLIC_KEY_ENV_VAR: &str = "_AUTHORIZED_PUBLIC_KEY";

/// `startedBy` marker attached to every launched task for traceability
pub const STARTED_BY: &str = "fargate-login";

/// Configuration for a single task session.
///
/// Built once from command line arguments at startup and passed by
/// reference to every phase. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    /// Task definition to run an instance of
    pub task_definition: String,

    /// ECS cluster the task runs on
    pub cluster: String,

    /// Container in the task definition that runs the SSH server
    pub container_name: String,

    /// Whether the task gets a public IP assigned
    pub assign_public_ip: bool,

    /// Security group IDs for the task's network interface
    pub security_groups: Vec<String>,

    /// Subnet IDs the task may be placed in
    pub subnets: Vec<String>,

    /// AWS region override (None uses the shared config chain)
    pub region: Option<String>,

    /// SSH login user
    pub ssh_user: String,

    /// SSH port
    pub ssh_port: u16,
}
