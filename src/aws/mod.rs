//! AWS client modules
//!
//! - ecs: task launch, status polling, and teardown
//! - ec2: network-interface lookup for public addresses
//! - address: container/attachment address extraction
//! - context: shared SDK configuration
//! - error: platform error classification

pub mod address;
pub mod context;
pub mod ec2;
pub mod ecs;
pub mod error;

pub use address::{AddressKind, TaskAddress};
pub use context::AwsContext;
pub use ec2::Ec2Client;
pub use ecs::{EcsClient, TaskHandle};
pub use error::PlatformError;
