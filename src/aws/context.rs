//! Shared AWS configuration context
//!
//! Loads the SDK configuration once (credentials, region chain, profiles)
//! and hands out service clients built from the same config.

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared AWS configuration for creating service clients.
#[derive(Debug, Clone)]
pub struct AwsContext {
    config: SdkConfig,
}

impl AwsContext {
    /// Load AWS configuration from the environment, config files, and IAM
    /// roles, optionally overriding the region.
    pub async fn new(region: Option<&str>) -> Self {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        let loader = match region {
            Some(region) => loader.region(Region::new(region.to_string())),
            None => loader,
        };

        Self {
            config: loader.load().await,
        }
    }

    /// Get the underlying SDK config for direct client construction.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Create an ECS client from this context.
    pub fn ecs_client(&self) -> aws_sdk_ecs::Client {
        aws_sdk_ecs::Client::new(&self.config)
    }

    /// Create an EC2 client from this context.
    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.config)
    }
}
