//! EC2 network-interface lookup
//!
//! The secondary half of public-address resolution: ECS only exposes the
//! task's ENI ID, so the literal public IP comes from
//! `DescribeNetworkInterfaces`.

use tracing::debug;

use crate::aws::context::AwsContext;
use crate::aws::error::PlatformError;
use crate::error::{Error, Result};

/// EC2 client for resolving network interfaces.
pub struct Ec2Client {
    client: aws_sdk_ec2::Client,
}

impl Ec2Client {
    pub fn new(aws: &AwsContext) -> Self {
        Self {
            client: aws.ec2_client(),
        }
    }

    /// Resolve the public IP associated with a network interface.
    ///
    /// Exactly one interface must come back for the ID and it must carry a
    /// public association; anything else is an error rather than an
    /// implicit first-element pick.
    pub async fn public_ip_of_interface(&self, interface_id: &str) -> Result<String> {
        let response = self
            .client
            .describe_network_interfaces()
            .network_interface_ids(interface_id)
            .send()
            .await
            .map_err(|e| Error::Query(PlatformError::from_sdk(&e)))?;

        let interfaces = response.network_interfaces();
        if interfaces.len() != 1 {
            return Err(Error::AddressResolution(format!(
                "expected exactly one network interface for '{interface_id}', got {}",
                interfaces.len()
            )));
        }

        let ip = interfaces[0]
            .association()
            .and_then(|association| association.public_ip())
            .ok_or_else(|| {
                Error::AddressResolution(format!(
                    "network interface '{interface_id}' has no public address association"
                ))
            })?
            .to_string();

        debug!(interface_id = %interface_id, ip = %ip, "resolved public address");

        Ok(ip)
    }
}
