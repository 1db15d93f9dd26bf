//! Task address resolution
//!
//! Walks the described task from the configured container to its network
//! attachment to the detail carrying either the private IPv4 address or
//! the network interface ID. The platform never exposes a task's public IP
//! directly, so the public path resolves the interface ID against the EC2
//! network-interface API in a second step.

use std::collections::HashMap;

use aws_sdk_ecs::types::Task;

use crate::aws::ec2::Ec2Client;
use crate::aws::ecs::{EcsClient, TaskHandle};
use crate::config::TaskConfig;
use crate::error::{Error, Result};

/// Attachment detail key holding the task's private IPv4 address
const DETAIL_PRIVATE_IPV4: &str = "privateIPv4Address";

/// Attachment detail key holding the task's ENI ID
const DETAIL_NETWORK_INTERFACE_ID: &str = "networkInterfaceId";

/// Which kind of address a [`TaskAddress`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Private,
    Public,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressKind::Private => f.write_str("private"),
            AddressKind::Public => f.write_str("public"),
        }
    }
}

/// The resolved SSH target for the session. Derived once, never mutated.
#[derive(Debug, Clone)]
pub struct TaskAddress {
    pub ip: String,
    pub kind: AddressKind,
}

/// What the task's attachment details yielded: either the final private
/// address, or the interface ID the public address must be resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttachmentTarget {
    PrivateIp(String),
    NetworkInterface(String),
}

/// Resolve the task's reachable address.
///
/// Private placement reads the address straight off the attachment; public
/// placement performs exactly one network-interface lookup keyed by the
/// extracted ENI ID.
pub async fn resolve(
    ecs: &EcsClient,
    ec2: &Ec2Client,
    config: &TaskConfig,
    handle: &TaskHandle,
) -> Result<TaskAddress> {
    let task = ecs.describe_task(config, handle).await?;

    match attachment_target(&task, &config.container_name, config.assign_public_ip)? {
        AttachmentTarget::PrivateIp(ip) => Ok(TaskAddress {
            ip,
            kind: AddressKind::Private,
        }),
        AttachmentTarget::NetworkInterface(interface_id) => {
            let ip = ec2.public_ip_of_interface(&interface_id).await?;
            Ok(TaskAddress {
                ip,
                kind: AddressKind::Public,
            })
        }
    }
}

/// Extract the address target from a described task.
///
/// Three keyed lookups: container by name, attachment by ID, detail by key.
/// Each is built with `entry().or_insert()` so when the platform reports
/// duplicates the first occurrence wins.
pub(crate) fn attachment_target(
    task: &Task,
    container_name: &str,
    public: bool,
) -> Result<AttachmentTarget> {
    let attachment_id = task
        .containers()
        .iter()
        .find(|container| container.name() == Some(container_name))
        .ok_or_else(|| {
            Error::AddressResolution(format!("task has no container named '{container_name}'"))
        })?
        .network_interfaces()
        .first()
        .and_then(|ni| ni.attachment_id())
        .ok_or_else(|| {
            Error::AddressResolution(format!(
                "container '{container_name}' has no network attachment"
            ))
        })?;

    let mut attachments = HashMap::new();
    for attachment in task.attachments() {
        if let Some(id) = attachment.id() {
            attachments.entry(id).or_insert(attachment);
        }
    }

    let attachment = attachments.get(attachment_id).ok_or_else(|| {
        Error::AddressResolution(format!("task has no attachment with id '{attachment_id}'"))
    })?;

    let mut details = HashMap::new();
    for kv in attachment.details() {
        if let (Some(name), Some(value)) = (kv.name(), kv.value()) {
            details.entry(name).or_insert(value);
        }
    }

    let key = if public {
        DETAIL_NETWORK_INTERFACE_ID
    } else {
        DETAIL_PRIVATE_IPV4
    };

    let value = details.get(key).ok_or_else(|| {
        Error::AddressResolution(format!(
            "attachment '{attachment_id}' carries no '{key}' detail"
        ))
    })?;

    Ok(if public {
        AttachmentTarget::NetworkInterface(value.to_string())
    } else {
        AttachmentTarget::PrivateIp(value.to_string())
    })
}
