//! Interactive SSH session
//!
//! Hands the terminal to the external `ssh` client with the throwaway
//! identity file. Host keys are ephemeral (the task was created seconds
//! ago), so host-key verification is disabled for the session.

use std::path::Path;

use tokio::process::Command;
use tracing::{info, warn};

use crate::aws::TaskAddress;
use crate::config::TaskConfig;
use crate::error::{Error, Result};

/// Open an interactive SSH session to the task and wait for it to end.
///
/// stdio is inherited, so the session owns the terminal until the remote
/// shell exits. A non-zero ssh exit ends the session but is not a tool
/// error.
pub async fn open_session(
    key_path: &Path,
    address: &TaskAddress,
    config: &TaskConfig,
) -> Result<()> {
    let destination = format!("{}@{}", config.ssh_user, address.ip);

    info!(destination = %destination, port = config.ssh_port, "Opening SSH session");

    let status = Command::new("ssh")
        .arg("-p")
        .arg(config.ssh_port.to_string())
        .arg("-i")
        .arg(key_path)
        .arg("-o")
        .arg("UserKnownHostsFile=/dev/null")
        .arg("-o")
        .arg("StrictHostKeyChecking=no")
        .arg(&destination)
        .status()
        .await
        .map_err(Error::Ssh)?;

    if !status.success() {
        warn!(code = ?status.code(), "ssh exited with non-zero status");
    }

    Ok(())
}
