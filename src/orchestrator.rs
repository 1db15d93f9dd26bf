//! Session orchestration
//!
//! Drives the phases strictly in sequence: generate credentials, launch,
//! wait for RUNNING, resolve the address, hand the terminal to ssh, tear
//! the task down. Once the launch has succeeded, teardown runs on every
//! exit path: normal shell exit, any later phase error, or Ctrl-C.

use tracing::{info, warn};

use crate::aws::{self, AwsContext, Ec2Client, EcsClient, TaskHandle};
use crate::config::TaskConfig;
use crate::error::{Error, Result};
use crate::keys::KeyPair;
use crate::ssh;

/// Run one complete task session.
pub async fn run(config: TaskConfig) -> Result<()> {
    let keys = KeyPair::generate()?;

    let aws = AwsContext::new(config.region.as_deref()).await;
    let ecs = EcsClient::new(&aws);

    let handle = ecs.run_task(&config, keys.public_authorized_key()).await?;

    // The task exists from here on; cleanup must run no matter how the
    // session ends. Launch failure is the one path that skips it.
    let session = session(&aws, &ecs, &config, &handle, &keys).await;
    let cleanup = ecs.cleanup(&config, &handle).await;

    session.and(cleanup)
}

/// The interruptible part of the session: everything between launch and
/// teardown. Ctrl-C in the polling phases cancels it; during the
/// interactive session the terminal is raw and keystrokes belong to the
/// remote shell. Once the handler is installed, a later Ctrl-C during
/// teardown no longer kills the process, so the stop wait cannot be
/// skipped.
async fn session(
    aws: &AwsContext,
    ecs: &EcsClient,
    config: &TaskConfig,
    handle: &TaskHandle,
    keys: &KeyPair,
) -> Result<()> {
    tokio::select! {
        result = connect_and_login(aws, ecs, config, handle, keys) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; shutting the task down");
            Err(Error::Interrupted)
        }
    }
}

async fn connect_and_login(
    aws: &AwsContext,
    ecs: &EcsClient,
    config: &TaskConfig,
    handle: &TaskHandle,
    keys: &KeyPair,
) -> Result<()> {
    ecs.await_running(config, handle).await?;

    let ec2 = Ec2Client::new(aws);
    let address = aws::address::resolve(ecs, &ec2, config, handle).await?;

    info!(
        task_arn = %handle.arn,
        ip = %address.ip,
        kind = %address.kind,
        "Task is running"
    );

    // Scoped to the session: the file is removed when this handle drops,
    // whichever way the function exits.
    let key_file = keys.write_private_to_tempfile()?;

    ssh::open_session(key_file.path(), &address, config).await
}
