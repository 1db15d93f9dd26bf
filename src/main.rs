//! fargate-login: launch a one-off ECS Fargate task and SSH into it
//!
//! The task definition is expected to run an SSH server in one container
//! that authorizes whatever public key arrives in `_AUTHORIZED_PUBLIC_KEY`.

use anyhow::Result;
use clap::{ArgAction, Parser};
use fargate_login::{TaskConfig, orchestrator};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "fargate-login")]
#[command(about = "Launch a one-off ECS Fargate task and open an SSH session into it")]
#[command(version)]
struct Args {
    /// Task definition to run an instance of
    #[arg(short = 'n', long)]
    task_definition: String,

    /// Comma-delimited security group IDs for the task
    #[arg(long, value_delimiter = ',', required = true)]
    security_groups: Vec<String>,

    /// Comma-delimited subnet IDs the task may be placed in
    #[arg(long, value_delimiter = ',', required = true)]
    subnets: Vec<String>,

    /// Whether the task should be assigned a public IP
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    assign_public_ip: bool,

    /// ECS cluster to run the task on
    #[arg(long, default_value = fargate_login::config::DEFAULT_CLUSTER)]
    cluster: String,

    /// Container in the task definition that runs the SSH server
    #[arg(long, default_value = fargate_login::config::DEFAULT_CONTAINER_NAME)]
    container_name: String,

    /// AWS region (defaults to the profile/environment region)
    #[arg(long)]
    region: Option<String>,

    /// SSH port on the task container
    #[arg(long, default_value_t = fargate_login::config::DEFAULT_SSH_PORT)]
    ssh_port: u16,

    /// Login user for the SSH session
    #[arg(long, default_value = fargate_login::config::DEFAULT_SSH_USER)]
    ssh_user: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = TaskConfig {
        task_definition: args.task_definition,
        cluster: args.cluster,
        container_name: args.container_name,
        assign_public_ip: args.assign_public_ip,
        security_groups: args.security_groups,
        subnets: args.subnets,
        region: args.region,
        ssh_user: args.ssh_user,
        ssh_port: args.ssh_port,
    };

    debug!(?config, "parsed configuration");

    orchestrator::run(config).await?;

    Ok(())
}
