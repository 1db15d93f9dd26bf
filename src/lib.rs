//! fargate-login: one-off ECS Fargate tasks with an interactive SSH session.
//!
//! Launches a single task from a named task definition, injects a freshly
//! generated SSH public key into the task's environment, waits for the task
//! to reach RUNNING, resolves its private or public IP address, and hands
//! the terminal to `ssh`. When the session ends the task is torn down:
//! a short poll for the task to stop on its own, escalating to a forced
//! `StopTask` if it doesn't.

pub mod aws;
pub mod config;
pub mod error;
pub mod keys;
pub mod orchestrator;
pub mod ssh;
pub mod wait;

pub use config::TaskConfig;
pub use error::{Error, Result};
