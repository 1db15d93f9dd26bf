//! Typed errors for the task session phases
//!
//! Every phase surfaces its own variant; all of them are fatal and end the
//! process with a non-zero exit after `main` prints them. There is no local
//! recovery beyond the fixed polling budgets in `wait`.

use thiserror::Error;

use crate::aws::PlatformError;

/// Errors produced by the task lifecycle phases
#[derive(Debug, Error)]
pub enum Error {
    /// SSH key pair generation failed
    #[error("failed to generate SSH key pair: {0}")]
    KeyGeneration(#[from] ssh_key::Error),

    /// Task submission was rejected by the platform
    #[error("failed to launch task: {0}")]
    Launch(#[source] PlatformError),

    /// A task status query failed
    #[error("task status query failed: {0}")]
    Query(#[source] PlatformError),

    /// The task never reached RUNNING within the polling budget
    #[error("task did not reach RUNNING state\n{diagnostic}")]
    NotReady { diagnostic: String },

    /// The task's IP address could not be determined
    #[error("could not resolve task address: {0}")]
    AddressResolution(String),

    /// The forced stop of a lingering task failed
    #[error("failed to force-stop task: {0}")]
    ForceStop(#[source] PlatformError),

    /// Writing the private key to its scratch file failed
    #[error("failed to write private key file: {0}")]
    KeyFile(#[source] std::io::Error),

    /// The ssh client could not be spawned
    #[error("failed to run ssh: {0}")]
    Ssh(#[source] std::io::Error),

    /// The session was interrupted before the shell opened
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_diagnostic() {
        let err = Error::NotReady {
            diagnostic: "Task in status STOPPED".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("did not reach RUNNING"));
        assert!(text.contains("Task in status STOPPED"));
    }

    #[test]
    fn display_names_the_phase() {
        let err = Error::Launch(PlatformError::other(None, "quota exceeded"));
        assert!(err.to_string().starts_with("failed to launch task"));

        let err = Error::AddressResolution("no attachment".to_string());
        assert!(err.to_string().contains("no attachment"));
    }
}
