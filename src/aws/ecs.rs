//! ECS task lifecycle: launch, readiness, teardown
//!
//! One task per process invocation. The launcher submits a single Fargate
//! task with the session public key injected into the target container's
//! environment; the pollers wait on fixed budgets for RUNNING and STOPPED;
//! teardown escalates to a forced stop when the task lingers.

use std::time::Duration;

use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, Failure, KeyValuePair, LaunchType,
    NetworkConfiguration, Task, TaskOverride,
};
use tracing::{info, warn};

use crate::aws::context::AwsContext;
use crate::aws::error::PlatformError;
use crate::config::{PUBLIC_KEY_ENV_VAR, STARTED_BY, TaskConfig};
use crate::error::{Error, Result};
use crate::wait::{PollConfig, PollOutcome, poll_until};

/// Readiness budget: 5 seconds * 60 attempts = 5 minutes
pub const READY_POLL: PollConfig = PollConfig::new(Duration::from_secs(5), 60);

/// Shutdown budget: 5 seconds * 12 attempts = 1 minute
pub const STOP_POLL: PollConfig = PollConfig::new(Duration::from_secs(5), 12);

const STATUS_RUNNING: &str = "RUNNING";
const STATUS_STOPPED: &str = "STOPPED";

/// Handle to the one launched task. The ARN is opaque and never mutated.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub arn: String,
}

/// ECS client for the task session.
pub struct EcsClient {
    client: aws_sdk_ecs::Client,
}

impl EcsClient {
    pub fn new(aws: &AwsContext) -> Self {
        Self {
            client: aws.ecs_client(),
        }
    }

    /// Submit exactly one task instance for the configured task definition.
    ///
    /// The target container's environment is overridden to carry the
    /// session public key; network placement is fixed at submission time.
    /// `RunTask` reports per-task rejections in a `failures` list rather
    /// than as an API error, so both surfaces map to [`Error::Launch`].
    pub async fn run_task(&self, config: &TaskConfig, public_key: &str) -> Result<TaskHandle> {
        let assign_public_ip = if config.assign_public_ip {
            AssignPublicIp::Enabled
        } else {
            AssignPublicIp::Disabled
        };

        let vpc = AwsVpcConfiguration::builder()
            .assign_public_ip(assign_public_ip)
            .set_security_groups(Some(config.security_groups.clone()))
            .set_subnets(Some(config.subnets.clone()))
            .build()
            .map_err(|e| Error::Launch(PlatformError::other(None, e.to_string())))?;

        let overrides = TaskOverride::builder()
            .container_overrides(
                ContainerOverride::builder()
                    .name(&config.container_name)
                    .environment(
                        KeyValuePair::builder()
                            .name(PUBLIC_KEY_ENV_VAR)
                            .value(public_key)
                            .build(),
                    )
                    .build(),
            )
            .build();

        info!(
            task_definition = %config.task_definition,
            cluster = %config.cluster,
            public_ip = config.assign_public_ip,
            "Launching task"
        );

        let response = self
            .client
            .run_task()
            .task_definition(&config.task_definition)
            .cluster(&config.cluster)
            .started_by(STARTED_BY)
            .launch_type(LaunchType::Fargate)
            .overrides(overrides)
            .network_configuration(
                NetworkConfiguration::builder()
                    .awsvpc_configuration(vpc)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| Error::Launch(PlatformError::from_sdk(&e)))?;

        if let Some(failure) = response.failures().first() {
            return Err(Error::Launch(PlatformError::other(
                None,
                failure_text(failure),
            )));
        }

        let arn = response
            .tasks()
            .first()
            .and_then(|task| task.task_arn())
            .ok_or_else(|| Error::Launch(PlatformError::other(None, "RunTask returned no tasks")))?
            .to_string();

        info!(task_arn = %arn, "Started task");

        Ok(TaskHandle { arn })
    }

    /// Fetch the current description of the task.
    pub async fn describe_task(&self, config: &TaskConfig, handle: &TaskHandle) -> Result<Task> {
        let response = self
            .client
            .describe_tasks()
            .cluster(&config.cluster)
            .tasks(&handle.arn)
            .send()
            .await
            .map_err(|e| Error::Query(PlatformError::from_sdk(&e)))?;

        if let Some(failure) = response.failures().first() {
            return Err(Error::Query(PlatformError::other(
                None,
                failure_text(failure),
            )));
        }

        response
            .tasks()
            .first()
            .cloned()
            .ok_or_else(|| {
                Error::Query(PlatformError::other(
                    None,
                    format!("task '{}' missing from describe response", handle.arn),
                ))
            })
    }

    /// Block until the task reports RUNNING, within the readiness budget.
    ///
    /// A task observed STOPPED while waiting fails immediately with its
    /// diagnostic; budget exhaustion fetches one best-effort diagnostic
    /// before reporting [`Error::NotReady`]. A failing status query aborts
    /// the phase on that attempt.
    pub async fn await_running(&self, config: &TaskConfig, handle: &TaskHandle) -> Result<()> {
        info!(
            task_arn = %handle.arn,
            budget_secs = READY_POLL.budget().as_secs(),
            "Waiting for task to reach RUNNING"
        );

        let outcome = poll_until(READY_POLL, "task RUNNING", || async move {
            let task = self.describe_task(config, handle).await?;
            if is_stopped(&task) {
                // terminal state, the rest of the budget can't help
                return Err(Error::NotReady {
                    diagnostic: format_task_diagnostic(&task),
                });
            }
            Ok(is_running(&task))
        })
        .await?;

        match outcome {
            PollOutcome::Ready => Ok(()),
            PollOutcome::Exhausted { attempts } => {
                warn!(task_arn = %handle.arn, attempts, "Task never reached RUNNING");
                Err(Error::NotReady {
                    diagnostic: self.readiness_diagnostic(config, handle).await,
                })
            }
        }
    }

    /// Best-effort diagnostic fetch. A failure here must not mask the
    /// readiness failure being reported.
    async fn readiness_diagnostic(&self, config: &TaskConfig, handle: &TaskHandle) -> String {
        match self.describe_task(config, handle).await {
            Ok(task) => format_task_diagnostic(&task),
            Err(err) => format!("no diagnostic available: {err}"),
        }
    }

    /// Tear the task down once the session is over.
    ///
    /// Polls the shutdown budget for the task to stop on its own; a task
    /// already stopped never receives a forced stop. On exhaustion, issues
    /// exactly one `StopTask` and reports success once that call returns.
    /// Only a status-query failure or a failed forced stop is an error.
    pub async fn cleanup(&self, config: &TaskConfig, handle: &TaskHandle) -> Result<()> {
        info!(
            task_arn = %handle.arn,
            budget_secs = STOP_POLL.budget().as_secs(),
            "Waiting for task to stop"
        );

        let outcome = poll_until(STOP_POLL, "task STOPPED", || async move {
            let task = self.describe_task(config, handle).await?;
            Ok::<_, Error>(is_stopped(&task))
        })
        .await?;

        match outcome {
            PollOutcome::Ready => {
                info!(task_arn = %handle.arn, "Task stopped");
            }
            PollOutcome::Exhausted { .. } => {
                warn!(
                    task_arn = %handle.arn,
                    waited_secs = STOP_POLL.budget().as_secs(),
                    "Task has not stopped; forcibly stopping"
                );
                self.force_stop(config, handle).await?;
                info!(task_arn = %handle.arn, "Task stopped");
            }
        }

        Ok(())
    }

    async fn force_stop(&self, config: &TaskConfig, handle: &TaskHandle) -> Result<()> {
        self.client
            .stop_task()
            .cluster(&config.cluster)
            .task(&handle.arn)
            .reason("fargate-login session ended")
            .send()
            .await
            .map_err(|e| Error::ForceStop(PlatformError::from_sdk(&e)))?;

        Ok(())
    }
}

fn last_status(task: &Task) -> &str {
    task.last_status().unwrap_or("UNKNOWN")
}

pub(crate) fn is_running(task: &Task) -> bool {
    last_status(task) == STATUS_RUNNING
}

pub(crate) fn is_stopped(task: &Task) -> bool {
    last_status(task) == STATUS_STOPPED
}

/// Assemble the multi-line task/container status report shown when a task
/// fails to come up.
pub fn format_task_diagnostic(task: &Task) -> String {
    let mut out = vec![format!("Task in status {}", last_status(task))];

    if is_stopped(task) {
        out.push(format!(
            "Stopped reason: {}",
            task.stopped_reason().unwrap_or("none given")
        ));
    }

    for container in task.containers() {
        let name = container.name().unwrap_or("unnamed");
        out.push(format!(
            "[{name}] Status: {}",
            container.last_status().unwrap_or("UNKNOWN")
        ));
        if let Some(reason) = container.reason() {
            out.push(format!("[{name}] Status reason: {reason}"));
        }
    }

    out.join("\n")
}

fn failure_text(failure: &Failure) -> String {
    let reason = failure.reason().unwrap_or("unknown reason");
    match failure.detail() {
        Some(detail) => format!("{reason}: {detail}"),
        None => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::types::Container;

    fn task_with_status(status: &str) -> Task {
        Task::builder().last_status(status).build()
    }

    #[test]
    fn status_classification() {
        assert!(is_running(&task_with_status("RUNNING")));
        assert!(!is_running(&task_with_status("PENDING")));

        assert!(is_stopped(&task_with_status("STOPPED")));
        assert!(!is_stopped(&task_with_status("DEPROVISIONING")));

        // a task with no status yet is neither
        let blank = Task::builder().build();
        assert!(!is_running(&blank));
        assert!(!is_stopped(&blank));
    }

    #[test]
    fn diagnostic_for_stopped_task_lists_containers() {
        let task = Task::builder()
            .last_status("STOPPED")
            .stopped_reason("Essential container exited")
            .containers(
                Container::builder()
                    .name("cli")
                    .last_status("STOPPED")
                    .reason("exit code 1")
                    .build(),
            )
            .containers(Container::builder().name("sidecar").last_status("STOPPED").build())
            .build();

        let diagnostic = format_task_diagnostic(&task);
        let lines: Vec<&str> = diagnostic.lines().collect();

        assert_eq!(lines[0], "Task in status STOPPED");
        assert_eq!(lines[1], "Stopped reason: Essential container exited");
        assert_eq!(lines[2], "[cli] Status: STOPPED");
        assert_eq!(lines[3], "[cli] Status reason: exit code 1");
        assert_eq!(lines[4], "[sidecar] Status: STOPPED");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn diagnostic_for_pending_task_omits_stop_reason() {
        let task = Task::builder()
            .last_status("PENDING")
            .containers(Container::builder().name("cli").last_status("PENDING").build())
            .build();

        let diagnostic = format_task_diagnostic(&task);
        assert!(diagnostic.starts_with("Task in status PENDING"));
        assert!(!diagnostic.contains("Stopped reason"));
    }

    #[test]
    fn failure_text_includes_detail_when_present() {
        let bare = Failure::builder().reason("RESOURCE:MEMORY").build();
        assert_eq!(failure_text(&bare), "RESOURCE:MEMORY");

        let detailed = Failure::builder()
            .reason("MISSING")
            .detail("no container instance")
            .build();
        assert_eq!(failure_text(&detailed), "MISSING: no container instance");
    }

    #[test]
    fn poll_budgets_match_the_documented_totals() {
        assert_eq!(READY_POLL.budget(), Duration::from_secs(300));
        assert_eq!(STOP_POLL.budget(), Duration::from_secs(60));
    }
}
