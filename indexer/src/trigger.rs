//! HTTP endpoint that rebuilds and repackages the index on request.
//!
//! `/update` runs the index command and then the packaging command. A failed
//! step answers `500` with the status text followed by the step's combined
//! output; success answers `200` with an empty body. Requests are handled one
//! at a time so two rebuilds never write the outputs concurrently.
//! Authentication is left to the fronting proxy.

use crate::error::{IndexerError, Result};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::any;
use std::net::SocketAddr;
use std::process::{Command, Output};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Abstraction for running external commands.
pub trait CommandExecutor: Send + Sync {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(IndexerError::from)
    }
}

/// One command run by the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    label: String,
    program: String,
    args: Vec<String>,
}

impl Step {
    /// Split `command_line` with shell quoting rules.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::InvalidCommand`] when the quoting is
    /// unbalanced or the line holds no program.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_catalog_indexer::trigger::Step;
    ///
    /// let step = Step::parse("package", "npm run 'build-prod'")?;
    /// assert_eq!(step.program(), "npm");
    /// assert_eq!(step.args(), ["run", "build-prod"]);
    /// # Ok::<(), release_catalog_indexer::error::IndexerError>(())
    /// ```
    pub fn parse(label: &str, command_line: &str) -> Result<Self> {
        let invalid = |reason: String| IndexerError::InvalidCommand {
            step: label.to_owned(),
            command: command_line.to_owned(),
            reason,
        };

        let mut words = shell_words::split(command_line)
            .map_err(|e| invalid(e.to_string()))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| invalid("no program given".to_owned()))?;

        Ok(Self {
            label: label.to_owned(),
            program,
            args: words.collect(),
        })
    }

    /// Label used in logs.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn run(&self, executor: &dyn CommandExecutor) -> std::result::Result<(), StepFailure> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        match executor.run(&self.program, &args) {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => {
                let mut combined = output.stdout;
                combined.extend_from_slice(&output.stderr);
                Err(StepFailure {
                    step: self.label.clone(),
                    reason: output.status.to_string(),
                    output: combined,
                })
            }
            Err(err) => Err(StepFailure {
                step: self.label.clone(),
                reason: err.to_string(),
                output: format!("{err}\n").into_bytes(),
            }),
        }
    }
}

/// A step that failed to spawn or exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Label of the failing step.
    pub step: String,
    /// Exit status or spawn error.
    pub reason: String,
    /// Stdout followed by stderr, or the spawn error text.
    pub output: Vec<u8>,
}

/// Run `steps` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the [`StepFailure`] of the first step that does not succeed.
pub fn run_steps(
    executor: &dyn CommandExecutor,
    steps: &[Step],
) -> std::result::Result<(), StepFailure> {
    for step in steps {
        info!(step = step.label(), program = step.program(), "Running step");
        step.run(executor)?;
    }
    Ok(())
}

/// Shared state of the trigger service.
#[derive(Clone)]
pub struct TriggerState {
    executor: Arc<dyn CommandExecutor>,
    steps: Arc<[Step]>,
    running: Arc<Mutex<()>>,
}

impl TriggerState {
    /// Create state that runs `steps` with `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>, steps: Vec<Step>) -> Self {
        Self {
            executor,
            steps: steps.into(),
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Create state for the index and packaging command lines.
    ///
    /// # Errors
    ///
    /// Returns [`IndexerError::InvalidCommand`] when either line cannot be
    /// split.
    pub fn from_command_lines(
        executor: Arc<dyn CommandExecutor>,
        index_command: &str,
        package_command: &str,
    ) -> Result<Self> {
        let steps = vec![
            Step::parse("index", index_command)?,
            Step::parse("package", package_command)?,
        ];
        Ok(Self::new(executor, steps))
    }
}

/// Build the router exposing `/update` for any method.
#[must_use]
pub fn router(state: TriggerState) -> Router {
    Router::new()
        .route("/update", any(update_handler))
        .with_state(state)
}

/// Run every step and report the outcome as an HTTP response.
pub async fn update_handler(State(state): State<TriggerState>) -> (StatusCode, String) {
    // The guard moves into the blocking task so a dropped request cannot
    // release it while the rebuild is still running.
    let running = Arc::clone(&state.running).lock_owned().await;
    info!("Updating index");

    let executor = Arc::clone(&state.executor);
    let steps = Arc::clone(&state.steps);
    let outcome = tokio::task::spawn_blocking(move || {
        let _running = running;
        run_steps(executor.as_ref(), &steps)
    })
    .await;

    match outcome {
        Ok(Ok(())) => {
            info!("Index updated");
            (StatusCode::OK, String::new())
        }
        Ok(Err(failure)) => {
            error!(step = %failure.step, reason = %failure.reason, "Update step failed");
            internal_error(&String::from_utf8_lossy(&failure.output))
        }
        Err(join_error) => {
            error!(error = %join_error, "Update task did not complete");
            internal_error(&format!("{join_error}\n"))
        }
    }
}

fn internal_error(detail: &str) -> (StatusCode, String) {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let text = status.canonical_reason().unwrap_or("Internal Server Error");
    (status, format!("{text}\n{detail}"))
}

/// Serve the trigger on `addr` until interrupted.
///
/// # Errors
///
/// Returns [`IndexerError::Io`] if the address cannot be bound or the server
/// fails.
pub async fn serve(addr: SocketAddr, state: TriggerState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Executor that takes a while per command and records how many
    /// commands overlap.
    #[derive(Default)]
    struct SlowExecutor {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl CommandExecutor for SlowExecutor {
        fn run(&self, _cmd: &str, _args: &[&str]) -> Result<Output> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(success_output(""))
        }
    }

    fn state(stub: &Arc<StubExecutor>) -> TriggerState {
        let executor: Arc<dyn CommandExecutor> = Arc::clone(stub) as Arc<dyn CommandExecutor>;
        TriggerState::from_command_lines(executor, "./scripts/updateindex", "npm run build-prod")
            .expect("valid commands")
    }

    #[rstest]
    #[case::plain("update-index", "update-index", &[])]
    #[case::quoted("npm run 'build prod'", "npm", &["run", "build prod"])]
    #[case::flags("update-index --versions 6", "update-index", &["--versions", "6"])]
    fn step_parse_splits_words(
        #[case] line: &str,
        #[case] program: &str,
        #[case] args: &[&str],
    ) {
        let step = Step::parse("index", line).expect("valid line");
        assert_eq!(step.program(), program);
        assert_eq!(step.args(), args);
    }

    #[rstest]
    #[case::empty("")]
    #[case::unbalanced("npm run 'build")]
    fn step_parse_rejects_unusable_lines(#[case] line: &str) {
        let err = Step::parse("package", line).expect_err("invalid line");
        assert!(matches!(err, IndexerError::InvalidCommand { ref step, .. } if step == "package"));
    }

    #[test]
    fn run_steps_stops_at_first_failure() {
        let stub = StubExecutor::new(vec![ExpectedCall::new(
            "update-index",
            &[],
            failure_output("partial\n", "boom\n"),
        )]);
        let steps = [
            Step::parse("index", "update-index").expect("valid"),
            Step::parse("package", "npm run build-prod").expect("valid"),
        ];

        let failure = run_steps(&stub, &steps).expect_err("first step fails");

        assert_eq!(failure.step, "index");
        assert_eq!(failure.output, b"partial\nboom\n");
        stub.assert_finished();
    }

    #[test]
    fn spawn_failure_is_reported_as_output() {
        let stub = StubExecutor::new(vec![ExpectedCall {
            cmd: "update-index",
            args: vec![],
            result: Err(IndexerError::Io(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            ))),
        }]);
        let steps = [Step::parse("index", "update-index").expect("valid")];

        let failure = run_steps(&stub, &steps).expect_err("spawn fails");
        assert!(String::from_utf8_lossy(&failure.output).starts_with("I/O error"));
    }

    #[tokio::test]
    async fn handler_succeeds_with_empty_body() {
        let stub = Arc::new(StubExecutor::new(vec![
            ExpectedCall::new("./scripts/updateindex", &[], success_output("ok\n")),
            ExpectedCall::new("npm", &["run", "build-prod"], success_output("built\n")),
        ]));

        let (status, body) = update_handler(State(state(&stub))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        stub.assert_finished();
    }

    #[tokio::test]
    async fn failing_package_step_returns_500_with_output() {
        let stub = Arc::new(StubExecutor::new(vec![
            ExpectedCall::new("./scripts/updateindex", &[], success_output("")),
            ExpectedCall::new(
                "npm",
                &["run", "build-prod"],
                failure_output("", "webpack failed\n"),
            ),
        ]));

        let (status, body) = update_handler(State(state(&stub))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error\nwebpack failed\n");
        stub.assert_finished();
    }

    #[tokio::test]
    async fn failing_index_step_skips_packaging() {
        let stub = Arc::new(StubExecutor::new(vec![ExpectedCall::new(
            "./scripts/updateindex",
            &[],
            failure_output("Unable to update index: build catalog\n", ""),
        )]));

        let (status, body) = update_handler(State(state(&stub))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.ends_with("Unable to update index: build catalog\n"));
        stub.assert_finished();
    }

    #[tokio::test]
    async fn abandoned_request_keeps_later_rebuilds_waiting() {
        let executor = Arc::new(SlowExecutor::default());
        let state = TriggerState::from_command_lines(
            Arc::clone(&executor) as Arc<dyn CommandExecutor>,
            "update-index",
            "npm run build-prod",
        )
        .expect("valid commands");

        let abandoned = tokio::time::timeout(
            Duration::from_millis(50),
            update_handler(State(state.clone())),
        )
        .await;
        assert!(abandoned.is_err(), "first request should time out");

        let (status, _) = update_handler(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            executor.peak.load(Ordering::SeqCst),
            1,
            "two rebuilds overlapped"
        );
    }
}
