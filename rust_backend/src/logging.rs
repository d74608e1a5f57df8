//! Structured logging setup and per-operation start/finish records.
//!
//! Operations do not reach for a global logger. The caller hands each one an
//! [`OperationLog`]; the operation opens a child [`OperationScope`], which emits
//! a `Starting <op>.` record on entry and `Finished <op>.` when
//! [`OperationScope::finish`] is called. A scope dropped without finishing
//! (an early `?` return) records `Aborted <op>.` instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, Span};
use tracing_subscriber::EnvFilter;

use crate::error::{DagError, DagResult};

/// Default log file, appended to on every run.
pub const DEFAULT_LOG_FILE: &str = "configure_dag.log";

/// Install the global subscriber.
///
/// With `log_file` set, records are appended to that file without ANSI
/// colouring; otherwise they go to stderr. The level comes from `RUST_LOG`
/// and defaults to `debug`.
pub fn init(log_file: Option<&Path>) -> DagResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| DagError::write(path, e))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| DagError::Config(format!("Failed to initialise logging: {e}")))?;
    debug!("Logging started.");
    Ok(())
}

/// Handle passed into each operation of a batch run.
#[derive(Debug, Clone)]
pub struct OperationLog {
    span: Span,
}

impl OperationLog {
    /// Root handle for one invocation of a workflow.
    pub fn new(workflow: &'static str) -> Self {
        Self {
            span: tracing::info_span!("workflow", name = workflow),
        }
    }

    /// Handle that records nothing; for tests and library callers without a subscriber.
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Open a child scope and record its start.
    pub fn begin(&self, operation: &'static str) -> OperationScope {
        let span = tracing::debug_span!(parent: &self.span, "operation", name = operation);
        debug!(parent: &span, operation, "Starting {operation}.");
        OperationScope {
            operation,
            log: OperationLog { span },
            finished: false,
        }
    }
}

/// A running operation; see the module docs.
#[derive(Debug)]
pub struct OperationScope {
    operation: &'static str,
    log: OperationLog,
    finished: bool,
}

impl OperationScope {
    pub fn span(&self) -> &Span {
        &self.log.span
    }

    /// Handle for nested operations.
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn finish(mut self) {
        self.finished = true;
        let operation = self.operation;
        debug!(parent: &self.log.span, operation, "Finished {operation}.");
    }
}

impl Drop for OperationScope {
    fn drop(&mut self) {
        if !self.finished {
            let operation = self.operation;
            debug!(parent: &self.log.span, operation, "Aborted {operation}.");
        }
    }
}
