// CLI runner - program prefix plus caller-side retry policy

use crate::executor::{CommandExecutor, ExecutorError, RetryPolicy};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::types::CliRun;

/// Attempts allowed for a command that keeps timing out
const MAX_TIMEOUT_ATTEMPTS: u32 = 2;

/// Runs `program cmd args...` and applies the exit-code retry table
#[derive(Debug, Clone)]
pub struct CliRunner {
    executor: CommandExecutor,
    program: String,
    timeout: Duration,
}

impl CliRunner {
    pub fn new(executor: CommandExecutor, program: impl Into<String>) -> Self {
        let timeout = executor.config().timeout();
        Self {
            executor,
            program: program.into(),
            timeout,
        }
    }

    /// Override the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one CLI subcommand.
    ///
    /// Timeouts are retried exactly once. Other failures come back as-is
    /// after being logged; environment errors are never retried.
    pub async fn run<S: AsRef<str>>(&self, cmd: &str, args: &[S]) -> Result<CliRun, ExecutorError> {
        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 1);
        argv.push(cmd);
        argv.extend(args.iter().map(AsRef::as_ref));

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(program = %self.program, cmd = %cmd, attempt = attempts, "running cli command");

            let result = self
                .executor
                .execute(&self.program, &argv, self.timeout)
                .await?;

            match result.class().retry_policy() {
                RetryPolicy::None => {}
                RetryPolicy::Once if attempts < MAX_TIMEOUT_ATTEMPTS => {
                    warn!(
                        program = %self.program,
                        cmd = %cmd,
                        attempt = attempts,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "cli command timed out, retrying"
                    );
                    continue;
                }
                RetryPolicy::Once | RetryPolicy::Never => {
                    warn!(
                        program = %self.program,
                        cmd = %cmd,
                        exit_code = result.exit_code,
                        stderr = %result.stderr,
                        attempts = attempts,
                        "cli command failed"
                    );
                }
                RetryPolicy::Escalate => {
                    error!(
                        program = %self.program,
                        cmd = %cmd,
                        exit_code = result.exit_code,
                        stderr = %result.stderr,
                        "cli command unavailable, not retrying"
                    );
                }
            }

            return Ok(CliRun { result, attempts });
        }
    }
}
