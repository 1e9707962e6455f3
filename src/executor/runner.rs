// Command executor implementation

use crate::executor::config::ExecutorConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::parse::{parse_stdout, truncate_utf8};
use crate::executor::types::CommandResult;
use std::ffi::OsStr;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs one external command per call, exec-style, with a bounded wait.
///
/// Holds no per-call state, so a single executor can serve any number of
/// concurrent `execute` calls.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor {
    config: ExecutorConfig,
}

impl CommandExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        debug!(
            timeout_secs = config.timeout_secs,
            max_output_bytes = config.max_output_bytes,
            working_dir = ?config.working_dir,
            "initializing command executor"
        );
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `command` with `args` and wait at most `limit`.
    ///
    /// The command runs in its own process group. Once the command exits,
    /// or the limit expires, the whole group is killed so nothing it forked
    /// outlives the call. On expiry the child is reaped before this returns
    /// and the result carries exit code -1 with stderr `"timeout"`.
    pub async fn execute<S: AsRef<OsStr>>(
        &self,
        command: &str,
        args: &[S],
        limit: Duration,
    ) -> Result<CommandResult> {
        let start = Instant::now();

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        debug!(
            command = %command,
            arg_count = args.len(),
            timeout_ms = limit.as_millis() as u64,
            "spawning command"
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecutorError::from_spawn(command, e))?;
        let mut group = GroupGuard::new(child.id());

        let max = self.config.max_output_bytes;
        let mut stdout_task = tokio::spawn(read_capped(child.stdout.take(), max));
        let mut stderr_task = tokio::spawn(read_capped(child.stderr.take(), max));

        let outcome = timeout(limit, async {
            let status = child.wait().await;
            // stragglers would otherwise keep the pipes open
            group.kill();
            let out = join_capture(&mut stdout_task).await;
            let err = join_capture(&mut stderr_task).await;
            (status, out, err)
        })
        .await;

        let (status, stdout, stderr) = match outcome {
            Ok((status, out, err)) => {
                let wait_err =
                    |e: std::io::Error| ExecutorError::WaitFailed(command.to_string(), e.to_string());
                (
                    status.map_err(wait_err)?,
                    out.map_err(wait_err)?,
                    err.map_err(wait_err)?,
                )
            }
            Err(_) => {
                group.kill();
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    warn!(command = %command, error = %e, "failed to kill timed out command");
                }
                stdout_task.abort();
                stderr_task.abort();
                warn!(
                    command = %command,
                    timeout_ms = limit.as_millis() as u64,
                    "command timed out and was killed"
                );
                return Ok(CommandResult::timed_out());
            }
        };

        let exit_code = status_code(status);
        let stdout_text = self.decode(command, "stdout", &stdout);
        let stderr_text = self.decode(command, "stderr", &stderr);

        let result = CommandResult {
            exit_code,
            stdout: parse_stdout(&stdout_text),
            stderr: stderr_text.trim().to_string(),
        };

        info!(
            command = %command,
            duration_ms = start.elapsed().as_millis() as u64,
            exit_code = exit_code,
            stdout_bytes = stdout.total,
            stderr_bytes = stderr.total,
            parsed_json = result.stdout.as_json().is_some(),
            "command executed"
        );

        Ok(result)
    }

    fn decode(&self, command: &str, stream: &str, captured: &Captured) -> String {
        let mut text = String::from_utf8_lossy(&captured.bytes).into_owned();
        // lossy decoding can grow the text past the cap again
        let truncated = truncate_utf8(&mut text, self.config.max_output_bytes);
        if truncated || captured.total > captured.bytes.len() {
            warn!(
                command = %command,
                stream = stream,
                total_bytes = captured.total,
                max_output_bytes = self.config.max_output_bytes,
                "captured output truncated"
            );
        }
        text
    }
}

/// Bytes kept from one output stream
#[derive(Debug, Default)]
struct Captured {
    /// At most `max_output_bytes` leading bytes
    bytes: Vec<u8>,
    /// Everything the stream produced, kept or not
    total: usize,
}

/// Drain `stream` to EOF, keeping only the first `max` bytes in memory
async fn read_capped<R: AsyncRead + Unpin>(stream: Option<R>, max: usize) -> std::io::Result<Captured> {
    let mut captured = Captured::default();
    let Some(mut stream) = stream else {
        return Ok(captured);
    };

    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.total += n;
        let room = max.saturating_sub(captured.bytes.len());
        captured.bytes.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok(captured)
}

async fn join_capture(task: &mut JoinHandle<std::io::Result<Captured>>) -> std::io::Result<Captured> {
    match task.await {
        Ok(captured) => captured,
        Err(e) => Err(std::io::Error::other(e)),
    }
}

/// Kills the command's process group, at the latest when dropped
struct GroupGuard {
    pgid: Option<u32>,
}

impl GroupGuard {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    /// Signal the group once; later calls are no-ops
    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_process_group(pgid);
        }
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: kill(2) takes no pointers; a negative pid addresses the group
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        // ESRCH: every member has already exited
        debug!(pgid = pgid, error = %std::io::Error::last_os_error(), "process group not signalled");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

/// Exit code of a finished process; signal deaths map to 128 + signal
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    128
}
