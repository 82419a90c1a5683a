//! Subprocess execution for admin jobs.
//!
//! [`run_command`] spawns a prepared [`Command`], captures stdout/stderr, and
//! enforces the configured timeout. [`SubprocessExecutor`] is the production
//! [`ScriptExecutor`], running each job's argv directly.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::executor::{ScriptError, ScriptExecutor, ScriptInput, ScriptOutput};
use super::registry::ScriptJob;

/// Maximum stdout or stderr size read per stream (10 MiB).
///
/// Persisted logs are truncated much further; this only bounds memory.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Spawn `cmd`, capture stdout/stderr, and enforce the input's timeout.
///
/// The caller sets the program and arguments. Environment variables and the
/// working directory from [`ScriptInput`] are applied here. Stdin is closed.
pub async fn run_command(
    cmd: &mut Command,
    input: &ScriptInput,
) -> Result<ScriptOutput, ScriptError> {
    // `kill_on_drop(true)` kills the child when it is dropped on timeout.
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    for (key, value) in &input.env_vars {
        cmd.env(key, value);
    }

    if let Some(dir) = &input.working_directory {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(ScriptError::Spawn)?;

    // Read the pipes in spawned tasks so `child.wait()` can borrow `&mut child`.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
    let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

    match tokio::time::timeout(input.timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout_bytes = stdout_task.await.unwrap_or_default();
            let stderr_bytes = stderr_task.await.unwrap_or_default();

            Ok(ScriptOutput {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code().unwrap_or(-1),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(e)) => Err(ScriptError::Io(e)),
        Err(_elapsed) => {
            stdout_task.abort();
            stderr_task.abort();
            Err(ScriptError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

/// Runs a job's argv as a child process.
#[derive(Debug, Clone, Default)]
pub struct SubprocessExecutor;

impl ScriptExecutor for SubprocessExecutor {
    async fn execute(&self, job: &ScriptJob, input: ScriptInput) -> Result<ScriptOutput, ScriptError> {
        let (program, args) = job
            .argv
            .split_first()
            .ok_or_else(|| ScriptError::EmptyCommand(job.name.clone()))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        run_command(&mut cmd, &input).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::scripting::registry::JobClass;

    fn input(timeout: Duration) -> ScriptInput {
        ScriptInput {
            env_vars: vec![],
            working_directory: None,
            timeout,
        }
    }

    fn sh(script: &str) -> ScriptJob {
        ScriptJob {
            name: "test".into(),
            class: JobClass::Light,
            argv: vec!["sh".into(), "-c".into(), script.into()],
        }
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let out = SubprocessExecutor
            .execute(&sh("echo hello"), input(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.succeeded());
    }

    #[tokio::test]
    async fn captures_stderr_and_failure_code() {
        let out = SubprocessExecutor
            .execute(&sh("echo oops >&2; exit 3"), input(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(out.stderr.trim(), "oops");
        assert_eq!(out.exit_code, 3);
    }

    #[tokio::test]
    async fn env_vars_and_working_directory_apply() {
        let dir = tempfile::tempdir().unwrap();
        let mut with_env = input(Duration::from_secs(5));
        with_env.env_vars = vec![("OTT_REGION".into(), "IN".into())];
        with_env.working_directory = Some(dir.path().to_string_lossy().into_owned());

        let out = SubprocessExecutor
            .execute(&sh("echo $OTT_REGION; pwd"), with_env)
            .await
            .unwrap();
        let lines: Vec<&str> = out.stdout.lines().collect();
        assert_eq!(lines[0], "IN");
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(std::path::Path::new(lines[1]).canonicalize().unwrap(), expected);
    }

    #[tokio::test]
    async fn timeout_kills_the_process() {
        let result = SubprocessExecutor
            .execute(&sh("sleep 10"), input(Duration::from_millis(200)))
            .await;
        assert_matches!(result, Err(ScriptError::Timeout { elapsed_ms }) if elapsed_ms < 5000);
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let job = ScriptJob {
            name: "ghost".into(),
            class: JobClass::Light,
            argv: vec!["/definitely/not/a/binary".into()],
        };
        let result = SubprocessExecutor.execute(&job, input(Duration::from_secs(1))).await;
        assert_matches!(result, Err(ScriptError::Spawn(_)));
    }

    #[tokio::test]
    async fn empty_argv_is_rejected() {
        let job = ScriptJob {
            name: "empty".into(),
            class: JobClass::Light,
            argv: vec![],
        };
        let result = SubprocessExecutor.execute(&job, input(Duration::from_secs(1))).await;
        assert_matches!(result, Err(ScriptError::EmptyCommand(name)) if name == "empty");
    }
}
