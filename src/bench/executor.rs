//! Single-run execution
//!
//! Spawns one candidate against one input, waits for it under a
//! wall-clock deadline and captures both output streams in full.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::models::{Candidate, RunOutcome};
use crate::ExecutionFailure;

/// The AWK program handed to a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Program read from a file (`-f <file>`)
    File(PathBuf),
    /// Program text passed directly on the command line
    Inline(String),
}

impl Program {
    /// Identifier used in results: the file name, or the inline source
    pub fn id(&self) -> String {
        match self {
            Program::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Program::Inline(source) => source.clone(),
        }
    }

    /// Arguments that follow the candidate's own extra arguments
    pub fn invocation_args(&self, input: &Path) -> Vec<std::ffi::OsString> {
        match self {
            Program::File(path) => vec![
                "-f".into(),
                path.as_os_str().to_os_string(),
                input.as_os_str().to_os_string(),
            ],
            Program::Inline(source) => vec![source.into(), input.as_os_str().to_os_string()],
        }
    }
}

/// Runs a candidate once
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run_once(
        &self,
        candidate: &Candidate,
        program: &Program,
        input: &Path,
        timeout: Duration,
    ) -> RunOutcome;
}

/// Executor backed by real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn command(candidate: &Candidate, program: &Program, input: &Path) -> Command {
        let mut cmd = Command::new(&candidate.command);
        cmd.args(&candidate.args)
            .args(program.invocation_args(input))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Executor for ProcessExecutor {
    async fn run_once(
        &self,
        candidate: &Candidate,
        program: &Program,
        input: &Path,
        timeout: Duration,
    ) -> RunOutcome {
        let mut cmd = Self::command(candidate, program, input);

        let start = Instant::now();
        let (result, elapsed) = match cmd.spawn() {
            Ok(child) => wait_with_deadline(child, timeout, start).await,
            Err(source) => (Err(ExecutionFailure::Spawn { source }), start.elapsed()),
        };

        debug!(
            awk = %candidate.name,
            program = %program.id(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            ok = result.is_ok(),
            "run finished"
        );

        let (output, failure) = match result {
            Ok(output) => (output, None),
            Err(failure) => (String::new(), Some(failure)),
        };
        RunOutcome {
            candidate: candidate.name.clone(),
            program: program.id(),
            elapsed,
            output,
            failure,
        }
    }
}

/// Wait for the child while draining both pipes; kill it once the
/// deadline passes. Elapsed time stops when the process exits or the
/// deadline fires, before any teardown.
async fn wait_with_deadline(
    mut child: Child,
    timeout: Duration,
    start: Instant,
) -> (Result<String, ExecutionFailure>, Duration) {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let run = async {
        let (status, out, err) = tokio::join!(child.wait(), drain(stdout), drain(stderr));
        (status, out, err)
    };

    let finished = tokio::time::timeout(timeout, run).await;
    let elapsed = start.elapsed();
    match finished {
        Ok((status, out, err)) => (collect(status, out, err), elapsed),
        Err(_) => {
            // kill_on_drop covers the case where the kill itself fails
            let _ = child.kill().await;
            (Err(ExecutionFailure::TimedOut { timeout }), elapsed)
        }
    }
}

fn collect(
    status: std::io::Result<ExitStatus>,
    out: std::io::Result<Vec<u8>>,
    err: std::io::Result<Vec<u8>>,
) -> Result<String, ExecutionFailure> {
    let stderr = err
        .as_deref()
        .map(|bytes| String::from_utf8_lossy(bytes).trim_end().to_string())
        .unwrap_or_default();
    let status = status.map_err(|source| ExecutionFailure::Output {
        source,
        stderr: stderr.clone(),
    })?;
    let out = out.map_err(|source| ExecutionFailure::Output {
        source,
        stderr: stderr.clone(),
    })?;
    check_status(status, stderr)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

async fn drain<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

fn check_status(status: ExitStatus, stderr: String) -> Result<(), ExecutionFailure> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionFailure::NonZeroExit {
            code: status.code(),
            stderr,
        })
    }
}
