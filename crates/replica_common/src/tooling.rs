//! Process plumbing shared by the executor gateway and the prober.
//!
//! Tool discovery on PATH, and bounded subprocess runs that keep whatever
//! output was captured when the time limit hits.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long readers get to drain pipes after the process is gone
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Locate a program on PATH (or verify an explicit path)
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Programs from `programs` that cannot be found
pub fn missing_tools(programs: &[&str]) -> Vec<String> {
    programs
        .iter()
        .filter(|p| locate(p).is_none())
        .map(|p| p.to_string())
        .collect()
}

/// Result of [`run_bounded`]
#[derive(Debug)]
pub enum RunOutcome {
    Completed {
        /// `None` when terminated by a signal
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        partial_stdout: String,
    },
    SpawnFailed(io::Error),
}

type Buffer = Arc<Mutex<Vec<u8>>>;

async fn drain<R: AsyncRead + Unpin>(mut pipe: R, buf: Buffer) -> io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(&chunk[..n]);
    }
}

fn spawn_reader<R>(pipe: Option<R>, buf: &Buffer) -> Option<JoinHandle<io::Result<()>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|p| tokio::spawn(drain(p, buf.clone())))
}

async fn finish_reader(task: Option<JoinHandle<io::Result<()>>>) {
    if let Some(mut task) = task {
        if tokio::time::timeout(DRAIN_GRACE, &mut task).await.is_err() {
            task.abort();
        }
    }
}

fn take_text(buf: &Buffer) -> String {
    let bytes = std::mem::take(&mut *buf.lock().unwrap_or_else(|e| e.into_inner()));
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Run `command` with piped output and a hard time limit.
///
/// The child runs in its own process group. The whole group is killed when
/// the leader exits or the limit hits, so helpers started by a script do not
/// outlive it.
pub async fn run_bounded(mut command: Command, limit: Duration) -> RunOutcome {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return RunOutcome::SpawnFailed(e),
    };
    let pid = child.id();
    debug!("Spawned pid {:?} with limit {}s", pid, limit.as_secs());

    let stdout_buf: Buffer = Arc::default();
    let stderr_buf: Buffer = Arc::default();
    let stdout_task = spawn_reader(child.stdout.take(), &stdout_buf);
    let stderr_task = spawn_reader(child.stderr.take(), &stderr_buf);

    match tokio::time::timeout(limit, child.wait()).await {
        Ok(Ok(status)) => {
            // Leftover background helpers go with the leader
            kill_group(pid);
            finish_reader(stdout_task).await;
            finish_reader(stderr_task).await;
            RunOutcome::Completed {
                code: status.code(),
                stdout: take_text(&stdout_buf),
                stderr: take_text(&stderr_buf),
            }
        }
        Ok(Err(e)) => {
            warn!("Waiting on pid {:?} failed: {}", pid, e);
            RunOutcome::SpawnFailed(e)
        }
        Err(_) => {
            warn!("pid {:?} exceeded {}s, killing", pid, limit.as_secs());
            kill_group(pid);
            if let Err(e) = child.kill().await {
                debug!("kill after timeout: {}", e);
            }
            finish_reader(stdout_task).await;
            finish_reader(stderr_task).await;
            RunOutcome::TimedOut {
                partial_stdout: take_text(&stdout_buf),
            }
        }
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = pid {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!("killpg {}: {}", pid, e);
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}
