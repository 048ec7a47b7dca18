//! Subprocess execution with a hard kill deadline.
//!
//! Every external command the scanner/probes/monitors invoke (`nmap`,
//! `arp-scan`, `snmpwalk`, `avahi-resolve`, `avahi-browse`, `speedtest-cli`,
//! `getent`) goes through this single helper so the timeout/escalation
//! contract in §9 is enforced in one place instead of ad hoc per call site.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program args...` with a hard deadline. On timeout, SIGTERM the
/// child, wait 0.5s, then SIGKILL if it's still alive. Returns `None` if the
/// program is missing from PATH (Dependency) or the deadline was hit with no
/// output recovered.
pub async fn run_with_timeout(
    program: &str,
    args: &[&str],
    deadline: Duration,
) -> Option<CommandOutput> {
    let mut child = match Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(c) => c,
        Err(_) => return None,
    };

    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let wait_fut = async {
        let mut stdout = String::new();
        let mut stderr = String::new();
        if let Some(mut p) = stdout_pipe.take() {
            let _ = p.read_to_string(&mut stdout).await;
        }
        if let Some(mut p) = stderr_pipe.take() {
            let _ = p.read_to_string(&mut stderr).await;
        }
        let status = child.wait().await;
        (status, stdout, stderr)
    };

    match timeout(deadline, wait_fut).await {
        Ok((status, stdout, stderr)) => {
            let status_success = status.map(|s| s.success()).unwrap_or(false);
            Some(CommandOutput {
                status_success,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            // Deadline hit: the wait_fut future above is dropped here, so
            // `child` is ours again. SIGTERM first, give it 0.5s to exit,
            // then SIGKILL if it's still alive.
            terminate_then_kill(&mut child).await;
            None
        }
    }
}

/// SIGTERM, wait up to 500ms, SIGKILL if still running.
async fn terminate_then_kill(child: &mut tokio::process::Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        unsafe {
            libc::kill(pid as libc::pid_t, libc::SIGTERM);
        }
    }

    if timeout(Duration::from_millis(500), child.wait()).await.is_err() {
        let _ = child.start_kill();
        let _ = child.wait().await;
    }
}

/// Check whether `program` is reachable via PATH, without running it for
/// real work (used to log a clear Dependency message once at startup).
pub async fn is_available(program: &str) -> bool {
    Command::new(program)
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_a_simple_command() {
        let out = run_with_timeout("echo", &["hello"], Duration::from_secs(2))
            .await
            .expect("echo should run");
        assert!(out.status_success);
        assert!(out.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn missing_program_returns_none() {
        let out = run_with_timeout(
            "definitely-not-a-real-command-xyz",
            &[],
            Duration::from_secs(1),
        )
        .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn timeout_returns_none() {
        let out = run_with_timeout("sleep", &["5"], Duration::from_millis(100)).await;
        assert!(out.is_none());
    }
}
