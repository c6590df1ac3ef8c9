//! Narrow process-spawning capability behind the launcher.
//!
//! External commands (the Node.js probe, `npm install`, `npm run dev`) are
//! reached only through [`ProcessRunner`], so tests can substitute a fake
//! and never start a real process.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::utils::apply_creation_flags;

pub trait ProcessRunner: Clone + Send + Sync + 'static {
    type Child: ChildHandle;

    /// Run a short probe command and capture its stdout.
    fn capture(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Run a command to completion with inherited stdio. Returns the exit
    /// code; -1 when the process was terminated by a signal.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> impl Future<Output = Result<i32>> + Send;

    /// Spawn a long-running command with inherited stdio.
    fn spawn(&self, program: &str, args: &[&str], cwd: &Path) -> Result<Self::Child>;

    /// Deliver the platform interrupt (Ctrl+C equivalent) to a process.
    fn interrupt(&self, pid: u32) -> Result<()>;
}

pub trait ChildHandle: Send + 'static {
    fn id(&self) -> Option<u32>;

    /// Wait for the child to close. `None` when it reports no exit code
    /// (killed by a signal).
    fn wait(&mut self) -> impl Future<Output = Result<Option<i32>>> + Send;
}

/// The real runner over `tokio::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    type Child = ServerChild;

    async fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        apply_creation_flags(&mut cmd);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to execute '{}'", program))?;
        if !output.status.success() {
            anyhow::bail!("'{}' exited with {}", program, output.status);
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<i32> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);
        apply_creation_flags(&mut cmd);

        let status = cmd
            .status()
            .await
            .with_context(|| format!("failed to run '{}' in {}", program, cwd.display()))?;
        Ok(status.code().unwrap_or(-1))
    }

    fn spawn(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ServerChild> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // The server must outlive a dropped handle; the launcher decides
            // when to signal it.
            .kill_on_drop(false);
        apply_creation_flags(&mut cmd);

        let inner = cmd
            .spawn()
            .with_context(|| format!("failed to spawn '{}' in {}", program, cwd.display()))?;
        Ok(ServerChild { inner })
    }

    fn interrupt(&self, pid: u32) -> Result<()> {
        interrupt_pid(pid)
    }
}

/// Handle to the spawned dev server.
pub struct ServerChild {
    inner: Child,
}

impl ChildHandle for ServerChild {
    fn id(&self) -> Option<u32> {
        self.inner.id()
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        let status = self.inner.wait().await.context("failed to wait for child")?;
        Ok(status.code())
    }
}

#[cfg(unix)]
fn interrupt_pid(pid: u32) -> Result<()> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    signal::kill(Pid::from_raw(pid as i32), Signal::SIGINT)
        .with_context(|| format!("failed to send SIGINT to PID {}", pid))
}

#[cfg(not(unix))]
fn interrupt_pid(pid: u32) -> Result<()> {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x08000000;

    // Windows has no cross-process Ctrl+C; taskkill is the closest stop
    // signal we can deliver to a detached child.
    std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .with_context(|| format!("failed to taskkill PID {}", pid))?;
    Ok(())
}
