//! Backend startup orchestration.
//!
//! The launcher runs three steps in order: Node.js version gate,
//! `npm install` in the server directory, then `npm run dev` as a
//! long-running child. Ctrl+C is forwarded to the child and ends the
//! launcher with status 0. If the child dies on its own, its exit code is
//! logged and the launcher stays resident; only Ctrl+C ends the process.

mod error;
mod state_machine;

pub use error::LauncherError;
pub use state_machine::{Phase, PhaseTracker, TransitionError};

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::config::LauncherConfig;
use crate::node_env;
use crate::runner::{ChildHandle, ProcessRunner};

pub struct Launcher<R: ProcessRunner> {
    config: LauncherConfig,
    runner: R,
    phase: Arc<Mutex<PhaseTracker>>,
    signal_task: Option<JoinHandle<()>>,
    waiter_task: Option<JoinHandle<()>>,
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn new(config: LauncherConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            phase: Arc::new(Mutex::new(PhaseTracker::new())),
            signal_task: None,
            waiter_task: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.phase.lock() {
            Ok(tracker) => tracker.phase.clone(),
            Err(_) => Phase::Failed,
        }
    }

    /// Run the full startup sequence. Any error is terminal for this run.
    pub async fn run(&mut self) -> Result<(), LauncherError> {
        let result = self.startup().await;
        if result.is_err() {
            if let Ok(mut tracker) = self.phase.lock() {
                let _ = tracker.transition(Phase::Failed);
            }
        }
        result
    }

    async fn startup(&mut self) -> Result<(), LauncherError> {
        self.check_node_version().await?;
        self.preflight()?;
        self.install_dependencies().await?;
        self.start_server()?;
        Ok(())
    }

    /// Step 1: the backend requires Node.js 16+. Fails before any install
    /// or spawn side effect can happen.
    pub async fn check_node_version(&mut self) -> Result<(), LauncherError> {
        self.transition(Phase::CheckingVersion)?;
        let version = node_env::detect(&self.runner).await?;
        if !version.meets_minimum() {
            return Err(LauncherError::NodeTooOld { found: version.raw });
        }
        println!("✅ Using Node.js {}", version.raw);
        Ok(())
    }

    /// Step 2: sanity-check the server directory before touching npm.
    pub fn preflight(&self) -> Result<(), LauncherError> {
        let server_dir = self.config.server_dir();
        if !server_dir.is_dir() {
            return Err(LauncherError::ServerDirMissing(server_dir));
        }
        let manifest = server_dir.join("package.json");
        if !manifest.is_file() {
            return Err(LauncherError::ManifestMissing(manifest));
        }
        println!("📁 Server directory found: {}", server_dir.display());
        Ok(())
    }

    /// Step 3: `npm install`, blocking until the install child closes.
    pub async fn install_dependencies(&mut self) -> Result<(), LauncherError> {
        self.transition(Phase::Installing)?;
        println!("📦 Installing Node.js dependencies...");
        let npm = self.config.package_manager();
        let code = self
            .runner
            .run(&npm, &["install"], &self.config.server_dir())
            .await?;
        if code == 0 {
            println!("✅ Dependencies installed successfully");
            Ok(())
        } else {
            println!("❌ Failed to install dependencies");
            Err(LauncherError::InstallFailed { code })
        }
    }

    /// Step 4: spawn `npm run dev` and wire the two exit paths.
    pub fn start_server(&mut self) -> Result<(), LauncherError> {
        let port = self.config.port();
        println!("🚀 Starting Garden Guardian API server...");
        println!("📍 Server will be available at: http://localhost:{}", port);
        println!("📖 API documentation at: http://localhost:{}/api/docs", port);
        println!("🛑 Press Ctrl+C to stop the server\n");

        let npm = self.config.package_manager();
        let child = self
            .runner
            .spawn(&npm, &["run", "dev"], &self.config.server_dir())?;
        let pid = child.id();
        tracing::info!(?pid, "server process spawned");
        self.transition(Phase::Running)?;

        // Child-close listener: informational only. The launcher stays
        // resident after a spontaneous server exit.
        let tracker = self.phase.clone();
        self.waiter_task = Some(tokio::spawn(async move {
            let mut child = child;
            match child.wait().await {
                Ok(Some(code)) => {
                    println!("Server process exited with code {}", code);
                    record_phase(&tracker, Phase::StoppedByChild);
                }
                Ok(None) => {
                    println!("Server process exited without a code");
                    record_phase(&tracker, Phase::StoppedByChild);
                }
                Err(e) => tracing::warn!("failed to wait on server process: {}", e),
            }
        }));

        // Interrupt listener: forward Ctrl+C to the child and leave with
        // status 0, without waiting for the child to close.
        let runner = self.runner.clone();
        let tracker = self.phase.clone();
        self.signal_task = Some(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            record_phase(&tracker, Phase::StoppedByUser);
            handle_interrupt(&runner, pid);
            std::process::exit(0);
        }));

        Ok(())
    }

    /// Park the host after startup. Exit happens in the interrupt listener
    /// (status 0) or before this is ever reached (status 1).
    pub async fn idle(&self) {
        std::future::pending::<()>().await;
    }

    fn transition(&self, to: Phase) -> Result<(), LauncherError> {
        Ok(self.lock_phase()?.transition(to)?)
    }

    fn lock_phase(&self) -> Result<MutexGuard<'_, PhaseTracker>, LauncherError> {
        self.phase.lock().map_err(|e| {
            tracing::error!("phase tracker lock poisoned: {}", e);
            LauncherError::Internal(anyhow::anyhow!("phase tracker lock poisoned"))
        })
    }
}

impl<R: ProcessRunner> Drop for Launcher<R> {
    /// The signal and waiter listeners are scoped to the launcher; dropping
    /// it releases the process-wide subscriptions.
    fn drop(&mut self) {
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }
        if let Some(task) = self.waiter_task.take() {
            task.abort();
        }
    }
}

/// Farewell plus exactly one interrupt to the server child. Signalling an
/// already-exited PID fails quietly.
pub fn handle_interrupt<R: ProcessRunner>(runner: &R, pid: Option<u32>) {
    println!("\n👋 Server stopped");
    if let Some(pid) = pid {
        if let Err(e) = runner.interrupt(pid) {
            tracing::debug!("interrupt not delivered to PID {}: {}", pid, e);
        }
    }
}

fn record_phase(tracker: &Arc<Mutex<PhaseTracker>>, to: Phase) {
    if let Ok(mut guard) = tracker.lock() {
        let _ = guard.transition(to);
    }
}
