//! Launcher error taxonomy. Every failure here is terminal for the run;
//! the binary maps them all to exit status 1. There are no retries.

use std::path::PathBuf;

use super::state_machine::TransitionError;

#[derive(thiserror::Error, Debug)]
pub enum LauncherError {
    #[error("Node.js 16+ is required (found {found})")]
    NodeTooOld { found: String },

    #[error("server directory not found: {}", .0.display())]
    ServerDirMissing(PathBuf),

    #[error("server package.json not found: {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("npm install failed with code {code}")]
    InstallFailed { code: i32 },

    #[error(transparent)]
    Phase(#[from] TransitionError),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}
