use std::path::PathBuf;

use serde::Deserialize;

/// Launcher settings, read from `launcher.toml` in the working directory.
/// Every field is optional; a missing file or field falls back to the
/// defaults the backend has always used.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LauncherConfig {
    pub server_dir: Option<String>,
    pub port: Option<u16>,
    pub package_manager: Option<String>,
}

impl LauncherConfig {
    pub fn load() -> anyhow::Result<Self> {
        let s = std::fs::read_to_string("launcher.toml").unwrap_or_default();
        Ok(toml::from_str(&s).unwrap_or_default())
    }

    /// Directory holding the backend's `package.json`.
    pub fn server_dir(&self) -> PathBuf {
        PathBuf::from(self.server_dir.as_deref().unwrap_or("server"))
    }

    /// Port the banner advertises; the dev server binds it itself.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8000)
    }

    /// `Command` does not resolve .cmd shims, so npm is `npm.cmd` on Windows.
    pub fn package_manager(&self) -> String {
        match &self.package_manager {
            Some(pm) => pm.clone(),
            None if cfg!(target_os = "windows") => "npm.cmd".to_string(),
            None => "npm".to_string(),
        }
    }
}
