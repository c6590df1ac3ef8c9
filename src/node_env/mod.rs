//! Node.js runtime detection for the launcher.
//!
//! The backend is a Node.js app; anything older than Node 16 cannot run its
//! toolchain, so the launcher refuses to continue without it.

use anyhow::Result;

use crate::runner::ProcessRunner;

/// Minimum Node.js major version the backend supports.
pub const MIN_NODE_MAJOR: u32 = 16;

/// A detected Node.js runtime, e.g. `v18.2.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeVersion {
    /// Verbatim `node --version` output, trimmed (keeps the leading `v`).
    pub raw: String,
    pub major: u32,
    pub minor: u32,
}

impl NodeVersion {
    pub fn meets_minimum(&self) -> bool {
        self.major >= MIN_NODE_MAJOR
    }
}

/// Probe the system for a Node.js runtime and report its version.
pub async fn detect<R: ProcessRunner>(runner: &R) -> Result<NodeVersion> {
    let candidates = if cfg!(target_os = "windows") {
        vec!["node", "node.exe"]
    } else {
        vec!["node", "nodejs"]
    };

    for cmd_name in candidates {
        if let Ok(out) = runner.capture(cmd_name, &["--version"]).await {
            if let Some((major, minor)) = parse_node_version(&out) {
                tracing::debug!("found Node.js via '{}': {}", cmd_name, out.trim());
                return Ok(NodeVersion {
                    raw: out.trim().to_string(),
                    major,
                    minor,
                });
            }
        }
    }

    Err(anyhow::anyhow!(
        "Node.js not found on PATH; install Node.js {} or newer",
        MIN_NODE_MAJOR
    ))
}

/// "v22.14.0" → (22, 14)
fn parse_node_version(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let ver_part = s.strip_prefix('v').unwrap_or(s);
    let parts: Vec<&str> = ver_part.split('.').collect();
    if parts.len() >= 2 {
        let major = parts[0].trim().parse().ok()?;
        let minor = parts[1].trim().parse().ok()?;
        Some((major, minor))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_version() {
        assert_eq!(parse_node_version("v18.2.0"), Some((18, 2)));
        assert_eq!(parse_node_version("v16.20.2"), Some((16, 20)));
        assert_eq!(parse_node_version("v14.0.0"), Some((14, 0)));
        assert_eq!(parse_node_version("  v20.11.1  "), Some((20, 11)));
        assert_eq!(parse_node_version("garbage"), None);
        assert_eq!(parse_node_version(""), None);
    }

    #[test]
    fn test_minimum_version_gate() {
        let old = NodeVersion { raw: "v14.0.0".into(), major: 14, minor: 0 };
        let exact = NodeVersion { raw: "v16.0.0".into(), major: 16, minor: 0 };
        let new = NodeVersion { raw: "v18.2.0".into(), major: 18, minor: 2 };
        assert!(!old.meets_minimum());
        assert!(exact.meets_minimum());
        assert!(new.meets_minimum());
    }
}
