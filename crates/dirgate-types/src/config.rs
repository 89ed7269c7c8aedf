//! Configuration schema for the set of allowed directories.
//!
//! A [`GatewayConfig`] is an ordered list of [`DirectoryConfig`] entries.
//! Order is significant: it is the lookup priority for reads and the
//! fallback order for writes.
//!
//! ```json
//! {
//!   "directories": [
//!     { "path": "/srv/shared", "mode": "read_only" },
//!     { "path": "/srv/inbox", "mode": "read_write" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Permission granted to a configured directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Reads, listings, and stats only.
    #[default]
    ReadOnly,
    /// Everything a read-only directory allows, plus writes.
    ReadWrite,
}

impl AccessMode {
    /// Whether write operations may target a directory with this mode.
    pub fn allows_write(self) -> bool {
        matches!(self, Self::ReadWrite)
    }

    /// Short label used in diagnostics (`ro` / `rw`).
    pub fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "ro",
            Self::ReadWrite => "rw",
        }
    }
}

/// One allowed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory path; relative paths resolve against the working directory.
    pub path: PathBuf,

    /// Access level for this directory.
    #[serde(default)]
    pub mode: AccessMode,
}

impl DirectoryConfig {
    /// A read-only directory entry.
    pub fn read_only(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: AccessMode::ReadOnly,
        }
    }

    /// A read-write directory entry.
    pub fn read_write(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: AccessMode::ReadWrite,
        }
    }
}

/// The full set of allowed directories, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Allowed directories. Empty means filesystem access is disabled.
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
}

impl GatewayConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GatewayError::Config {
            reason: e.to_string(),
        })
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GatewayError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            GatewayError::Config { reason } => GatewayError::Config {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Append a directory, keeping existing entries ahead of it.
    pub fn push(&mut self, dir: DirectoryConfig) {
        self.directories.push(dir);
    }

    /// `true` if no directories are configured.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&AccessMode::ReadWrite).unwrap(),
            "\"read_write\""
        );
        let mode: AccessMode = serde_json::from_str("\"read_only\"").unwrap();
        assert_eq!(mode, AccessMode::ReadOnly);
    }

    #[test]
    fn access_mode_write_permission() {
        assert!(AccessMode::ReadWrite.allows_write());
        assert!(!AccessMode::ReadOnly.allows_write());
        assert_eq!(AccessMode::ReadOnly.label(), "ro");
    }

    #[test]
    fn mode_defaults_to_read_only() {
        let cfg = GatewayConfig::from_json_str(r#"{"directories":[{"path":"/srv/a"}]}"#).unwrap();
        assert_eq!(cfg.directories[0].mode, AccessMode::ReadOnly);
    }

    #[test]
    fn directory_order_is_preserved() {
        let cfg = GatewayConfig::from_json_str(
            r#"{"directories":[
                {"path":"/b","mode":"read_write"},
                {"path":"/a","mode":"read_only"},
                {"path":"/c","mode":"read_write"}
            ]}"#,
        )
        .unwrap();
        let paths: Vec<_> = cfg.directories.iter().map(|d| d.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/b"), PathBuf::from("/a"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn empty_object_is_disabled_config() {
        let cfg = GatewayConfig::from_json_str("{}").unwrap();
        assert!(cfg.is_empty());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = GatewayConfig::from_json_str("{ directories: ").unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = GatewayConfig::from_json_str(
            r#"{"directories":[{"path":"/a","mode":"execute"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn load_missing_file_names_path() {
        let path = std::env::temp_dir().join("dirgate_no_such_config_file.json");
        let err = GatewayConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("dirgate_no_such_config_file.json"));
    }
}
