//! The filesystem gateway: ordered fallback across allowed directories.
//!
//! A [`FilesystemGateway`] owns an ordered list of [`DirectoryCapability`]
//! values fixed at construction. Every operation walks that list in order,
//! skipping read-only capabilities for writes, and returns the first
//! success together with the root that served it. If no capability
//! succeeds the last per-directory error is reported as
//! [`GatewayError::ResolutionFailed`].
//!
//! The list never changes after construction, so a gateway can be shared
//! across threads behind an `Arc` without locking. All calls block on disk
//! I/O; async callers should run them on a blocking pool.

use std::io;
use std::path::{Path, PathBuf};

use dirgate_types::{DirectoryConfig, GatewayConfig, GatewayError, Result};
use tracing::{debug, info, warn};

use crate::capability::{DirectoryCapability, DirectoryEntry, FileStat, FileStream};

/// An operation result plus the root directory that produced it.
#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    /// Canonical path of the serving directory.
    pub root: PathBuf,
}

impl<T> Resolved<T> {
    pub fn into_inner(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Immutable, ordered set of allowed directories.
#[derive(Debug, Default)]
pub struct FilesystemGateway {
    directories: Vec<DirectoryCapability>,
}

impl FilesystemGateway {
    /// Open every configured directory, in order.
    ///
    /// Construction is all-or-nothing: if any directory fails to open, the
    /// handles already opened by this call are released before the error is
    /// returned.
    pub fn open(configs: &[DirectoryConfig]) -> Result<Self> {
        let mut directories = Vec::with_capacity(configs.len());
        for config in configs {
            match DirectoryCapability::open(config) {
                Ok(cap) => directories.push(cap),
                Err(e) => {
                    warn!(
                        path = %config.path.display(),
                        released = directories.len(),
                        error = %e,
                        "allowed directory failed to open, rolling back"
                    );
                    drop(directories);
                    return Err(e);
                }
            }
        }

        if directories.is_empty() {
            info!("no allowed directories configured, filesystem access disabled");
        } else {
            info!(directories = directories.len(), "filesystem gateway ready");
        }
        Ok(Self { directories })
    }

    /// Build a gateway from a parsed configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::open(&config.directories)
    }

    /// A gateway with no directories; every operation fails with
    /// [`GatewayError::NotEnabled`].
    pub fn disabled() -> Self {
        Self::default()
    }

    /// `true` iff at least one directory is configured.
    pub fn is_enabled(&self) -> bool {
        !self.directories.is_empty()
    }

    /// Capabilities in priority order.
    pub fn directories(&self) -> impl Iterator<Item = &DirectoryCapability> {
        self.directories.iter()
    }

    /// Read a whole file.
    pub fn read_file(&self, path: &str) -> Result<Resolved<Vec<u8>>> {
        const OP: &str = "read_file";
        let rel = self.target(OP, path)?;
        self.resolve(OP, path, Access::Read, |cap| cap.read(rel))
    }

    /// Open a file for streaming reads. The caller owns the returned stream
    /// and releases it by dropping it.
    pub fn open_stream(&self, path: &str) -> Result<Resolved<FileStream>> {
        const OP: &str = "open_stream";
        let rel = self.target(OP, path)?;
        self.resolve(OP, path, Access::Read, |cap| cap.open_stream(rel))
    }

    /// Create or overwrite a file in the first read-write directory that
    /// accepts the path. Parent directories are not created.
    pub fn write_file(&self, path: &str, contents: &[u8]) -> Result<Resolved<()>> {
        const OP: &str = "write_file";
        let rel = self.target(OP, path)?;
        debug!(path, bytes = contents.len(), "writing file");
        self.resolve(OP, path, Access::Write, |cap| cap.write(rel, contents))
    }

    /// Size, kind, and modification time of a file or directory.
    pub fn stat(&self, path: &str) -> Result<Resolved<FileStat>> {
        const OP: &str = "stat";
        let rel = self.target(OP, path)?;
        self.resolve(OP, path, Access::Read, |cap| cap.stat(rel))
    }

    /// List one directory level. An empty path lists the root.
    pub fn list_directory(&self, path: &str) -> Result<Resolved<Vec<DirectoryEntry>>> {
        const OP: &str = "list_directory";
        self.ensure_enabled()?;
        let rel = Path::new(path);
        self.resolve(OP, path, Access::Read, |cap| cap.list(rel))
    }

    /// Release every directory handle.
    ///
    /// Must only be called once no operation is still in flight.
    pub fn close(self) {
        info!(directories = self.directories.len(), "closing filesystem gateway");
        drop(self.directories);
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(GatewayError::NotEnabled)
        }
    }

    /// Enabled check plus non-empty target path.
    fn target<'p>(&self, operation: &'static str, path: &'p str) -> Result<&'p Path> {
        self.ensure_enabled()?;
        if path.is_empty() {
            return Err(GatewayError::InvalidArgument {
                operation,
                reason: "path must not be empty".into(),
            });
        }
        Ok(Path::new(path))
    }

    fn resolve<T>(
        &self,
        operation: &'static str,
        path: &str,
        access: Access,
        mut attempt: impl FnMut(&DirectoryCapability) -> io::Result<T>,
    ) -> Result<Resolved<T>> {
        let mut last_error = None;

        for cap in &self.directories {
            if access == Access::Write && !cap.mode().allows_write() {
                debug!(operation, root = %cap.root().display(), "skipping read-only directory");
                continue;
            }
            match attempt(cap) {
                Ok(value) => {
                    debug!(operation, path, root = %cap.root().display(), "resolved");
                    return Ok(Resolved {
                        value,
                        root: cap.root().to_path_buf(),
                    });
                }
                Err(e) => {
                    debug!(
                        operation,
                        path,
                        root = %cap.root().display(),
                        error = %e,
                        "attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let source = last_error.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                "every configured directory is read-only",
            )
        });
        Err(GatewayError::ResolutionFailed {
            operation,
            path: path.to_string(),
            source,
        })
    }
}
