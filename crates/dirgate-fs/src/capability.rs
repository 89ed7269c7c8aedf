//! A single allowed directory bound to an OS-level containment handle.
//!
//! The handle is a [`cap_std::fs::Dir`] opened once against the configured
//! directory. Every later path resolution is relative to that handle and
//! performed by `cap-std`, which refuses any resolution that would land
//! outside it: `..` past the root, absolute paths, and symlinks whose
//! targets leave the root all fail with an ordinary I/O error.
//!
//! The canonical path is kept for diagnostics only.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cap_std::fs::{Dir, DirEntry, File, Metadata};
use chrono::{DateTime, Utc};
use dirgate_types::{AccessMode, ConstructionFailure, DirectoryConfig, GatewayError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// File name, lossily converted to UTF-8.
    pub name: String,
    /// Whether the entry is (or links to) a directory.
    pub is_dir: bool,
    /// Size in bytes; zero for directories and for links whose target
    /// cannot be reached.
    pub size: u64,
}

/// Metadata returned by a stat call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStat {
    pub size: u64,
    pub is_dir: bool,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl FileStat {
    fn from_metadata(meta: &Metadata) -> Self {
        Self {
            size: meta.len(),
            is_dir: meta.is_dir(),
            modified: meta
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t.into_std())),
        }
    }
}

/// A readable file opened through a containment handle.
///
/// The descriptor is released when the stream is dropped, so holding it in
/// a scope is enough to guarantee release on every exit path.
#[derive(Debug)]
pub struct FileStream {
    file: File,
}

impl FileStream {
    /// Metadata of the open file (not re-resolved by path).
    pub fn stat(&self) -> io::Result<FileStat> {
        self.file.metadata().map(|m| FileStat::from_metadata(&m))
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

/// An opened allowed directory plus its access mode.
///
/// Once opened the root cannot be retargeted. If the directory is removed
/// or replaced afterwards, operations fail instead of following the new
/// directory at the same path.
#[derive(Debug)]
pub struct DirectoryCapability {
    root: PathBuf,
    mode: AccessMode,
    dir: Dir,
}

impl DirectoryCapability {
    /// Open a containment handle for `config`.
    pub fn open(config: &DirectoryConfig) -> Result<Self> {
        let absolute =
            std::path::absolute(&config.path).map_err(|source| GatewayError::ConstructionFailed {
                path: config.path.clone(),
                failure: ConstructionFailure::InvalidPath,
                source,
            })?;

        let dir = Dir::open_ambient_dir(&absolute, cap_std::ambient_authority()).map_err(
            |source| GatewayError::ConstructionFailed {
                path: config.path.clone(),
                failure: ConstructionFailure::DirectoryUnavailable,
                source,
            },
        )?;

        let root = std::fs::canonicalize(&absolute).unwrap_or(absolute);
        info!(root = %root.display(), mode = config.mode.label(), "opened allowed directory");

        Ok(Self {
            root,
            mode: config.mode,
            dir,
        })
    }

    /// Canonical absolute path of the directory at open time.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub(crate) fn read(&self, rel: &Path) -> io::Result<Vec<u8>> {
        self.dir.read(rel)
    }

    pub(crate) fn open_stream(&self, rel: &Path) -> io::Result<FileStream> {
        let file = self.dir.open(rel)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::new(io::ErrorKind::IsADirectory, "is a directory"));
        }
        Ok(FileStream { file })
    }

    /// Create or truncate `rel` and write `contents`. Read-only capabilities
    /// refuse without touching the filesystem.
    pub(crate) fn write(&self, rel: &Path, contents: &[u8]) -> io::Result<()> {
        if !self.mode.allows_write() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "directory is read-only"));
        }
        self.dir.write(rel, contents)
    }

    pub(crate) fn stat(&self, rel: &Path) -> io::Result<FileStat> {
        self.dir.metadata(rel).map(|m| FileStat::from_metadata(&m))
    }

    /// List one level of `rel`, sorted by name. An empty `rel` lists the root.
    ///
    /// Entries that cannot be read are skipped rather than failing the
    /// whole listing.
    pub(crate) fn list(&self, rel: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let read_dir = if rel.as_os_str().is_empty() {
            self.dir.entries()?
        } else {
            self.dir.read_dir(rel)?
        };

        let mut entries: Vec<DirectoryEntry> = read_dir
            .filter_map(|entry| self.describe(rel, entry))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn describe(&self, rel: &Path, entry: io::Result<DirEntry>) -> Option<DirectoryEntry> {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    root = %self.root.display(),
                    error = %e,
                    "skipping unreadable directory entry"
                );
                return None;
            }
        };
        let name = entry.file_name();
        match self.dir.metadata(rel.join(&name)) {
            Ok(meta) => Some(entry_from(&name, &meta)),
            Err(e) => {
                // Dangling or escaping symlink: listed, never followed.
                debug!(name = %name.to_string_lossy(), error = %e, "entry target not reachable");
                Some(DirectoryEntry {
                    name: name.to_string_lossy().into_owned(),
                    is_dir: false,
                    size: 0,
                })
            }
        }
    }
}

fn entry_from(name: &OsStr, meta: &Metadata) -> DirectoryEntry {
    let is_dir = meta.is_dir();
    DirectoryEntry {
        name: name.to_string_lossy().into_owned(),
        is_dir,
        size: if is_dir { 0 } else { meta.len() },
    }
}
