//! Filesystem access gateway for dirgate.
//!
//! Lets tool handlers read, write, list, and stat files while guaranteeing
//! that no access escapes a configured set of allowed directories.
//!
//! # Architecture
//!
//! - **[`capability`]** -- [`DirectoryCapability`]: one allowed directory,
//!   its [`AccessMode`](dirgate_types::AccessMode), and an open
//!   [`cap_std::fs::Dir`] handle that every path resolution goes through.
//! - **[`gateway`]** -- [`FilesystemGateway`]: an immutable, ordered set of
//!   capabilities. Each operation tries them in configured order and the
//!   first one that succeeds wins.
//! - **[`classify`]** -- a text/binary heuristic for callers that render
//!   file contents.
//!
//! Containment is enforced by the OS (`openat`-style resolution beneath the
//! directory handle), so `..` components, absolute paths, and symlinks that
//! leave the root fail like any other missing file. Nothing here inspects
//! path strings for traversal.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirgate_fs::FilesystemGateway;
//! use dirgate_types::DirectoryConfig;
//!
//! # fn example() -> dirgate_types::Result<()> {
//! let gateway = FilesystemGateway::open(&[
//!     DirectoryConfig::read_only("/srv/shared"),
//!     DirectoryConfig::read_write("/srv/inbox"),
//! ])?;
//! let notes = gateway.read_file("notes.txt")?;
//! println!("{} bytes from {}", notes.value.len(), notes.root.display());
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod classify;
pub mod gateway;

pub use capability::{DirectoryCapability, DirectoryEntry, FileStat, FileStream};
pub use classify::{ContentKind, classify, is_text};
pub use gateway::{FilesystemGateway, Resolved};
