//! Tool handlers backed by the dirgate filesystem gateway.
//!
//! # Tools
//!
//! - **Registry** ([`registry`]): the [`Tool`](registry::Tool) trait and
//!   name-indexed [`ToolRegistry`](registry::ToolRegistry)
//! - **File tools** ([`file_tools`]): `list_files`, `read_file`, and the
//!   [`WriteTarget`](file_tools::WriteTarget) used by subsystems that persist
//!   downloaded content
//!
//! Every file access goes through a shared
//! [`FilesystemGateway`](dirgate_fs::FilesystemGateway), so containment is
//! enforced by the gateway rather than by the tools.

pub mod file_tools;
pub mod registry;

use std::sync::Arc;

use dirgate_fs::FilesystemGateway;

use crate::registry::ToolRegistry;

/// Register every file tool with `registry`.
///
/// Tools are registered even when the gateway is disabled; calls then fail
/// with [`ToolError::Disabled`](registry::ToolError::Disabled).
pub fn register_all(registry: &mut ToolRegistry, gateway: Arc<FilesystemGateway>) {
    registry.register(Arc::new(file_tools::ListFilesTool::new(gateway.clone())));
    registry.register(Arc::new(file_tools::ReadFileTool::new(gateway)));
}
