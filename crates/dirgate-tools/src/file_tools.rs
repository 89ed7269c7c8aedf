//! File tools: list directory, read file, and a write target.
//!
//! All three delegate to a shared [`FilesystemGateway`]. Gateway calls block
//! on disk I/O, so they run on tokio's blocking pool. Rendering for callers
//! (listing lines, binary placeholder, size cap) happens here, after the
//! gateway has returned the raw bytes.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dirgate_fs::{DirectoryEntry, FilesystemGateway, is_text};
use serde_json::json;
use tracing::debug;

use crate::registry::{Tool, ToolError};

/// Largest file prefix `read_file` returns as text (512 KiB).
pub const MAX_READ_BYTES: usize = 512 * 1024;

/// Rendered when a listed directory has no entries.
pub const EMPTY_DIRECTORY: &str = "(empty directory)";

/// Run a blocking gateway call on the blocking pool.
async fn run_blocking<T, F>(gateway: &Arc<FilesystemGateway>, call: F) -> Result<T, ToolError>
where
    T: Send + 'static,
    F: FnOnce(&FilesystemGateway) -> dirgate_types::Result<T> + Send + 'static,
{
    let gateway = Arc::clone(gateway);
    tokio::task::spawn_blocking(move || call(&gateway))
        .await
        .map_err(|e| ToolError::ExecutionFailed(format!("filesystem task failed: {e}")))?
        .map_err(ToolError::from)
}

/// Extract a required string field from a JSON arguments object.
fn required_str(args: &serde_json::Value, field: &str) -> Result<String, ToolError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ToolError::InvalidArgs(format!("missing required field: {}", field)))
}

/// Render a listing as one line per entry: `[dir] name/` or `<size> name`.
pub fn render_listing(entries: &[DirectoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_DIRECTORY.to_string();
    }
    entries
        .iter()
        .map(|e| {
            if e.is_dir {
                format!("[dir] {}/", e.name)
            } else {
                format!("{} {}", e.size, e.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rendered file content for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub text: String,
    pub binary: bool,
    pub truncated: bool,
}

/// Turn raw file bytes into displayable text.
///
/// Binary content becomes a placeholder. Text longer than
/// [`MAX_READ_BYTES`] is cut and a truncation marker appended.
pub fn render_content(bytes: &[u8]) -> RenderedContent {
    if !is_text(bytes) {
        return RenderedContent {
            text: format!("[binary file: {} bytes, not shown]", bytes.len()),
            binary: true,
            truncated: false,
        };
    }

    if bytes.len() <= MAX_READ_BYTES {
        return RenderedContent {
            text: String::from_utf8_lossy(bytes).into_owned(),
            binary: false,
            truncated: false,
        };
    }

    let mut text = String::from_utf8_lossy(&bytes[..MAX_READ_BYTES]).into_owned();
    text.push_str(&format!(
        "\n[truncated: showing first {} of {} bytes]",
        MAX_READ_BYTES,
        bytes.len()
    ));
    RenderedContent {
        text,
        binary: false,
        truncated: true,
    }
}

// ---------------------------------------------------------------------------
// ListFilesTool
// ---------------------------------------------------------------------------

/// List one level of a directory inside the allowed directories.
///
/// Returns `{ "content", "directory", "entries" }` where `content` is the
/// rendered listing and `directory` the allowed root that served it.
pub struct ListFilesTool {
    gateway: Arc<FilesystemGateway>,
}

impl ListFilesTool {
    pub fn new(gateway: Arc<FilesystemGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and subdirectories in an allowed directory. Omit path to list the root."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to list, relative to the allowed directories (default: root)"
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        debug!(path = %path, "listing directory");

        let listing = run_blocking(&self.gateway, move |gw| gw.list_directory(&path)).await?;

        Ok(json!({
            "content": render_listing(&listing.value),
            "directory": listing.root.display().to_string(),
            "entries": listing.value.len(),
        }))
    }
}

// ---------------------------------------------------------------------------
// ReadFileTool
// ---------------------------------------------------------------------------

/// Read a file inside the allowed directories.
///
/// Returns `{ "content", "directory", "binary", "truncated" }`.
pub struct ReadFileTool {
    gateway: Arc<FilesystemGateway>,
}

impl ReadFileTool {
    pub fn new(gateway: Arc<FilesystemGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a text file from the allowed directories. Binary files are not shown."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to read (relative to the allowed directories)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let path = required_str(&args, "path")?;

        debug!(path = %path, "reading file");

        let file = run_blocking(&self.gateway, move |gw| gw.read_file(&path)).await?;
        let rendered = render_content(&file.value);

        Ok(json!({
            "content": rendered.text,
            "directory": file.root.display().to_string(),
            "binary": rendered.binary,
            "truncated": rendered.truncated,
        }))
    }
}

// ---------------------------------------------------------------------------
// WriteTarget
// ---------------------------------------------------------------------------

/// Destination for content other subsystems want to persist (downloads,
/// exports). Writes go to the first read-write directory that accepts the
/// path.
#[derive(Clone)]
pub struct WriteTarget {
    gateway: Arc<FilesystemGateway>,
}

impl WriteTarget {
    pub fn new(gateway: Arc<FilesystemGateway>) -> Self {
        Self { gateway }
    }

    /// Write `bytes` to `path` and return where the file landed.
    pub async fn write(&self, path: &str, bytes: Vec<u8>) -> Result<PathBuf, ToolError> {
        debug!(path = %path, bytes = bytes.len(), "persisting content");

        let rel = path.to_string();
        let written = run_blocking(&self.gateway, move |gw| gw.write_file(&rel, &bytes)).await?;
        Ok(written.root.join(path))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dirgate_types::DirectoryConfig;
    use std::path::Path;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        std::env::temp_dir().join(format!("dirgate_file_tools_test_{pid}_{id}"))
    }

    async fn setup(mode_rw: bool) -> (Arc<FilesystemGateway>, PathBuf) {
        let dir = temp_dir();
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let config = if mode_rw {
            DirectoryConfig::read_write(&dir)
        } else {
            DirectoryConfig::read_only(&dir)
        };
        let gateway = Arc::new(FilesystemGateway::open(&[config]).unwrap());
        (gateway, dir)
    }

    async fn cleanup(dir: &Path) {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    // -- rendering ---------------------------------------------------------

    #[test]
    fn render_listing_lines() {
        let entries = vec![
            DirectoryEntry {
                name: "docs".into(),
                is_dir: true,
                size: 0,
            },
            DirectoryEntry {
                name: "a.txt".into(),
                is_dir: false,
                size: 12,
            },
        ];
        assert_eq!(render_listing(&entries), "[dir] docs/\n12 a.txt");
    }

    #[test]
    fn render_listing_empty() {
        assert_eq!(render_listing(&[]), EMPTY_DIRECTORY);
    }

    #[test]
    fn render_content_binary_placeholder() {
        let rendered = render_content(b"\x00\x01\x02PNG");
        assert!(rendered.binary);
        assert_eq!(rendered.text, "[binary file: 6 bytes, not shown]");
    }

    #[test]
    fn render_content_truncates_at_cap() {
        let bytes = vec![b'x'; MAX_READ_BYTES + 10];
        let rendered = render_content(&bytes);
        assert!(rendered.truncated);
        assert!(rendered.text.starts_with(&"x".repeat(100)));
        assert!(rendered.text.ends_with(&format!(
            "[truncated: showing first {} of {} bytes]",
            MAX_READ_BYTES,
            MAX_READ_BYTES + 10
        )));
    }

    #[test]
    fn render_content_at_cap_is_not_truncated() {
        let bytes = vec![b'y'; MAX_READ_BYTES];
        let rendered = render_content(&bytes);
        assert!(!rendered.truncated);
        assert_eq!(rendered.text.len(), MAX_READ_BYTES);
    }

    // -- ListFilesTool -----------------------------------------------------

    #[tokio::test]
    async fn list_files_renders_root() {
        let (gateway, dir) = setup(false).await;
        tokio::fs::write(dir.join("a.txt"), "a").await.unwrap();
        tokio::fs::write(dir.join("b.txt"), "bb").await.unwrap();
        tokio::fs::create_dir(dir.join("subdir")).await.unwrap();

        let tool = ListFilesTool::new(gateway);
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["content"], "1 a.txt\n2 b.txt\n[dir] subdir/");
        assert_eq!(result["entries"], 3);

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn list_files_empty_directory_notice() {
        let (gateway, dir) = setup(false).await;
        tokio::fs::create_dir(dir.join("empty")).await.unwrap();

        let tool = ListFilesTool::new(gateway);
        let result = tool.execute(json!({"path": "empty"})).await.unwrap();
        assert_eq!(result["content"], EMPTY_DIRECTORY);

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn list_files_missing_directory() {
        let (gateway, dir) = setup(false).await;
        let tool = ListFilesTool::new(gateway);
        let err = tool
            .execute(json!({"path": "nonexistent_dir"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::FileNotFound(_)));
        cleanup(&dir).await;
    }

    // -- ReadFileTool ------------------------------------------------------

    #[tokio::test]
    async fn read_file_success() {
        let (gateway, dir) = setup(false).await;
        tokio::fs::write(dir.join("test.txt"), "hello world").await.unwrap();

        let tool = ReadFileTool::new(gateway);
        let result = tool.execute(json!({"path": "test.txt"})).await.unwrap();
        assert_eq!(result["content"], "hello world");
        assert_eq!(result["binary"], false);
        assert_eq!(result["truncated"], false);
        assert_eq!(
            result["directory"],
            std::fs::canonicalize(&dir).unwrap().display().to_string()
        );

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn read_file_missing_path_param() {
        let (gateway, dir) = setup(false).await;
        let tool = ReadFileTool::new(gateway);
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn read_file_empty_path_rejected() {
        let (gateway, dir) = setup(false).await;
        let tool = ReadFileTool::new(gateway);
        let err = tool.execute(json!({"path": ""})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgs(_)));
        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn read_file_binary_placeholder() {
        let (gateway, dir) = setup(false).await;
        tokio::fs::write(dir.join("img.bin"), [0u8, 159, 146, 150])
            .await
            .unwrap();

        let tool = ReadFileTool::new(gateway);
        let result = tool.execute(json!({"path": "img.bin"})).await.unwrap();
        assert_eq!(result["binary"], true);
        assert_eq!(result["content"], "[binary file: 4 bytes, not shown]");

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn read_file_traversal_rejected() {
        let (gateway, dir) = setup(false).await;
        let tool = ReadFileTool::new(gateway);
        let err = tool
            .execute(json!({"path": "../../../etc/passwd"}))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ToolError::FileNotFound(_)),
            "expected FileNotFound, got: {err:?}"
        );
        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn disabled_gateway_reports_disabled() {
        let gateway = Arc::new(FilesystemGateway::disabled());
        let err = ReadFileTool::new(gateway.clone())
            .execute(json!({"path": "a.txt"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Disabled));

        let err = ListFilesTool::new(gateway).execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Disabled));
    }

    // -- WriteTarget -------------------------------------------------------

    #[tokio::test]
    async fn write_target_persists_bytes() {
        let (gateway, dir) = setup(true).await;
        let target = WriteTarget::new(gateway);

        let written = target
            .write("download.bin", vec![0, 1, 2, 0, 255])
            .await
            .unwrap();
        assert_eq!(
            written,
            std::fs::canonicalize(&dir).unwrap().join("download.bin")
        );
        assert_eq!(
            tokio::fs::read(dir.join("download.bin")).await.unwrap(),
            vec![0, 1, 2, 0, 255]
        );

        cleanup(&dir).await;
    }

    #[tokio::test]
    async fn write_target_fails_without_read_write_directory() {
        let (gateway, dir) = setup(false).await;
        let target = WriteTarget::new(gateway);

        let err = target.write("download.bin", vec![1]).await.unwrap_err();
        assert!(matches!(err, ToolError::FileNotFound(_)));
        assert!(!dir.join("download.bin").exists());

        cleanup(&dir).await;
    }
}
