//! `dirgate ls | cat | stat | put | dirs` -- direct gateway access.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dirgate_fs::FilesystemGateway;
use dirgate_tools::file_tools::{WriteTarget, render_listing};
use tracing::info;

/// Print one directory level.
pub async fn ls(gateway: &Arc<FilesystemGateway>, path: String) -> anyhow::Result<()> {
    let gw = Arc::clone(gateway);
    let listing = tokio::task::spawn_blocking(move || gw.list_directory(&path)).await??;
    info!(root = %listing.root.display(), "listed");
    println!("{}", render_listing(&listing.value));
    Ok(())
}

/// Copy a file to stdout without loading it whole.
pub async fn cat(gateway: &Arc<FilesystemGateway>, path: String) -> anyhow::Result<()> {
    let gw = Arc::clone(gateway);
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let resolved = gw.open_stream(&path)?;
        info!(root = %resolved.root.display(), "streaming");
        let mut stream = resolved.into_inner();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        std::io::copy(&mut stream, &mut out).context("writing to stdout")?;
        out.flush()?;
        Ok(())
    })
    .await?
}

/// Print metadata as pretty JSON.
pub async fn stat(gateway: &Arc<FilesystemGateway>, path: String) -> anyhow::Result<()> {
    let gw = Arc::clone(gateway);
    let stat = tokio::task::spawn_blocking(move || gw.stat(&path)).await??;
    let json = serde_json::json!({
        "size": stat.value.size,
        "is_dir": stat.value.is_dir,
        "modified": stat.value.modified,
        "directory": stat.root.display().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Write stdin or `from` into the first writable directory.
pub async fn put(
    gateway: &Arc<FilesystemGateway>,
    path: &str,
    from: Option<&Path>,
) -> anyhow::Result<()> {
    let bytes = match from {
        Some(src) => tokio::fs::read(src)
            .await
            .with_context(|| format!("reading {}", src.display()))?,
        None => tokio::task::spawn_blocking(|| -> std::io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        })
        .await?
        .context("reading stdin")?,
    };

    let len = bytes.len();
    let written = WriteTarget::new(Arc::clone(gateway))
        .write(path, bytes)
        .await?;
    println!("wrote {} bytes to {}", len, written.display());
    Ok(())
}

/// Print allowed directories in priority order.
pub fn dirs(gateway: &FilesystemGateway) {
    if !gateway.is_enabled() {
        println!("filesystem access disabled");
        return;
    }
    for (i, dir) in gateway.directories().enumerate() {
        println!("{} {} {}", i + 1, dir.mode().label(), dir.root().display());
    }
}
