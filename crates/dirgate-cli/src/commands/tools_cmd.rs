//! `dirgate tools | call` -- the tool layer from the command line.

use std::sync::Arc;

use anyhow::Context;
use dirgate_fs::FilesystemGateway;
use dirgate_tools::register_all;
use dirgate_tools::registry::ToolRegistry;

fn build_registry(gateway: &Arc<FilesystemGateway>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_all(&mut registry, Arc::clone(gateway));
    registry
}

/// Print every tool schema.
pub fn tools(gateway: &Arc<FilesystemGateway>) -> anyhow::Result<()> {
    let registry = build_registry(gateway);
    println!("{}", serde_json::to_string_pretty(&registry.schemas())?);
    Ok(())
}

/// Run one tool and print its JSON result.
pub async fn call(gateway: &Arc<FilesystemGateway>, tool: &str, args: &str) -> anyhow::Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(args).context("tool arguments must be a JSON object")?;
    let registry = build_registry(gateway);
    let result = registry.execute(tool, args).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
