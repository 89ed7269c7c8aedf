//! Subcommand implementations and shared startup helpers.

pub mod fs_cmd;
pub mod tools_cmd;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ArgMatches;
use dirgate_fs::FilesystemGateway;
use dirgate_types::{AccessMode, DirectoryConfig, GatewayConfig};
use tracing::{debug, info, warn};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "DIRGATE_CONFIG";

/// Collect `--read-dir` / `--write-dir` values in the order they were given.
pub fn directories_from_matches(matches: &ArgMatches) -> Vec<DirectoryConfig> {
    let mut indexed: Vec<(usize, DirectoryConfig)> = Vec::new();

    for (id, mode) in [
        ("read_dirs", AccessMode::ReadOnly),
        ("write_dirs", AccessMode::ReadWrite),
    ] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<PathBuf>(id), matches.indices_of(id))
        {
            for (path, index) in values.zip(indices) {
                indexed.push((
                    index,
                    DirectoryConfig {
                        path: path.clone(),
                        mode,
                    },
                ));
            }
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, dir)| dir).collect()
}

/// Locate the config file: explicit flag first, then the value of
/// [`CONFIG_ENV`]. An empty variable counts as unset.
fn discover_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    env_value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Build the final configuration: file entries first, then CLI flags.
pub fn resolve_config(
    explicit: Option<&Path>,
    matches: &ArgMatches,
) -> anyhow::Result<GatewayConfig> {
    let mut config = match discover_config_path(explicit, std::env::var_os(CONFIG_ENV)) {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            GatewayConfig::load(&path)?
        }
        None => GatewayConfig::default(),
    };

    for dir in directories_from_matches(matches) {
        config.push(dir);
    }
    Ok(config)
}

/// Open the gateway for this process run.
pub fn open_gateway(config: &GatewayConfig) -> anyhow::Result<Arc<FilesystemGateway>> {
    let gateway = FilesystemGateway::from_config(config)?;
    if !gateway.is_enabled() {
        warn!("filesystem access disabled; pass --read-dir/--write-dir or a config file");
    }
    Ok(Arc::new(gateway))
}

/// Close the gateway once every command has finished with it.
pub fn shutdown(gateway: Arc<FilesystemGateway>) {
    match Arc::try_unwrap(gateway) {
        Ok(gateway) => gateway.close(),
        Err(_) => info!("gateway still shared at shutdown; handles released on exit"),
    }
}
