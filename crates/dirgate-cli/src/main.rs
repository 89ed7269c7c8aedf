//! `dirgate` -- CLI binary for the dirgate filesystem gateway.
//!
//! Allowed directories come from a JSON config file (`--config` or the
//! `DIRGATE_CONFIG` environment variable) followed by `--read-dir` and
//! `--write-dir` flags in command-line order. Subcommands:
//!
//! - `dirgate ls [path]` -- List one directory level.
//! - `dirgate cat <path>` -- Stream a file to stdout.
//! - `dirgate stat <path>` -- Show size, kind, and modification time.
//! - `dirgate put <path>` -- Write stdin (or `--from <file>`) to a file.
//! - `dirgate dirs` -- Show allowed directories in priority order.
//! - `dirgate tools` -- Print tool schemas.
//! - `dirgate call <tool> [args]` -- Run a tool with JSON arguments.

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

mod commands;

/// dirgate filesystem gateway CLI.
#[derive(Parser)]
#[command(name = "dirgate", about = "Confined access to allowed directories", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (overrides DIRGATE_CONFIG).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Allow read-only access to a directory (repeatable).
    #[arg(long = "read-dir", value_name = "DIR")]
    read_dirs: Vec<PathBuf>,

    /// Allow read-write access to a directory (repeatable).
    #[arg(long = "write-dir", value_name = "DIR")]
    write_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List one directory level (root when no path is given).
    Ls {
        /// Directory path relative to the allowed directories.
        path: Option<String>,
    },

    /// Stream a file to stdout.
    Cat {
        /// File path relative to the allowed directories.
        path: String,
    },

    /// Show file or directory metadata as JSON.
    Stat {
        /// Path relative to the allowed directories.
        path: String,
    },

    /// Write stdin (or a local file) into the first writable directory.
    Put {
        /// Destination path relative to the allowed directories.
        path: String,

        /// Read content from this local file instead of stdin.
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Show allowed directories in priority order.
    Dirs,

    /// Print tool schemas as JSON.
    Tools,

    /// Run a tool by name.
    Call {
        /// Tool name (e.g. "read_file").
        tool: String,

        /// JSON arguments object.
        #[arg(default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::resolve_config(cli.config.as_deref(), &matches)?;
    tracing::debug!(
        read_dirs = cli.read_dirs.len(),
        write_dirs = cli.write_dirs.len(),
        configured = config.directories.len(),
        "resolved allowed directories"
    );
    let gateway = commands::open_gateway(&config)?;

    match cli.command {
        Commands::Ls { path } => commands::fs_cmd::ls(&gateway, path.unwrap_or_default()).await?,
        Commands::Cat { path } => commands::fs_cmd::cat(&gateway, path).await?,
        Commands::Stat { path } => commands::fs_cmd::stat(&gateway, path).await?,
        Commands::Put { path, from } => {
            commands::fs_cmd::put(&gateway, &path, from.as_deref()).await?
        }
        Commands::Dirs => commands::fs_cmd::dirs(&gateway),
        Commands::Tools => commands::tools_cmd::tools(&gateway)?,
        Commands::Call { tool, args } => commands::tools_cmd::call(&gateway, &tool, &args).await?,
    }

    commands::shutdown(gateway);
    Ok(())
}
