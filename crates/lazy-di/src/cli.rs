//! `lazy-di` command-line tool
//!
//! Builds a registry from configuration and inspects it:
//!
//! | Command | Output |
//! |---------|--------|
//! | `list` | every registered path with its state |
//! | `docs` | Markdown documentation |
//! | `resolve PATH` | the resolved value as text |
//!
//! Manifests naming a `factory` need a host program that fills the
//! [`FactoryCatalog`]; the tool itself only knows value manifests.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lazy_di_core::{EntryState, Registry, Result};
use lazy_di_infrastructure::config::ConfigLoader;
use lazy_di_infrastructure::loader::FactoryCatalog;
use lazy_di_infrastructure::{bootstrap, init_logging, render_docs, render_instance};
use tracing::debug;

/// Command line interface for lazy-di
#[derive(Parser, Debug)]
#[command(name = "lazy-di")]
#[command(about = "Inspect a lazy-di registry built from configuration")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory relative manifest paths are resolved against
    ///
    /// Defaults to the configuration file's directory, or the working
    /// directory when no file is given.
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered paths and their state
    List,
    /// Print Markdown documentation
    Docs {
        /// Text placed before the first section
        #[arg(long)]
        preamble: Option<String>,
    },
    /// Resolve a path and print its value
    Resolve {
        /// Path to resolve, e.g. `env::HOME` or `handler::*`
        path: String,
    },
}

/// Load configuration, set up logging and run the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(config.logging.clone())?;

    let base_dir = match (&cli.base_dir, &cli.config) {
        (Some(dir), _) => dir.clone(),
        (None, Some(file)) => file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        (None, None) => std::env::current_dir()?,
    };
    let base_dir = std::path::absolute(&base_dir)?;
    debug!(base_dir = %base_dir.display(), "Bootstrapping registry");

    let registry = bootstrap(&config, &FactoryCatalog::new(), &base_dir).await?;
    let output = execute(&cli.command, &registry).await?;
    println!("{output}");
    Ok(())
}

/// Run a command against an existing registry and return its output
pub async fn execute(command: &Command, registry: &Registry) -> Result<String> {
    match command {
        Command::List => {
            let lines: Vec<String> = registry
                .list()?
                .into_iter()
                .map(|(path, entry)| format!("{path}\t{}", state_label(entry.state())))
                .collect();
            Ok(lines.join("\n"))
        }
        Command::Docs { preamble } => render_docs(registry, preamble.as_deref()),
        Command::Resolve { path } => {
            let instance = registry.resolve(path).await?;
            Ok(render_instance(&instance))
        }
    }
}

fn state_label(state: EntryState) -> &'static str {
    match state {
        EntryState::Unresolved => "unresolved",
        EntryState::Pending => "pending",
        EntryState::Resolved => "resolved",
        EntryState::Failed => "failed",
    }
}
