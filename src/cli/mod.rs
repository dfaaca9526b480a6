//! Command-line interface for tenthousand
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

mod add;
mod list;
mod progress;

/// tenthousand - 10,000 repetitions in a year
///
/// Log repetitions of a habit and see whether you are on pace to reach
/// the yearly goal.
#[derive(Parser, Debug)]
#[command(name = "tenthousand")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ~/.config/tenthousand/config.toml)
    #[arg(long, global = true, env = "TENTHOUSAND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log repetitions for a task
    Add {
        /// Number of repetitions completed
        count: u64,

        /// Task the repetitions belong to
        task: String,

        /// Create the task without asking if it does not exist yet
        #[arg(long)]
        init_task: bool,
    },

    /// Show progress toward the yearly goal
    Progress {
        /// Task to report on
        task: String,
    },

    /// List tracked tasks with their totals
    List,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add {
                count,
                task,
                init_task,
            } => add::run(add::AddOptions {
                count,
                task,
                init_task,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Progress { task } => progress::run(progress::ProgressOptions {
                task,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List => list::run(list::ListOptions {
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Load the config for this invocation, announcing a freshly created default
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    let loaded = Config::resolve(path)?;
    if loaded.created {
        eprintln!("Creating new config file at {}", loaded.path.display());
    }
    Ok(loaded.config)
}
