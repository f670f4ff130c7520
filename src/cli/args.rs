//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Rollout tracker for the network synchronization hierarchy
#[derive(Parser, Debug)]
#[command(name = "synctrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Site sheet to load (overrides the configured data_file)
    #[arg(long, global = true, env = "SYNCTRACK_DATA_FILE", value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    /// Local config file (default: ./.synctrack.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the hierarchy with rollout colors
    Tree {
        /// Print the design view color instead of the implementation view
        #[arg(long)]
        design: bool,
    },

    /// Show rollout counters
    Stats,

    /// List transport and access dependencies of tracked sites
    Deps,

    /// Write a planner report as CSV
    Report {
        /// Report type, e.g. master-sheet or masterSheet
        kind: String,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Set the readiness flags of one site and save the sheet
    Update {
        /// Site id
        site: String,
        #[arg(long)]
        transmission_in_sync: String,
        #[arg(long)]
        ip_transport_in_sync: String,
        #[arg(long)]
        site_doable: String,
    },

    /// List records not attached to any grandmaster
    Orphans,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}
