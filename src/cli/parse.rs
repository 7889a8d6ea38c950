//! CLI parse: clap types for the `pregen` binary. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pregen CLI - incremental chunk pre-generation on a simulated host
#[derive(Parser)]
#[command(name = "pregen")]
#[command(about = "Pre-generate rectangular regions of a voxel world in small batches")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one region on the simulated server and wait for it to finish
    #[command(allow_negative_numbers = true)]
    Run {
        /// World to generate in
        #[arg(long, default_value = "world")]
        world: String,
        /// Minimum block X
        #[arg(long)]
        min_x: i32,
        /// Minimum block Z
        #[arg(long)]
        min_z: i32,
        /// Maximum block X
        #[arg(long)]
        max_x: i32,
        /// Maximum block Z
        #[arg(long)]
        max_z: i32,
        /// Requester name (default: the configured operator)
        #[arg(long = "as", value_name = "NAME")]
        requester: Option<String>,
        /// Issue the request without operator privileges
        #[arg(long)]
        unprivileged: bool,
        /// Give up after this many host ticks
        #[arg(long, default_value = "100000000")]
        max_ticks: u64,
    },
    /// Interactive operator console driving the simulated server in real time
    Console {
        /// Milliseconds per host tick (default: simulation.tick_ms)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Print the operator command usage
    Usage {
        /// Highlight runnable commands
        #[arg(long)]
        color: bool,
    },
    /// Print the effective configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}
