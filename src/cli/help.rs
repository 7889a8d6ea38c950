//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name used in log records (e.g. "run", "console").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run { .. } => "run",
        Commands::Console { .. } => "console",
        Commands::Usage { .. } => "usage",
        Commands::Config { .. } => "config",
    }
}
