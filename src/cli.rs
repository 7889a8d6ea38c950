//! CLI domain: parse, route, console, help, output and presentation.
//! Route handlers stay thin; scheduling lives in the library modules.

mod console;
mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use console::{run_console, ConsoleOptions, ConsoleSummary};
pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_run_report, RunReport};
pub use route::RunContext;
