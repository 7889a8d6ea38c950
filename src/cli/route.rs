//! CLI route: single route table and run context.

use crate::cli::console::{run_console, ConsoleOptions};
use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_run_report, RunReport};
use crate::command::{dispatch, pregen_tree, render_with, CommandOutcome, Palette};
use crate::config::{ConfigLoader, PregenConfig};
use crate::error::PregenError;
use crate::host::server::SimulatedServer;
use crate::host::Requester;
use crate::scheduler::RegionScheduler;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, config path and the loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: PregenConfig,
}

/// Block bounds and identity for a one-shot `run`.
struct RunRequest<'a> {
    world: &'a str,
    bounds: [i32; 4],
    requester: Requester,
    max_ticks: u64,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PregenError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        Ok(Self {
            workspace_root,
            config_path,
            config,
        })
    }

    pub fn config(&self) -> &PregenConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, PregenError> {
        let started = Instant::now();
        debug!(
            command = command_name(command),
            workspace = %self.workspace_root.display(),
            config_path = ?self.config_path,
            "Executing command"
        );
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, PregenError> {
        match command {
            Commands::Run {
                world,
                min_x,
                min_z,
                max_x,
                max_z,
                requester,
                unprivileged,
                max_ticks,
            } => {
                let name = requester
                    .clone()
                    .unwrap_or_else(|| self.config.simulation.operator.clone());
                let requester = if *unprivileged {
                    Requester::player(name)
                } else {
                    Requester::operator(name)
                };
                let report = self.run_region(RunRequest {
                    world,
                    bounds: [*min_x, *min_z, *max_x, *max_z],
                    requester,
                    max_ticks: *max_ticks,
                })?;
                Ok(format_run_report(&report))
            }
            Commands::Console { tick_ms } => {
                let options = ConsoleOptions {
                    tick: Duration::from_millis(tick_ms.unwrap_or(self.config.simulation.tick_ms).max(1)),
                    color: self.config.logging.color && std::io::stdout().is_terminal(),
                };
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()?;
                let summary = runtime
                    .block_on(run_console(
                        &self.config,
                        options,
                        tokio::io::BufReader::new(tokio::io::stdin()),
                        tokio::io::stdout(),
                    ))
                    .map_err(|e| PregenError::Io(std::io::Error::other(format!("{:#}", e))))?;
                Ok(summary.to_string())
            }
            Commands::Usage { color } => {
                let palette = if *color { Palette::Ansi } else { Palette::Plain };
                Ok(render_with(&pregen_tree(), palette)
                    .iter()
                    .map(|line| format!("pregen {}", line))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Commands::Config { format } => match format.as_str() {
                "json" => serde_json::to_string_pretty(&self.config).map_err(|e| {
                    PregenError::ConfigError(format!("Failed to serialize config: {}", e))
                }),
                "toml" => toml::to_string_pretty(&self.config).map_err(|e| {
                    PregenError::ConfigError(format!("Failed to serialize config: {}", e))
                }),
                other => Err(PregenError::ConfigError(format!(
                    "Invalid format: {} (must be 'toml' or 'json')",
                    other
                ))),
            },
        }
    }

    /// Start one job on a fresh simulated server and fast-forward until it ends.
    fn run_region(&self, request: RunRequest<'_>) -> Result<RunReport, PregenError> {
        let mut server = SimulatedServer::new(self.config.simulation.worlds.iter().cloned());
        let mut scheduler = RegionScheduler::new(
            &self.config.scheduler,
            self.config.messaging.delivery_policy(),
        );

        let [min_x, min_z, max_x, max_z] = request.bounds;
        let line = format!(
            "generate {} {} {} {} {}",
            request.world, min_x, min_z, max_x, max_z
        );
        let id = match dispatch(&line, &request.requester, &mut scheduler, &mut server)? {
            CommandOutcome::Started(id) => id,
            other => {
                return Err(PregenError::ConfigError(format!(
                    "Unexpected command outcome: {:?}",
                    other
                )))
            }
        };
        let (region, total_tiles) = match scheduler.job(id) {
            Some(job) => (job.region().to_string(), job.total_tiles()),
            None => (String::new(), 0),
        };

        let started = Instant::now();
        let start_tick = server.ticks().tick();
        let mut invocations = 0;
        while !scheduler.is_idle() {
            let elapsed_ticks = server.ticks().tick() - start_tick;
            if elapsed_ticks >= request.max_ticks {
                break;
            }
            let statuses = server.step_to_next_due(&mut scheduler, request.max_ticks - elapsed_ticks);
            invocations += statuses.iter().filter(|(job, _)| *job == id).count() as u64;
        }

        Ok(RunReport {
            id,
            world: request.world.to_string(),
            region,
            total_tiles,
            invocations,
            ticks: server.ticks().tick() - start_tick,
            elapsed: started.elapsed(),
            finished: scheduler.is_idle(),
            deliveries: server.messages_mut().drain(),
        })
    }
}
