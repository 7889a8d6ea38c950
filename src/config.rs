//! Configuration System
//!
//! Layered configuration for the scheduler, message delivery, the simulated
//! host and logging. Sources are merged by [`ConfigLoader`] in this order:
//! built-in defaults, the global user file, workspace files, then
//! `PREGEN__SECTION__KEY` environment variables.

use crate::job::registry::Timing;
use crate::job::BatchPolicy;
use crate::logging::LoggingConfig;
use crate::progress::DeliveryPolicy;
use crate::region::TileGrid;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PregenConfig {
    /// Batch and tick policy
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Operator message delivery
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// In-memory host used by the `pregen` binary
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Batch executor and recurring-task policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Tiles materialized per invocation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Host ticks between invocations of a job
    #[serde(default = "default_period_ticks")]
    pub period_ticks: u64,

    /// Host ticks before the first invocation
    #[serde(default)]
    pub initial_delay_ticks: u64,

    /// Progress message cadence in invocations (2 = every other one)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Block alignment granularity
    #[serde(default = "default_tile_granularity")]
    pub tile_granularity: i32,

    /// Right shift converting aligned blocks to tile coordinates
    #[serde(default = "default_tile_shift")]
    pub tile_shift: u32,

    /// Persist tiles when releasing them
    #[serde(default = "default_true")]
    pub save_on_release: bool,

    /// Ask the host for a safe release
    #[serde(default = "default_true")]
    pub safe_release: bool,
}

/// Largest accepted `batch_size`.
pub const MAX_BATCH_SIZE: usize = 1_000_000;

/// Largest accepted period or initial delay: one day at 20 ticks per second.
pub const MAX_SCHEDULE_TICKS: u64 = 1_728_000;

fn default_batch_size() -> usize {
    300
}

fn default_period_ticks() -> u64 {
    15
}

fn default_progress_interval() -> u64 {
    2
}

fn default_tile_granularity() -> i32 {
    16
}

fn default_tile_shift() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            period_ticks: default_period_ticks(),
            initial_delay_ticks: 0,
            progress_interval: default_progress_interval(),
            tile_granularity: default_tile_granularity(),
            tile_shift: default_tile_shift(),
            save_on_release: default_true(),
            safe_release: default_true(),
        }
    }
}

impl SchedulerConfig {
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            batch_size: self.batch_size,
            save_on_release: self.save_on_release,
            safe_release: self.safe_release,
        }
    }

    pub fn timing(&self) -> Timing {
        Timing {
            initial_delay: self.initial_delay_ticks,
            period: self.period_ticks,
        }
    }

    pub fn tile_grid(&self) -> TileGrid {
        TileGrid {
            granularity: self.tile_granularity,
            shift: self.tile_shift,
        }
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "batch_size {} exceeds the maximum of {}",
                self.batch_size, MAX_BATCH_SIZE
            ));
        }
        if self.period_ticks == 0 {
            return Err("period_ticks must be at least 1".to_string());
        }
        if self.period_ticks > MAX_SCHEDULE_TICKS {
            return Err(format!(
                "period_ticks {} exceeds the maximum of {}",
                self.period_ticks, MAX_SCHEDULE_TICKS
            ));
        }
        if self.initial_delay_ticks > MAX_SCHEDULE_TICKS {
            return Err(format!(
                "initial_delay_ticks {} exceeds the maximum of {}",
                self.initial_delay_ticks, MAX_SCHEDULE_TICKS
            ));
        }
        if self.progress_interval == 0 {
            return Err("progress_interval must be at least 1".to_string());
        }
        if self.tile_granularity <= 0 {
            return Err("tile_granularity must be positive".to_string());
        }
        if self.tile_shift > 16 {
            return Err(format!("tile_shift {} is out of range (0-16)", self.tile_shift));
        }
        Ok(())
    }
}

/// Operator message delivery policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Skip direct replies to operators, who already receive the admin broadcast
    #[serde(default = "default_true")]
    pub suppress_operator_replies: bool,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            suppress_operator_replies: default_true(),
        }
    }
}

impl MessagingConfig {
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            suppress_operator_replies: self.suppress_operator_replies,
        }
    }
}

/// Settings for the in-memory host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Wall-clock length of one host tick in the interactive console
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Worlds known to the simulated server
    #[serde(default = "default_worlds")]
    pub worlds: Vec<String>,

    /// Name the console operator acts under
    #[serde(default = "default_operator")]
    pub operator: String,
}

fn default_tick_ms() -> u64 {
    50
}

fn default_worlds() -> Vec<String> {
    vec![
        "world".to_string(),
        "world_nether".to_string(),
        "world_the_end".to_string(),
    ]
}

fn default_operator() -> String {
    "console".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            worlds: default_worlds(),
            operator: default_operator(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_ms == 0 {
            return Err("tick_ms must be at least 1".to_string());
        }
        if self.worlds.is_empty() {
            return Err("at least one world is required".to_string());
        }
        if self.worlds.iter().any(|w| w.trim().is_empty()) {
            return Err("world names cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Scheduler(String),
    Simulation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scheduler(msg) => write!(f, "Scheduler: {}", msg),
            ValidationError::Simulation(msg) => write!(f, "Simulation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PregenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.scheduler.validate() {
            errors.push(ValidationError::Scheduler(e));
        }
        if let Err(e) = self.simulation.validate() {
            errors.push(ValidationError::Simulation(e));
        }
        if let Err(e) = crate::logging::validate_format(&self.logging.format) {
            errors.push(ValidationError::Logging(e.to_string()));
        }
        if let Err(e) = crate::logging::parse_output_destinations(&self.logging.output) {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
