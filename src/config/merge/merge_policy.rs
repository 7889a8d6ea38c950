//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("scheduler.batch_size", 300)?
        .set_default("scheduler.period_ticks", 15)?
        .set_default("scheduler.initial_delay_ticks", 0)?
        .set_default("scheduler.progress_interval", 2)?
        .set_default("scheduler.tile_granularity", 16)?
        .set_default("scheduler.tile_shift", 4)?
        .set_default("messaging.suppress_operator_replies", true)?
        .set_default("simulation.tick_ms", 50)?
        .set_default("simulation.operator", "console")
}
