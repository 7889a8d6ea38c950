//! Logging System
//!
//! Structured logging built on `tracing`. Level, format and destination come
//! from the configuration file, with environment and CLI overrides.

use crate::error::PregenError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable all logging when false
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output includes "file")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Default log file location when output includes "file" and no path is set.
pub fn default_log_file(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".pregen").join("pregen.log")
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (PREGEN_LOG, PREGEN_LOG_FORMAT, PREGEN_LOG_OUTPUT)
/// 2. CLI arguments, already folded into `config` by the binary
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), PregenError> {
    if config.is_some_and(|c| !c.enabled) {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);
    let json = format == "json";

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if output.file {
        let path = config
            .and_then(|c| c.file.clone())
            .unwrap_or_else(|| default_log_file(Path::new(".")));
        layers.push(fmt_layer(Mutex::new(open_log_file(&path)?), json, false));
    }
    if output.stdout {
        layers.push(fmt_layer(std::io::stdout, json, use_color));
    }
    if output.stderr {
        layers.push(fmt_layer(std::io::stderr, json, use_color));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| PregenError::ConfigError(format!("Failed to install logger: {}", e)))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// One formatting layer: RFC 3339 UTC timestamps, targets on, JSON or text.
fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.with_ansi(ansi).boxed()
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, PregenError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PregenError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PregenError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

/// `PREGEN_LOG` wins outright; otherwise the configured level plus
/// per-module levels from the config and `PREGEN_LOG_MODULES`.
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, PregenError> {
    if let Ok(filter) = EnvFilter::try_from_env("PREGEN_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut modules: Vec<(String, String)> = config
        .map(|c| {
            c.modules
                .iter()
                .map(|(module, level)| (module.clone(), level.clone()))
                .collect()
        })
        .unwrap_or_default();
    if let Ok(spec) = std::env::var("PREGEN_LOG_MODULES") {
        modules.extend(parse_module_levels(&spec));
    }

    modules
        .into_iter()
        .try_fold(EnvFilter::new(level), |filter, (module, level)| {
            let directive = format!("{}={}", module, level).parse().map_err(|e| {
                PregenError::ConfigError(format!("Invalid log directive for {}: {}", module, e))
            })?;
            Ok(filter.add_directive(directive))
        })
}

/// `a=debug, b::c=trace` into pairs; malformed entries are skipped.
fn parse_module_levels(spec: &str) -> Vec<(String, String)> {
    spec.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(module, level)| (module.trim().to_string(), level.trim().to_string()))
        .filter(|(module, level)| !module.is_empty() && !level.is_empty())
        .collect()
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<String, PregenError> {
    let from_env = std::env::var("PREGEN_LOG_FORMAT")
        .ok()
        .filter(|f| validate_format(f).is_ok());
    match from_env {
        Some(format) => Ok(format),
        None => {
            let format = config.map(|c| c.format.as_str()).unwrap_or("text");
            validate_format(format)?;
            Ok(format.to_string())
        }
    }
}

pub(crate) fn validate_format(format: &str) -> Result<(), PregenError> {
    if format != "json" && format != "text" {
        return Err(PregenError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(())
}

/// Output destinations
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, PregenError> {
    if let Ok(output) = std::env::var("PREGEN_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }

    let output = config.map(|c| c.output.as_str()).unwrap_or("stderr");
    parse_output_destinations(output)
}

/// Parse `stdout`, `stderr`, `file` or `file+stderr`.
pub(crate) fn parse_output_destinations(output: &str) -> Result<OutputDestinations, PregenError> {
    let destinations = match output {
        "stdout" | "stderr" | "file" | "file+stderr" => OutputDestinations {
            stdout: output == "stdout",
            stderr: output.ends_with("stderr"),
            file: output.starts_with("file"),
        },
        _ => {
            return Err(PregenError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
                output
            )))
        }
    };
    Ok(destinations)
}
