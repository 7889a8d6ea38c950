//! Workspace config files, applied in order: `config/config.toml`, then
//! `config/<PREGEN_ENV>.toml` (`development` when unset).

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_ENV: &str = "development";

/// Candidate workspace files, lowest precedence first.
pub fn layer_paths(workspace_root: &Path) -> [PathBuf; 2] {
    let dir = workspace_root.join("config");
    let env = std::env::var("PREGEN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());
    [dir.join("config.toml"), dir.join(format!("{}.toml", env))]
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    layer_paths(workspace_root)
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), "Adding workspace configuration layer");
            builder.add_source(File::from(path).required(false))
        })
}
