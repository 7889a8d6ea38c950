//! Integration tests for Configuration System

use chunk_pregen::config::{ConfigLoader, PregenConfig};
use chunk_pregen::host::server::SimulatedServer;
use chunk_pregen::host::{Requester, WorldRef};
use chunk_pregen::region::{Region, TilePos};
use chunk_pregen::scheduler::RegionScheduler;
use tempfile::TempDir;

use crate::integration::test_utils::{env_lock, ScopedEnvVar};

fn write_workspace_file(root: &TempDir, name: &str, contents: &str) {
    let dir = root.path().join("config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_workspace_files_layer_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    write_workspace_file(
        &temp_dir,
        "config.toml",
        r#"
[scheduler]
batch_size = 50
period_ticks = 5

[simulation]
worlds = ["lobby", "survival"]
"#,
    );
    write_workspace_file(
        &temp_dir,
        "development.toml",
        r#"
[scheduler]
batch_size = 25
"#,
    );

    let config = {
        let _env = env_lock();
        ConfigLoader::load(temp_dir.path()).unwrap()
    };
    assert_eq!(config.scheduler.batch_size, 25);
    assert_eq!(config.scheduler.period_ticks, 5);
    assert_eq!(config.scheduler.progress_interval, 2);
    assert_eq!(config.simulation.worlds, vec!["lobby", "survival"]);
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("pregen.toml");
    std::fs::write(
        &config_file,
        r#"
[scheduler]
batch_size = 0

[logging]
format = "xml"
"#,
    )
    .unwrap();

    let err = {
        let _env = env_lock();
        ConfigLoader::load_from_file(&config_file).unwrap_err()
    };
    let message = err.to_string();
    assert!(message.contains("batch_size must be at least 1"));
    assert!(message.contains("Invalid log format"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let _env = env_lock();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("pregen.toml");
    std::fs::write(&config_file, "[simulation]\ntick_ms = 20\n").unwrap();

    let config = {
        let _env = env_lock();
        let _tick_ms = ScopedEnvVar::set("PREGEN__SIMULATION__TICK_MS", "125");
        ConfigLoader::load_from_file(&config_file)
    };

    assert_eq!(config.unwrap().simulation.tick_ms, 125);
}

#[test]
fn test_loaded_config_drives_scheduler() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("pregen.toml");
    std::fs::write(
        &config_file,
        r#"
[scheduler]
batch_size = 10
period_ticks = 2
progress_interval = 1

[messaging]
suppress_operator_replies = false
"#,
    )
    .unwrap();
    let config: PregenConfig = {
        let _env = env_lock();
        ConfigLoader::load_from_file(&config_file).unwrap()
    };

    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::new(&config.scheduler, config.messaging.delivery_policy());
    let region = Region::from_tiles(WorldRef::new("world"), TilePos::new(0, 0), TilePos::new(9, 2));
    scheduler
        .start_region_job(&mut server, region, Requester::operator("admin"))
        .unwrap();

    let ticks = server.run_until_idle(&mut scheduler, 100);
    // Three invocations, two ticks apart.
    assert_eq!(ticks, 5);

    let direct = server.messages().direct_texts("admin");
    assert_eq!(
        direct[1..3],
        [
            "Task 1: Generated 10/30 chunks".to_string(),
            "Task 1: Generated 20/30 chunks".to_string(),
        ]
    );
    assert!(direct[3].starts_with("Task 1: Finished generating 30 chunks"));
}
