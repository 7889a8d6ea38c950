//! Operator console driven from a scripted input stream

use chunk_pregen::cli::{run_console, ConsoleOptions};
use chunk_pregen::config::PregenConfig;
use std::time::Duration;

async fn run_script(config: &PregenConfig, script: &str) -> String {
    let options = ConsoleOptions {
        tick: Duration::from_millis(config.simulation.tick_ms),
        color: false,
    };
    let mut output = Vec::new();
    run_console(config, options, script.as_bytes(), &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_listing_with_no_jobs() {
    let output = run_script(&PregenConfig::default(), "listTasks\nquit\n").await;
    assert_eq!(output, "There are no running tasks\n");
}

#[tokio::test(start_paused = true)]
async fn test_scripted_session_runs_to_completion() {
    let mut config = PregenConfig::default();
    config.simulation.operator = "ops".to_string();
    let script = "\
pregen generate world 0 0 31 31
pregen generate world_nether -16 -16 15 15
pregen listTasks
";
    let output = run_script(&config, script).await;

    assert!(output.contains("(admin) [ops] Starting chunk pregen with task ID 1. Prepare for major lag!"));
    assert!(output.contains("(admin) [ops] Starting chunk pregen with task ID 2. Prepare for major lag!"));
    assert!(output.contains("There are 2 running: 1, 2"));
    assert!(output.contains("(admin) [ops] Task 1: Finished generating 4 chunks in "));
    assert!(output.contains("(admin) [ops] Task 2: Finished generating 4 chunks in "));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_world_and_cancel_replies() {
    let output = run_script(
        &PregenConfig::default(),
        "generate atlantis 0 0 1 1\ncancel 3\nquit\n",
    )
    .await;
    assert_eq!(
        output,
        "World not found 'atlantis'\nSorry, 3 is not a running task ID.\n"
    );
}
