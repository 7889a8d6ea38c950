//! End-to-end job lifecycle on the simulated server

use chunk_pregen::command::{dispatch, CommandOutcome};
use chunk_pregen::config::SchedulerConfig;
use chunk_pregen::host::server::SimulatedServer;
use chunk_pregen::host::{Requester, WorldRef};
use chunk_pregen::progress::DeliveryPolicy;
use chunk_pregen::region::{BlockBounds, Region, TilePos};
use chunk_pregen::scheduler::{RegionScheduler, TaskStatus};

fn start(
    server: &mut SimulatedServer,
    scheduler: &mut RegionScheduler,
    line: &str,
    requester: &Requester,
) -> chunk_pregen::job::JobId {
    match dispatch(line, requester, scheduler, server).unwrap() {
        CommandOutcome::Started(id) => id,
        other => panic!("expected a started job, got {other:?}"),
    }
}

#[test]
fn test_small_region_finishes_in_one_invocation() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let admin = Requester::operator("admin");

    let id = start(&mut server, &mut scheduler, "pregen generate world 0 0 31 31", &admin);
    let statuses = server.step(&mut scheduler);

    assert_eq!(statuses, vec![(id, TaskStatus::Finished)]);
    assert!(scheduler.is_idle());

    let world = WorldRef::new("world");
    assert_eq!(server.worlds().generated_count(&world), 4);
    assert_eq!(server.worlds().resident_count(&world), 0);
    for (x, z) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert!(server.worlds().is_saved(&world, TilePos::new(x, z)));
    }

    let broadcasts = server.messages().broadcast_texts();
    assert_eq!(broadcasts.len(), 2);
    assert!(broadcasts[1].starts_with("[admin] Task 1: Finished generating 4 chunks in "));
    assert!(broadcasts[1].ends_with(" seconds"));
}

#[test]
fn test_progress_then_finish_for_player() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let region = Region::from_tiles(WorldRef::new("world"), TilePos::new(0, 0), TilePos::new(69, 9));
    let id = scheduler
        .start_region_job(&mut server, region, Requester::player("steve"))
        .unwrap();

    let ticks = server.run_until_idle(&mut scheduler, 1_000);
    assert_eq!(ticks, 31);

    let direct = server.messages().direct_texts("steve");
    assert_eq!(
        direct[..2],
        [
            format!("Starting chunk pregen with task ID {}. Prepare for major lag!", id),
            format!("Task {}: Generated 600/700 chunks", id),
        ]
    );
    assert!(direct[2].starts_with(&format!("Task {}: Finished generating 700 chunks in ", id)));

    let broadcasts = server.messages().broadcast_texts();
    assert_eq!(broadcasts.len(), 3);
    assert!(broadcasts.iter().all(|b| b.starts_with("[steve] ")));
}

#[test]
fn test_every_tile_materialized_exactly_once() {
    let mut server = SimulatedServer::new(["world_nether"]);
    let config = SchedulerConfig {
        batch_size: 7,
        period_ticks: 1,
        ..SchedulerConfig::default()
    };
    let mut scheduler = RegionScheduler::new(&config, DeliveryPolicy::default());
    let world = WorldRef::new("world_nether");
    let region = scheduler.region_for(world.clone(), BlockBounds::new(-40, -20, 40, 20));
    let total = region.total_tiles();
    scheduler
        .start_region_job(&mut server, region.clone(), Requester::operator("console"))
        .unwrap();

    server.run_until_idle(&mut scheduler, 10_000);

    assert_eq!(server.worlds().generated_count(&world) as u64, total);
    for pos in region.tiles() {
        assert_eq!(server.worlds().materialize_count(&world, pos), 1, "tile {pos}");
    }
    assert!(server.worlds().stats().peak_resident <= 7);
}

#[test]
fn test_concurrent_jobs_get_distinct_ids() {
    let mut server = SimulatedServer::new(["world", "world_the_end"]);
    let mut scheduler = RegionScheduler::default();
    let admin = Requester::operator("admin");

    let a = start(&mut server, &mut scheduler, "generate world 0 0 511 511", &admin);
    let b = start(&mut server, &mut scheduler, "generate world_the_end -512 -512 -1 -1", &admin);
    assert_ne!(a, b);
    assert_eq!(scheduler.list_jobs().ids(), &[a, b]);

    server.run_until_idle(&mut scheduler, 10_000);
    assert!(scheduler.list_jobs().is_empty());
    assert_eq!(server.worlds().generated_count(&WorldRef::new("world")), 1024);
    assert_eq!(server.worlds().generated_count(&WorldRef::new("world_the_end")), 1024);
}

#[test]
fn test_ids_are_reused_after_release() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let admin = Requester::operator("admin");

    let first = start(&mut server, &mut scheduler, "generate world 0 0 15 15", &admin);
    server.run_until_idle(&mut scheduler, 100);
    let second = start(&mut server, &mut scheduler, "generate world 16 16 31 31", &admin);
    assert_eq!(first, second);
}
