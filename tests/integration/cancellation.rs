//! Cancellation and unknown task ids

use chunk_pregen::command::{dispatch, CommandOutcome};
use chunk_pregen::host::server::SimulatedServer;
use chunk_pregen::host::{Requester, WorldRef};
use chunk_pregen::job::{JobId, JobListing};
use chunk_pregen::region::{Region, TilePos};
use chunk_pregen::scheduler::{RegionScheduler, TaskStatus};

fn large_region() -> Region {
    Region::from_tiles(WorldRef::new("world"), TilePos::new(0, 0), TilePos::new(99, 99))
}

#[test]
fn test_cancelled_job_performs_no_further_work() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let steve = Requester::player("steve");
    let id = scheduler
        .start_region_job(&mut server, large_region(), steve.clone())
        .unwrap();

    server.step_to_next_due(&mut scheduler, 100);
    server.step_to_next_due(&mut scheduler, 100);
    let done = scheduler.job(id).unwrap().tiles_done();
    assert_eq!(done, 600);

    let outcome = dispatch(&format!("cancel {}", id), &steve, &mut scheduler, &mut server).unwrap();
    assert_eq!(outcome, CommandOutcome::Cancelled(id));
    assert_eq!(scheduler.list_jobs(), JobListing::Empty);
    assert!(!server.ticks().is_scheduled(id));

    let calls = server.worlds().stats().materialize_calls;
    for _ in 0..100 {
        assert!(server.step(&mut scheduler).is_empty());
    }
    assert_eq!(scheduler.run_task(id, &mut server).unwrap(), TaskStatus::NotRunning);
    assert_eq!(server.worlds().stats().materialize_calls, calls);
    assert_eq!(
        server.worlds().generated_count(&WorldRef::new("world")) as u64,
        done
    );

    let direct = server.messages().direct_texts("steve");
    assert!(direct.iter().all(|t| !t.contains("Finished")));
    assert_eq!(
        direct.last().unwrap(),
        &format!("Task {}: Cancelled after 600/10000 chunks", id)
    );
}

#[test]
fn test_unknown_id_leaves_running_jobs_alone() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let admin = Requester::operator("admin");
    let id = scheduler
        .start_region_job(&mut server, large_region(), admin.clone())
        .unwrap();

    let outcome = dispatch("cancel 42", &admin, &mut scheduler, &mut server).unwrap();
    assert_eq!(outcome, CommandOutcome::NotRunning(42));
    assert_eq!(scheduler.list_jobs(), JobListing::Running(vec![id]));
    assert_eq!(
        server.messages().direct_texts("admin"),
        vec!["Sorry, 42 is not a running task ID.".to_string()]
    );
}

#[test]
fn test_cancel_twice() {
    let mut server = SimulatedServer::new(["world"]);
    let mut scheduler = RegionScheduler::default();
    let admin = Requester::operator("admin");
    let id = scheduler
        .start_region_job(&mut server, large_region(), admin.clone())
        .unwrap();

    assert!(scheduler.cancel_job(&mut server, id, &admin));
    assert!(!scheduler.cancel_job(&mut server, id, &admin));
    assert!(!scheduler.cancel_job(&mut server, JobId::new(0), &admin));
}
