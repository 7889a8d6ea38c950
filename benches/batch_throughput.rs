//! Batch Throughput Benchmarks
//!
//! Cost of one batch against the in-memory tile store, and of a whole region
//! run through the simulated server.

use chunk_pregen::host::memory::MemoryWorlds;
use chunk_pregen::host::server::SimulatedServer;
use chunk_pregen::host::{Requester, WorldRef};
use chunk_pregen::job::{advance_batch, BatchPolicy, Job, JobId};
use chunk_pregen::region::{Region, TilePos};
use chunk_pregen::scheduler::RegionScheduler;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn square(side: i32) -> Region {
    Region::from_tiles(
        WorldRef::new("world"),
        TilePos::new(0, 0),
        TilePos::new(side - 1, side - 1),
    )
}

fn benchmark_single_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_batch");
    for batch_size in [50usize, 300, 1000] {
        let policy = BatchPolicy {
            batch_size,
            ..BatchPolicy::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &policy, |b, policy| {
            b.iter(|| {
                let mut worlds = MemoryWorlds::new(["world"]);
                let mut job = Job::new(JobId::new(1), square(64), Requester::operator("bench"));
                black_box(advance_batch(&mut job, &mut worlds, policy))
            });
        });
    }
    group.finish();
}

fn benchmark_full_region(c: &mut Criterion) {
    c.bench_function("full_region_128x128", |b| {
        b.iter(|| {
            let mut server = SimulatedServer::new(["world"]);
            let mut scheduler = RegionScheduler::default();
            scheduler
                .start_region_job(&mut server, square(128), Requester::operator("bench"))
                .unwrap();
            black_box(server.run_until_idle(&mut scheduler, u64::MAX))
        });
    });
}

criterion_group!(benches, benchmark_single_batch, benchmark_full_region);
criterion_main!(benches);
