//! Property-based tests for region enumeration and batch resumption

use chunk_pregen::error::TileError;
use chunk_pregen::host::{Requester, TileHost, WorldRef};
use chunk_pregen::job::{advance_batch, BatchPolicy, Job, JobId};
use chunk_pregen::region::{align_ceil, align_floor, BlockBounds, Region, TileGrid, TilePos};
use proptest::prelude::*;
use std::collections::HashSet;

/// Tile host that records every call in order.
#[derive(Default)]
struct Recorder {
    materialized: Vec<TilePos>,
    released: Vec<TilePos>,
}

impl TileHost for Recorder {
    fn materialize(&mut self, _world: &WorldRef, pos: TilePos) -> Result<(), TileError> {
        self.materialized.push(pos);
        Ok(())
    }

    fn release(
        &mut self,
        _world: &WorldRef,
        pos: TilePos,
        _save: bool,
        _safe: bool,
    ) -> Result<(), TileError> {
        self.released.push(pos);
        Ok(())
    }
}

fn small_region() -> impl Strategy<Value = Region> {
    (-200i32..200, -200i32..200, 1i32..25, 1i32..25).prop_map(|(x, z, w, d)| {
        Region::from_tiles(
            WorldRef::new("world"),
            TilePos::new(x, z),
            TilePos::new(x + w - 1, z + d - 1),
        )
    })
}

fn row_major(region: &Region) -> Vec<TilePos> {
    let mut expected = Vec::new();
    for z in region.min().z..=region.max().z {
        for x in region.min().x..=region.max().x {
            expected.push(TilePos::new(x, z));
        }
    }
    expected
}

proptest! {
    #[test]
    fn prop_batches_cover_region_in_row_major_order(
        region in small_region(),
        batch_size in 1usize..400,
    ) {
        let total = region.total_tiles();
        let mut job = Job::new(JobId::new(1), region.clone(), Requester::operator("console"));
        let policy = BatchPolicy { batch_size, ..BatchPolicy::default() };
        let mut host = Recorder::default();

        let mut materialized_sum = 0u64;
        let mut invocations = 0u64;
        loop {
            let outcome = advance_batch(&mut job, &mut host, &policy);
            invocations += 1;
            prop_assert!(outcome.materialized <= batch_size as u64);
            prop_assert!(outcome.failure.is_none());
            materialized_sum += outcome.materialized;
            if outcome.exhausted {
                break;
            }
            prop_assert!(invocations <= total);
        }

        let expected = row_major(&region);
        prop_assert_eq!(&host.materialized, &expected);
        prop_assert_eq!(&host.released, &expected);
        prop_assert_eq!(materialized_sum, total);
        prop_assert_eq!(job.tiles_done(), total);
        prop_assert_eq!(invocations, total.div_ceil(batch_size as u64).max(1));
    }

    #[test]
    fn prop_resuming_from_any_cursor_continues_the_sequence(
        region in small_region(),
        split in 0usize..625,
    ) {
        let all: Vec<TilePos> = region.tiles().collect();
        let split = split % all.len();
        let mut iter = region.tiles();
        for _ in 0..split {
            iter.next();
        }
        let rest: Vec<TilePos> = region.tiles_from(iter.cursor()).collect();
        prop_assert_eq!(&rest[..], &all[split..]);
    }

    #[test]
    fn prop_block_bounds_cover_every_block(
        a in -100_000i32..100_000,
        b in -100_000i32..100_000,
        c in -100_000i32..100_000,
        d in -100_000i32..100_000,
    ) {
        let grid = TileGrid::default();
        let region = Region::from_blocks(WorldRef::new("world"), BlockBounds::new(a, b, c, d), grid);
        prop_assert!(region.min().x <= region.max().x);
        prop_assert!(region.min().z <= region.max().z);

        // Every corner block lands in a tile of the region.
        for (bx, bz) in [(a, b), (c, d), (a, d), (c, b)] {
            let tile = TilePos::new(bx >> grid.shift, bz >> grid.shift);
            prop_assert!(region.contains(tile), "block ({}, {}) -> {}", bx, bz, tile);
        }
    }

    #[test]
    fn prop_alignment_brackets_value(n in -1_000_000i64..1_000_000, m in 1i64..512) {
        let lo = align_floor(n, m);
        let hi = align_ceil(n, m);
        prop_assert!(lo <= n && n <= hi);
        prop_assert_eq!(lo.rem_euclid(m), 0);
        prop_assert_eq!(hi.rem_euclid(m), 0);
        prop_assert!(hi - lo < 2 * m);
    }
}

#[test]
fn test_region_tiles_are_distinct() {
    let region = Region::from_tiles(WorldRef::new("world"), TilePos::new(-3, -3), TilePos::new(3, 3));
    let unique: HashSet<TilePos> = region.tiles().collect();
    assert_eq!(unique.len() as u64, region.total_tiles());
}
