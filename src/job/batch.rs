//! Batch Executor
//!
//! Runs one bounded slice of a job: materialize up to `batch_size` tiles from
//! the job's cursor, then release every tile that was materialized. The
//! release pass runs after the whole batch so the host can batch its own
//! eviction bookkeeping.

use crate::error::TileError;
use crate::host::TileHost;
use crate::job::Job;
use crate::region::TilePos;
use tracing::{debug, warn};

/// Fixed batch-size policy and release flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_size: usize,
    pub save_on_release: bool,
    pub safe_release: bool,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: 300,
            save_on_release: true,
            safe_release: true,
        }
    }
}

/// Result of a single invocation of [`advance_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Tiles successfully materialized by this batch.
    pub materialized: u64,
    /// The region has no tiles left.
    pub exhausted: bool,
    /// First tile failure, if the batch was cut short or a release failed.
    pub failure: Option<TileError>,
}

/// Advance `job` by one batch.
///
/// A materialization failure ends the batch early; the failed tile is
/// consumed so the next invocation resumes after it. `tiles_done` and
/// `iteration_count` are updated whether or not the region is exhausted.
pub fn advance_batch<T>(job: &mut Job, tiles: &mut T, policy: &BatchPolicy) -> BatchOutcome
where
    T: TileHost + ?Sized,
{
    let world = job.region.world().clone();
    let remaining = usize::try_from(job.total_tiles().saturating_sub(job.tiles_done))
        .unwrap_or(usize::MAX);
    let mut materialized: Vec<TilePos> = Vec::with_capacity(policy.batch_size.min(remaining));
    let mut failure: Option<TileError> = None;

    let mut enumeration = job.region.tiles_from(job.cursor);
    for pos in enumeration.by_ref().take(policy.batch_size) {
        match tiles.materialize(&world, pos) {
            Ok(()) => materialized.push(pos),
            Err(e) => {
                warn!(job_id = %job.id, tile = %pos, error = %e, "Tile materialization failed");
                job.failed_tiles += 1;
                failure = Some(e);
                break;
            }
        }
    }
    job.cursor = enumeration.cursor();

    for pos in &materialized {
        if let Err(e) = tiles.release(&world, *pos, policy.save_on_release, policy.safe_release) {
            warn!(job_id = %job.id, tile = %pos, error = %e, "Tile release failed");
            failure.get_or_insert(e);
        }
    }

    let count = materialized.len() as u64;
    job.tiles_done += count;
    job.iteration_count += 1;

    debug!(
        job_id = %job.id,
        iteration = job.iteration_count,
        materialized = count,
        tiles_done = job.tiles_done,
        total_tiles = job.total_tiles(),
        "Batch complete"
    );

    BatchOutcome {
        materialized: count,
        exhausted: job.cursor.is_none(),
        failure,
    }
}
