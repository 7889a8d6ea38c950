//! Jobs: one in-flight pre-generation request.
//!
//! A [`Job`] is owned by the [`registry::JobRegistry`] while it runs and is
//! mutated only by [`batch::advance_batch`]. The host invokes at most one
//! handler at a time, so a job never has two writers.

pub mod batch;
pub mod registry;

use crate::host::Requester;
use crate::region::{Region, TilePos};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

pub use batch::{advance_batch, BatchOutcome, BatchPolicy};
pub use registry::{JobListing, JobRegistry};

/// Task identifier issued by the host's recurring-invocation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(u32);

impl JobId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(JobId)
    }
}

impl TryFrom<i64> for JobId {
    type Error = std::num::TryFromIntError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        u32::try_from(raw).map(JobId)
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Running,
    Exhausted,
    Cancelled,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Running => "running",
            JobState::Exhausted => "exhausted",
            JobState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Running)
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    region: Region,
    cursor: Option<TilePos>,
    tiles_done: u64,
    failed_tiles: u64,
    iteration_count: u64,
    started_at: Instant,
    started_at_utc: DateTime<Utc>,
    requester: Requester,
    state: JobState,
}

impl Job {
    pub fn new(id: JobId, region: Region, requester: Requester) -> Self {
        let cursor = Some(region.start());
        Self {
            id,
            region,
            cursor,
            tiles_done: 0,
            failed_tiles: 0,
            iteration_count: 0,
            started_at: Instant::now(),
            started_at_utc: Utc::now(),
            requester,
            state: JobState::Running,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Next tile to materialize; `None` once the region is exhausted.
    pub fn cursor(&self) -> Option<TilePos> {
        self.cursor
    }

    pub fn tiles_done(&self) -> u64 {
        self.tiles_done
    }

    /// Tiles skipped because the tile primitive failed on them.
    pub fn failed_tiles(&self) -> u64 {
        self.failed_tiles
    }

    pub fn total_tiles(&self) -> u64 {
        self.region.total_tiles()
    }

    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at_utc
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_none()
    }

    pub(crate) fn finish(&mut self, state: JobState) {
        self.state = state;
    }
}
