//! Job Registry
//!
//! Maps task identifiers to running jobs. Presence of an id means the host's
//! recurring primitive will still invoke it; absence means the job was never
//! created or has already terminated.

use crate::error::HostError;
use crate::host::{Requester, TickScheduler};
use crate::job::{Job, JobId, JobState};
use crate::region::Region;
use std::collections::HashMap;
use tracing::{debug, info};

/// Recurring-invocation timing for new jobs, in host ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub initial_delay: u64,
    pub period: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            initial_delay: 0,
            period: 15,
        }
    }
}

/// Snapshot of running ids for the operator status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobListing {
    Empty,
    Running(Vec<JobId>),
}

impl JobListing {
    pub fn ids(&self) -> &[JobId] {
        match self {
            JobListing::Empty => &[],
            JobListing::Running(ids) => ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, JobListing::Empty)
    }
}

#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: HashMap<JobId, Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a recurring task through the host and register a job under its handle.
    pub fn create<S>(
        &mut self,
        scheduler: &mut S,
        timing: Timing,
        region: Region,
        requester: Requester,
    ) -> Result<JobId, HostError>
    where
        S: TickScheduler + ?Sized,
    {
        let id = scheduler.schedule_repeating(timing.initial_delay, timing.period)?;
        info!(
            job_id = %id,
            world = %region.world(),
            total_tiles = region.total_tiles(),
            requester = %requester.name,
            "Job created"
        );
        self.jobs.insert(id, Job::new(id, region, requester));
        Ok(id)
    }

    /// Sorted snapshot of running ids.
    pub fn list(&self) -> JobListing {
        if self.jobs.is_empty() {
            return JobListing::Empty;
        }
        let mut ids: Vec<JobId> = self.jobs.keys().copied().collect();
        ids.sort_unstable();
        JobListing::Running(ids)
    }

    /// Cancel a running job. Missing ids are a no-op and return `None`.
    pub fn cancel<S>(&mut self, scheduler: &mut S, id: JobId) -> Option<Job>
    where
        S: TickScheduler + ?Sized,
    {
        let mut job = self.jobs.remove(&id)?;
        scheduler.cancel_task(id);
        job.finish(JobState::Cancelled);
        info!(job_id = %id, tiles_done = job.tiles_done(), "Job cancelled");
        Some(job)
    }

    /// Remove an exhausted job and release its host slot.
    pub fn complete<S>(&mut self, scheduler: &mut S, id: JobId) -> Option<Job>
    where
        S: TickScheduler + ?Sized,
    {
        let mut job = self.jobs.remove(&id)?;
        scheduler.cancel_task(id);
        job.finish(JobState::Exhausted);
        debug!(job_id = %id, "Job removed after exhaustion");
        Some(job)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.jobs.contains_key(&id)
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::tick_loop::TickLoop;
    use crate::host::WorldRef;
    use crate::region::TilePos;

    fn region() -> Region {
        Region::from_tiles(WorldRef::new("world"), TilePos::new(0, 0), TilePos::new(1, 1))
    }

    #[test]
    fn test_create_registers_with_host() {
        let mut ticks = TickLoop::new();
        let mut registry = JobRegistry::new();
        let id = registry
            .create(&mut ticks, Timing::default(), region(), Requester::operator("console"))
            .unwrap();

        assert!(registry.contains(id));
        assert!(ticks.is_scheduled(id));
        assert_eq!(registry.list(), JobListing::Running(vec![id]));
    }

    #[test]
    fn test_empty_listing_is_distinct() {
        let registry = JobRegistry::new();
        assert_eq!(registry.list(), JobListing::Empty);
        assert!(registry.list().is_empty());
        assert!(registry.list().ids().is_empty());
    }

    #[test]
    fn test_cancel_missing_is_noop() {
        let mut ticks = TickLoop::new();
        let mut registry = JobRegistry::new();
        registry
            .create(&mut ticks, Timing::default(), region(), Requester::operator("console"))
            .unwrap();

        assert!(registry.cancel(&mut ticks, JobId::new(42)).is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(ticks.scheduled_count(), 1);
    }

    #[test]
    fn test_cancel_removes_and_deregisters() {
        let mut ticks = TickLoop::new();
        let mut registry = JobRegistry::new();
        let id = registry
            .create(&mut ticks, Timing::default(), region(), Requester::operator("console"))
            .unwrap();

        let job = registry.cancel(&mut ticks, id).unwrap();
        assert_eq!(job.state(), JobState::Cancelled);
        assert!(!registry.contains(id));
        assert!(!ticks.is_scheduled(id));
        assert!(registry.cancel(&mut ticks, id).is_none());
    }

    #[test]
    fn test_listing_is_sorted() {
        let mut ticks = TickLoop::new();
        let mut registry = JobRegistry::new();
        for _ in 0..3 {
            registry
                .create(&mut ticks, Timing::default(), region(), Requester::operator("console"))
                .unwrap();
        }
        let ids: Vec<u32> = registry.list().ids().iter().map(|id| id.as_u32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
