//! Scheduler Adapter
//!
//! Glue between the job registry and the host tick loop. The host invokes
//! [`RegionScheduler::run_task`] with the handle it issued whenever a job's
//! recurring slot comes due; everything else is operator-driven.
//!
//! The host runs one handler at a time, so the registry is owned here
//! without locking.

use crate::config::SchedulerConfig;
use crate::error::PregenError;
use crate::host::{Host, MessageSink, Requester, TickScheduler, WorldRef};
use crate::job::registry::Timing;
use crate::job::{advance_batch, BatchPolicy, Job, JobId, JobListing, JobRegistry};
use crate::progress::{DeliveryPolicy, Reporter};
use crate::region::{BlockBounds, Region, TileGrid};
use tracing::{info, warn};

/// What an invocation of [`RegionScheduler::run_task`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// A batch ran and the job is still registered.
    Running { progress_reported: bool },
    /// The region was exhausted; the job is gone.
    Finished,
    /// No job is registered under the handle.
    NotRunning,
}

#[derive(Debug)]
pub struct RegionScheduler {
    registry: JobRegistry,
    policy: BatchPolicy,
    timing: Timing,
    grid: TileGrid,
    reporter: Reporter,
}

impl Default for RegionScheduler {
    fn default() -> Self {
        Self::new(&SchedulerConfig::default(), DeliveryPolicy::default())
    }
}

impl RegionScheduler {
    pub fn new(config: &SchedulerConfig, delivery: DeliveryPolicy) -> Self {
        Self {
            registry: JobRegistry::new(),
            policy: config.batch_policy(),
            timing: config.timing(),
            grid: config.tile_grid(),
            reporter: Reporter::new(delivery, config.progress_interval),
        }
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Align operator block bounds using this scheduler's tile grid.
    pub fn region_for(&self, world: WorldRef, bounds: BlockBounds) -> Region {
        Region::from_blocks(world, bounds, self.grid)
    }

    /// Register a new job and announce it.
    pub fn start_region_job<H>(
        &mut self,
        host: &mut H,
        region: Region,
        requester: Requester,
    ) -> Result<JobId, PregenError>
    where
        H: Host + ?Sized,
    {
        let id = self
            .registry
            .create(host, self.timing, region, requester.clone())?;
        self.reporter
            .deliver(host, &requester, &Reporter::starting(id));
        Ok(id)
    }

    /// Cancel a running job on behalf of `requester`.
    ///
    /// Unknown ids get a direct "not a running task" reply and return `false`.
    pub fn cancel_job<H>(&mut self, host: &mut H, id: JobId, requester: &Requester) -> bool
    where
        H: TickScheduler + MessageSink + ?Sized,
    {
        match self.registry.cancel(host, id) {
            Some(job) => {
                let notice = Reporter::cancelled(id, job.tiles_done(), job.total_tiles());
                self.reporter.deliver(host, requester, &notice);
                true
            }
            None => {
                warn!(job_id = %id, requester = %requester.name, "Cancel requested for unknown task");
                host.reply(requester, &Reporter::not_running(id));
                false
            }
        }
    }

    pub fn list_jobs(&self) -> JobListing {
        self.registry.list()
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.registry.get(id)
    }

    pub fn is_idle(&self) -> bool {
        self.registry.is_empty()
    }

    /// Per-invocation callback for the host tick loop.
    ///
    /// Runs one batch for `id`. A tile failure is returned as an error after
    /// the job's bookkeeping is updated; the job stays registered and resumes
    /// on its next invocation.
    pub fn run_task<H>(&mut self, id: JobId, host: &mut H) -> Result<TaskStatus, PregenError>
    where
        H: Host + ?Sized,
    {
        let Some(job) = self.registry.get_mut(id) else {
            return Ok(TaskStatus::NotRunning);
        };

        let iterations_before = job.iteration_count();
        let outcome = advance_batch(job, host, &self.policy);

        if outcome.exhausted {
            if let Some(e) = &outcome.failure {
                warn!(job_id = %id, error = %e, "Final batch had tile failures");
            }
            if let Some(done) = self.registry.complete(host, id) {
                self.finish(host, &done);
            }
            return Ok(TaskStatus::Finished);
        }

        let progress_reported = self.reporter.should_report(iterations_before);
        if progress_reported {
            let notice = Reporter::progress(id, job.tiles_done(), job.total_tiles());
            let requester = job.requester().clone();
            self.reporter.deliver(host, &requester, &notice);
        }

        match outcome.failure {
            Some(e) => Err(PregenError::Tile(e)),
            None => Ok(TaskStatus::Running { progress_reported }),
        }
    }

    fn finish<M>(&self, sink: &mut M, job: &Job)
    where
        M: MessageSink + ?Sized,
    {
        let elapsed = job.elapsed();
        info!(
            job_id = %job.id(),
            world = %job.region().world(),
            tiles_done = job.tiles_done(),
            failed_tiles = job.failed_tiles(),
            invocations = job.iteration_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Job finished"
        );
        let notice = Reporter::finished(job.id(), job.total_tiles(), elapsed);
        self.reporter.deliver(sink, job.requester(), &notice);
    }
}
