//! Simulated host server.
//!
//! Bundles an in-memory tile store, a tick loop and a message log behind the
//! host traits, and drives a [`RegionScheduler`] one tick at a time.

use crate::error::{HostError, TileError};
use crate::host::memory::MemoryWorlds;
use crate::host::tick_loop::TickLoop;
use crate::host::{MessageSink, Requester, TickScheduler, TileHost, WorldDirectory, WorldRef};
use crate::job::JobId;
use crate::progress::Notice;
use crate::region::TilePos;
use crate::scheduler::{RegionScheduler, TaskStatus};
use tracing::error;

/// Where a notice was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Direct(String),
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub channel: Channel,
    pub notice: Notice,
}

/// Append-only record of delivered notices.
#[derive(Debug, Default)]
pub struct MessageLog {
    deliveries: Vec<Delivery>,
}

impl MessageLog {
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Texts replied directly to `name`, in order.
    pub fn direct_texts(&self, name: &str) -> Vec<String> {
        self.deliveries
            .iter()
            .filter(|d| matches!(&d.channel, Channel::Direct(to) if to == name))
            .map(|d| d.notice.text.clone())
            .collect()
    }

    pub fn broadcast_texts(&self) -> Vec<String> {
        self.deliveries
            .iter()
            .filter(|d| d.channel == Channel::Admin)
            .map(|d| d.notice.text.clone())
            .collect()
    }

    /// Take everything delivered since the last drain.
    pub fn drain(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.deliveries)
    }
}

#[derive(Debug)]
pub struct SimulatedServer {
    worlds: MemoryWorlds,
    ticks: TickLoop,
    messages: MessageLog,
}

impl SimulatedServer {
    pub fn new<I, S>(world_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worlds: MemoryWorlds::new(world_names),
            ticks: TickLoop::new(),
            messages: MessageLog::default(),
        }
    }

    pub fn worlds(&self) -> &MemoryWorlds {
        &self.worlds
    }

    pub fn worlds_mut(&mut self) -> &mut MemoryWorlds {
        &mut self.worlds
    }

    pub fn ticks(&self) -> &TickLoop {
        &self.ticks
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    /// Advance one tick, invoking every due job handler in order.
    pub fn step(&mut self, scheduler: &mut RegionScheduler) -> Vec<(JobId, TaskStatus)> {
        let due = self.ticks.advance();
        self.dispatch(scheduler, due)
    }

    /// Skip idle ticks and run the next tick that has due handlers.
    pub fn step_to_next_due(
        &mut self,
        scheduler: &mut RegionScheduler,
        limit: u64,
    ) -> Vec<(JobId, TaskStatus)> {
        let due = self.ticks.advance_to_next_due(limit);
        self.dispatch(scheduler, due)
    }

    /// Fast-forward until no job is registered or `max_ticks` elapse.
    ///
    /// Returns the number of ticks that passed.
    pub fn run_until_idle(&mut self, scheduler: &mut RegionScheduler, max_ticks: u64) -> u64 {
        let start = self.ticks.tick();
        while !scheduler.is_idle() {
            let elapsed = self.ticks.tick() - start;
            if elapsed >= max_ticks {
                break;
            }
            self.step_to_next_due(scheduler, max_ticks - elapsed);
        }
        self.ticks.tick() - start
    }

    fn dispatch(
        &mut self,
        scheduler: &mut RegionScheduler,
        due: Vec<JobId>,
    ) -> Vec<(JobId, TaskStatus)> {
        let mut statuses = Vec::with_capacity(due.len());
        for id in due {
            match scheduler.run_task(id, self) {
                Ok(status) => statuses.push((id, status)),
                Err(e) => {
                    error!(job_id = %id, error = %e, "Batch invocation failed");
                    statuses.push((
                        id,
                        TaskStatus::Running {
                            progress_reported: false,
                        },
                    ));
                }
            }
        }
        statuses
    }
}

impl TileHost for SimulatedServer {
    fn materialize(&mut self, world: &WorldRef, pos: TilePos) -> Result<(), TileError> {
        self.worlds.materialize(world, pos)
    }

    fn release(
        &mut self,
        world: &WorldRef,
        pos: TilePos,
        save: bool,
        safe: bool,
    ) -> Result<(), TileError> {
        self.worlds.release(world, pos, save, safe)
    }
}

impl TickScheduler for SimulatedServer {
    fn schedule_repeating(&mut self, initial_delay: u64, period: u64) -> Result<JobId, HostError> {
        self.ticks.schedule_repeating(initial_delay, period)
    }

    fn cancel_task(&mut self, id: JobId) {
        self.ticks.cancel_task(id)
    }
}

impl MessageSink for SimulatedServer {
    fn reply(&mut self, to: &Requester, notice: &Notice) {
        self.messages.deliveries.push(Delivery {
            channel: Channel::Direct(to.name.clone()),
            notice: notice.clone(),
        });
    }

    fn broadcast_admin(&mut self, notice: &Notice) {
        self.messages.deliveries.push(Delivery {
            channel: Channel::Admin,
            notice: notice.clone(),
        });
    }
}

impl WorldDirectory for SimulatedServer {
    fn world(&self, name: &str) -> Option<WorldRef> {
        self.worlds.world(name)
    }

    fn world_names(&self) -> Vec<String> {
        self.worlds.world_names()
    }
}
