//! Simulated host tick loop.
//!
//! Keeps a table of recurring tasks keyed by handle. Each call to
//! [`TickLoop::advance`] moves the clock forward by one tick and returns the
//! handles due on that tick, in registration order. Handles are the lowest
//! free positive integers, so an id is only reused after its task is cancelled.

use crate::error::HostError;
use crate::host::TickScheduler;
use crate::job::JobId;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct RecurringTask {
    next_due: u64,
    period: u64,
    registered: u64,
}

#[derive(Debug, Default)]
pub struct TickLoop {
    tick: u64,
    registrations: u64,
    tasks: BTreeMap<JobId, RecurringTask>,
}

impl TickLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_scheduled(&self, id: JobId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn scheduled_count(&self) -> usize {
        self.tasks.len()
    }

    /// Advance one tick and collect the handles due on it.
    pub fn advance(&mut self) -> Vec<JobId> {
        self.tick += 1;
        let now = self.tick;
        let mut due: Vec<(u64, JobId)> = Vec::new();
        for (id, task) in self.tasks.iter_mut() {
            if task.next_due <= now {
                task.next_due = now.saturating_add(task.period);
                due.push((task.registered, *id));
            }
        }
        due.sort_unstable();
        if !due.is_empty() {
            trace!(tick = now, due = due.len(), "Tick loop dispatching tasks");
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Advance until the next tick with due work, giving up after `limit` ticks.
    pub fn advance_to_next_due(&mut self, limit: u64) -> Vec<JobId> {
        for _ in 0..limit {
            let due = self.advance();
            if !due.is_empty() {
                return due;
            }
        }
        Vec::new()
    }

    fn next_free_id(&self) -> Option<JobId> {
        let mut candidate: u32 = 1;
        for id in self.tasks.keys() {
            if id.as_u32() != candidate {
                break;
            }
            candidate = candidate.checked_add(1)?;
        }
        Some(JobId::new(candidate))
    }
}

impl TickScheduler for TickLoop {
    fn schedule_repeating(&mut self, initial_delay: u64, period: u64) -> Result<JobId, HostError> {
        if period == 0 {
            return Err(HostError::ScheduleRejected(
                "period must be at least one tick".to_string(),
            ));
        }
        let id = self
            .next_free_id()
            .ok_or_else(|| HostError::ScheduleRejected("task id space exhausted".to_string()))?;
        self.registrations += 1;
        self.tasks.insert(
            id,
            RecurringTask {
                // A zero delay still waits for the next tick.
                next_due: self.tick.saturating_add(initial_delay.max(1)),
                period,
                registered: self.registrations,
            },
        );
        Ok(id)
    }

    fn cancel_task(&mut self, id: JobId) {
        self.tasks.remove(&id);
    }
}
