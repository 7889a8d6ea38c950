//! Host boundary
//!
//! The scheduler never owns a tick loop, a world, or a chat transport. It
//! talks to the host application through the traits in this module:
//!
//! - [`TileHost`] forces a tile to be computed and evicts it afterwards.
//! - [`TickScheduler`] registers a recurring invocation and hands back the
//!   opaque handle that doubles as the operator-visible task id.
//! - [`MessageSink`] delivers operator replies and administrative broadcasts.
//! - [`WorldDirectory`] resolves world names typed by operators.
//!
//! In-memory implementations of all four live in [`memory`], [`tick_loop`]
//! and [`server`]; the `pregen` binary drives them.

pub mod memory;
pub mod server;
pub mod tick_loop;

use crate::error::{HostError, TileError};
use crate::job::JobId;
use crate::progress::Notice;
use crate::region::TilePos;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a host world, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldRef(String);

impl WorldRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the operator issuing a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requester {
    pub name: String,
    /// Operator-equivalent identity; also a recipient of administrative broadcasts.
    pub privileged: bool,
}

impl Requester {
    pub fn operator(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: true,
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileged: false,
        }
    }
}

/// Tile materialization primitive.
///
/// Both operations must be idempotent: materializing a resident tile or
/// releasing an evicted one is not an error.
pub trait TileHost {
    fn materialize(&mut self, world: &WorldRef, pos: TilePos) -> Result<(), TileError>;

    fn release(
        &mut self,
        world: &WorldRef,
        pos: TilePos,
        save: bool,
        safe: bool,
    ) -> Result<(), TileError>;
}

/// Recurring-invocation primitive of the host tick loop.
pub trait TickScheduler {
    /// Register a recurring invocation; the returned handle is the task id.
    fn schedule_repeating(&mut self, initial_delay: u64, period: u64) -> Result<JobId, HostError>;

    /// Deregister a handle. Unknown handles are ignored.
    fn cancel_task(&mut self, id: JobId);
}

/// Message transport towards operators.
pub trait MessageSink {
    /// Direct reply to one requester.
    fn reply(&mut self, to: &Requester, notice: &Notice);

    /// Always-delivered administrative broadcast.
    fn broadcast_admin(&mut self, notice: &Notice);
}

/// World lookup for operator input.
pub trait WorldDirectory {
    fn world(&self, name: &str) -> Option<WorldRef>;

    fn world_names(&self) -> Vec<String>;
}

/// Everything the scheduler adapter needs from a host.
pub trait Host: TileHost + TickScheduler + MessageSink {}

impl<T: TileHost + TickScheduler + MessageSink> Host for T {}
