//! Chunk Pregen: Incremental Region Pre-Generation
//!
//! Forces every tile of a rectangular region of a voxel world to be computed
//! ahead of time, a bounded batch per host tick, so the host stays
//! responsive while the region fills in. Jobs are started, listed and
//! cancelled by operators and report progress on a fixed cadence.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod job;
pub mod logging;
pub mod progress;
pub mod region;
pub mod scheduler;
