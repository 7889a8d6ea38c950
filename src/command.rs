//! Operator command front end.
//!
//! Parses `pregen ...` command lines, gates them on operator identity and
//! forwards validated requests to the [`crate::scheduler::RegionScheduler`].
//! The usage text is rendered from a small command tree.

pub mod dispatch;
pub mod tree;

pub use dispatch::{dispatch, CommandOutcome};
pub use tree::{pregen_tree, render, render_with, CommandNode, Palette};
