//! Progress Reporter
//!
//! Formats operator-facing status text and decides where it goes. Every
//! lifecycle notice travels on two channels:
//!
//! - a direct reply to the requester, skipped for operator-equivalent
//!   requesters when [`DeliveryPolicy::suppress_operator_replies`] is set,
//!   since they already receive the broadcast;
//! - an administrative broadcast, always delivered, prefixed with the
//!   requester's name.

use crate::host::{MessageSink, Requester};
use crate::job::{JobId, JobListing};
use owo_colors::OwoColorize;
use std::fmt;
use std::time::Duration;

/// Colour hint carried with a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Progress,
    Success,
    Error,
}

/// A single line of operator-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Tone::Plain, text)
    }

    /// Broadcast form: `[<requester>] <text>`.
    pub fn attributed(&self, requester: &Requester) -> Notice {
        Notice::new(self.tone, format!("[{}] {}", requester.name, self.text))
    }

    /// Render with ANSI colours for a terminal.
    pub fn colored(&self) -> String {
        match self.tone {
            Tone::Plain => self.text.clone(),
            Tone::Progress => self.text.yellow().to_string(),
            Tone::Success => self.text.green().to_string(),
            Tone::Error => self.text.red().to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Direct-reply suppression policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub suppress_operator_replies: bool,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            suppress_operator_replies: true,
        }
    }
}

impl DeliveryPolicy {
    pub fn replies_to(&self, requester: &Requester) -> bool {
        !(self.suppress_operator_replies && requester.privileged)
    }
}

/// Formatting plus delivery for job lifecycle notices.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    policy: DeliveryPolicy,
    interval: u64,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(DeliveryPolicy::default(), 2)
    }
}

impl Reporter {
    /// `interval` is the progress cadence in invocations; 2 means every other one.
    pub fn new(policy: DeliveryPolicy, interval: u64) -> Self {
        Self {
            policy,
            interval: interval.max(1),
        }
    }

    /// Whether the invocation that found the job at `iterations_before` reports progress.
    pub fn should_report(&self, iterations_before: u64) -> bool {
        iterations_before % self.interval == self.interval - 1
    }

    pub fn starting(id: JobId) -> Notice {
        Notice::plain(format!(
            "Starting chunk pregen with task ID {}. Prepare for major lag!",
            id
        ))
    }

    pub fn progress(id: JobId, tiles_done: u64, total_tiles: u64) -> Notice {
        Notice::new(
            Tone::Progress,
            format!("Task {}: Generated {}/{} chunks", id, tiles_done, total_tiles),
        )
    }

    pub fn finished(id: JobId, total_tiles: u64, elapsed: Duration) -> Notice {
        Notice::new(
            Tone::Success,
            format!(
                "Task {}: Finished generating {} chunks in {} seconds",
                id,
                total_tiles,
                elapsed_seconds(elapsed)
            ),
        )
    }

    pub fn cancelled(id: JobId, tiles_done: u64, total_tiles: u64) -> Notice {
        Notice::new(
            Tone::Progress,
            format!(
                "Task {}: Cancelled after {}/{} chunks",
                id, tiles_done, total_tiles
            ),
        )
    }

    pub fn not_running(raw_id: impl fmt::Display) -> Notice {
        Notice::new(
            Tone::Error,
            format!("Sorry, {} is not a running task ID.", raw_id),
        )
    }

    pub fn listing(listing: &JobListing) -> Notice {
        match listing {
            JobListing::Empty => Notice::plain("There are no running tasks"),
            JobListing::Running(ids) => Notice::plain(format!(
                "There are {} running: {}",
                ids.len(),
                ids.iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    /// Send `notice` on both channels.
    pub fn deliver<M>(&self, sink: &mut M, requester: &Requester, notice: &Notice)
    where
        M: MessageSink + ?Sized,
    {
        if self.policy.replies_to(requester) {
            sink.reply(requester, notice);
        }
        sink.broadcast_admin(&notice.attributed(requester));
    }
}

/// Whole seconds with millisecond precision, trailing zeros trimmed.
fn elapsed_seconds(elapsed: Duration) -> String {
    let secs = elapsed.as_millis() as f64 / 1000.0;
    let text = format!("{:.3}", secs);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}
