//! Interactive operator console.
//!
//! A tokio interval drives the simulated server one tick at a time while
//! operator lines are read from the input stream and dispatched as
//! `pregen` commands. Delivered messages are written out after every event.
//!
//! `quit` ends the session at once. End of input stops reading but keeps
//! ticking until every job has terminated.

use crate::command::dispatch;
use crate::config::PregenConfig;
use crate::host::server::{Channel, SimulatedServer};
use crate::host::Requester;
use crate::scheduler::RegionScheduler;
use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    /// Wall-clock length of one host tick
    pub tick: Duration,
    /// Write notices with ANSI colours
    pub color: bool,
}

/// Counters reported when the console exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleSummary {
    pub ticks: u64,
    pub commands: u64,
    /// Jobs still registered at exit
    pub unfinished: usize,
}

impl fmt::Display for ConsoleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Console closed after {} ticks and {} commands ({} tasks still running)",
            self.ticks, self.commands, self.unfinished
        )
    }
}

pub async fn run_console<R, W>(
    config: &PregenConfig,
    options: ConsoleOptions,
    input: R,
    mut output: W,
) -> Result<ConsoleSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut server = SimulatedServer::new(config.simulation.worlds.iter().cloned());
    let mut scheduler =
        RegionScheduler::new(&config.scheduler, config.messaging.delivery_policy());
    let operator = Requester::operator(config.simulation.operator.clone());

    let mut lines = input.lines();
    let mut input_open = true;
    let mut interval = tokio::time::interval(options.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut summary = ConsoleSummary::default();

    info!(operator = %operator.name, tick_ms = options.tick.as_millis() as u64, "Console started");

    loop {
        tokio::select! {
            biased;

            line = lines.next_line(), if input_open => {
                match line.context("Failed to read operator input")? {
                    Some(line) => {
                        let line = line.trim();
                        if line == "quit" {
                            break;
                        }
                        if !line.is_empty() {
                            summary.commands += 1;
                            if let Err(e) = dispatch(line, &operator, &mut scheduler, &mut server) {
                                debug!(input = line, error = %e, "Operator command rejected");
                            }
                        }
                    }
                    None => {
                        input_open = false;
                        if scheduler.is_idle() {
                            break;
                        }
                    }
                }
            }
            _ = interval.tick() => {
                server.step(&mut scheduler);
                summary.ticks += 1;
                if !input_open && scheduler.is_idle() {
                    flush(&mut server, &mut output, options.color).await?;
                    break;
                }
            }
        }
        flush(&mut server, &mut output, options.color).await?;
    }

    flush(&mut server, &mut output, options.color).await?;
    summary.unfinished = scheduler.list_jobs().ids().len();
    info!(
        ticks = summary.ticks,
        commands = summary.commands,
        unfinished = summary.unfinished,
        "Console stopped"
    );
    Ok(summary)
}

async fn flush<W>(server: &mut SimulatedServer, output: &mut W, color: bool) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let deliveries = server.messages_mut().drain();
    if deliveries.is_empty() {
        return Ok(());
    }
    let mut text = String::new();
    for delivery in deliveries {
        let body = if color {
            delivery.notice.colored()
        } else {
            delivery.notice.text.clone()
        };
        match delivery.channel {
            Channel::Direct(_) => text.push_str(&body),
            Channel::Admin => {
                text.push_str("(admin) ");
                text.push_str(&body);
            }
        }
        text.push('\n');
    }
    output
        .write_all(text.as_bytes())
        .await
        .context("Failed to write console output")?;
    output.flush().await.context("Failed to flush console output")?;
    Ok(())
}
