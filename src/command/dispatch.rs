//! Operator command dispatch.
//!
//! One line of operator input becomes one [`CommandOutcome`]. Every outcome,
//! failures included, is also reported back to the requester through the
//! host's [`MessageSink`].

use crate::command::tree::{pregen_tree, render};
use crate::error::PregenError;
use crate::host::{Host, MessageSink, Requester, WorldDirectory};
use crate::job::{JobId, JobListing};
use crate::progress::{Notice, Reporter, Tone};
use crate::region::BlockBounds;
use crate::scheduler::RegionScheduler;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

const COMMAND_NAME: &str = "pregen";

#[derive(Parser, Debug)]
#[command(
    name = "pregen",
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Invocation {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Action {
    #[command(allow_negative_numbers = true, disable_help_flag = true)]
    Generate {
        world: String,
        min_x: i32,
        min_z: i32,
        max_x: i32,
        max_z: i32,
    },
    #[command(name = "listTasks", disable_help_flag = true)]
    ListTasks,
    #[command(allow_negative_numbers = true, disable_help_flag = true)]
    Cancel { task: i64 },
}

/// Result of a successfully dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Started(JobId),
    Listed(JobListing),
    Cancelled(JobId),
    /// `cancel` named something that is not a running task.
    NotRunning(i64),
}

/// Parse and run one operator line such as `pregen generate world 0 0 31 31`.
///
/// The leading `pregen` is optional. Errors have already been replied to
/// the requester when this returns.
pub fn dispatch<H>(
    line: &str,
    requester: &Requester,
    scheduler: &mut RegionScheduler,
    host: &mut H,
) -> Result<CommandOutcome, PregenError>
where
    H: Host + WorldDirectory + ?Sized,
{
    let result = parse(line).and_then(|action| execute(action, requester, scheduler, host));
    if let Err(e) = &result {
        report_failure(host, requester, e);
    }
    result
}

fn parse(line: &str) -> Result<Action, PregenError> {
    let mut args: Vec<&str> = line.split_whitespace().collect();
    if args.first().copied() != Some(COMMAND_NAME) {
        args.insert(0, COMMAND_NAME);
    }

    Invocation::try_parse_from(args)
        .map(|invocation| invocation.action)
        .map_err(|e| {
            debug!(input = line, error = ?e.kind(), "Rejected operator command");
            PregenError::Usage(render(&pregen_tree()))
        })
}

fn execute<H>(
    action: Action,
    requester: &Requester,
    scheduler: &mut RegionScheduler,
    host: &mut H,
) -> Result<CommandOutcome, PregenError>
where
    H: Host + WorldDirectory + ?Sized,
{
    match action {
        Action::Generate {
            world,
            min_x,
            min_z,
            max_x,
            max_z,
        } => {
            if !requester.privileged {
                return Err(PregenError::PermissionDenied);
            }
            let world_ref = host
                .world(&world)
                .ok_or_else(|| PregenError::WorldNotFound(world.clone()))?;
            let region =
                scheduler.region_for(world_ref, BlockBounds::new(min_x, min_z, max_x, max_z));
            info!(
                requester = %requester.name,
                world = %world,
                region = %region,
                total_tiles = region.total_tiles(),
                "Starting region job"
            );
            let id = scheduler.start_region_job(host, region, requester.clone())?;
            Ok(CommandOutcome::Started(id))
        }
        Action::ListTasks => {
            let listing = scheduler.list_jobs();
            host.reply(requester, &Reporter::listing(&listing));
            Ok(CommandOutcome::Listed(listing))
        }
        Action::Cancel { task } => match JobId::try_from(task) {
            Ok(id) if scheduler.cancel_job(host, id, requester) => {
                Ok(CommandOutcome::Cancelled(id))
            }
            // cancel_job already replied for ids that fit but are unknown
            Ok(_) => Ok(CommandOutcome::NotRunning(task)),
            Err(_) => {
                host.reply(requester, &Reporter::not_running(task));
                Ok(CommandOutcome::NotRunning(task))
            }
        },
    }
}

fn report_failure<M>(sink: &mut M, requester: &Requester, error: &PregenError)
where
    M: MessageSink + ?Sized,
{
    match error {
        PregenError::Usage(lines) => {
            sink.reply(requester, &Notice::new(Tone::Error, "Usage:"));
            for line in lines {
                sink.reply(requester, &Notice::plain(format!("/{} {}", COMMAND_NAME, line)));
            }
        }
        other => sink.reply(requester, &Notice::new(Tone::Error, other.to_string())),
    }
}
