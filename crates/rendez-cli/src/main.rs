//! `rendez` CLI — drive the group-scheduling engine from JSON fixtures.
//!
//! ## Usage
//!
//! ```sh
//! # Merged calendar view for a user and their groups
//! rendez calendar -i fixtures.json --user 1 --group 7 \
//!     --start 2023-04-01T00:00:00Z --end 2023-04-30T00:00:00Z
//!
//! # Earliest upcoming occurrence only
//! rendez calendar -i fixtures.json --user 1 --summary \
//!     --start 2023-04-01T00:00:00Z --end 2023-04-30T00:00:00Z
//!
//! # Ranked free meeting slots for a group and its members
//! rendez propose -i fixtures.json --group 7 --member 1 --member 2 \
//!     --start 2023-04-05T00:00:00Z --end 2023-04-06T00:00:00Z --duration 60
//!
//! # Raw free-slot sweep over a busy-interval list (stdin → stdout)
//! echo '[{"startDateTime":"...","endDateTime":"..."}]' | \
//!     rendez slots --start 2023-04-05T00:00:00Z --end 2023-04-06T00:00:00Z --ranked
//! ```
//!
//! Fixture files hold `{"records": [...], "proposals": [...]}`; datetimes are
//! RFC 3339 or naive (interpreted as UTC).

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use rendez_engine::{
    calendar_view, free_slots, merge_schedules, propose_meeting_slots, rank_by_daytime,
    BusyInterval, MemoryStore, MergeMode, OwnerId, Window,
};
use serde_json::json;
use std::io::{self, Read};

#[derive(Parser)]
#[command(name = "rendez", version, about = "Group-scheduling engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merged calendar view for users and groups over a window
    Calendar {
        /// Fixture file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// User ids whose personal schedules to include
        #[arg(long = "user")]
        users: Vec<u64>,
        /// Group ids whose schedules to include
        #[arg(long = "group")]
        groups: Vec<u64>,
        /// Window start (RFC 3339, or naive local time read as UTC)
        #[arg(long)]
        start: String,
        /// Window end
        #[arg(long)]
        end: String,
        /// Only report the earliest upcoming occurrence
        #[arg(long)]
        summary: bool,
    },
    /// Ranked free meeting slots for a group and its members
    Propose {
        /// Fixture file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// The group whose schedule counts as busy
        #[arg(long)]
        group: u64,
        /// Member user ids whose personal schedules count as busy
        #[arg(long = "member")]
        members: Vec<u64>,
        /// Window start
        #[arg(long)]
        start: String,
        /// Window end
        #[arg(long)]
        end: String,
        /// Minimum slot length in minutes
        #[arg(long)]
        duration: Option<i64>,
    },
    /// Free-slot sweep over a raw busy-interval list (JSON array)
    Slots {
        /// Busy-interval file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Window start
        #[arg(long)]
        start: String,
        /// Window end
        #[arg(long)]
        end: String,
        /// Apply the daytime-preference reordering
        #[arg(long)]
        ranked: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calendar {
            input,
            users,
            groups,
            start,
            end,
            summary,
        } => {
            let store = load_store(input.as_deref())?;
            let window = parse_window(&start, &end)?;
            let user_owners: Vec<OwnerId> = users.into_iter().map(OwnerId::User).collect();
            let group_owners: Vec<OwnerId> = groups.into_iter().map(OwnerId::Group).collect();

            if summary {
                let user_view =
                    merge_schedules(&store, &user_owners, window, MergeMode::Summary)?;
                let group_view =
                    merge_schedules(&store, &group_owners, window, MergeMode::Summary)?;
                let earliest = match (user_view.earliest_date, group_view.earliest_date) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                print_json(&json!({ "earliestDate": earliest }))?;
            } else {
                let view = calendar_view(&store, &user_owners, &group_owners, window)?;
                print_json(&view)?;
            }
        }
        Commands::Propose {
            input,
            group,
            members,
            start,
            end,
            duration,
        } => {
            let store = load_store(input.as_deref())?;
            let window = parse_window(&start, &end)?;
            let mut owners: Vec<OwnerId> = members.into_iter().map(OwnerId::User).collect();
            owners.push(OwnerId::Group(group));

            let proposals = propose_meeting_slots(&store, &owners, window, duration)?;
            print_json(&json!({ "proposals": proposals }))?;
        }
        Commands::Slots {
            input,
            start,
            end,
            ranked,
        } => {
            let window = parse_window(&start, &end)?;
            let raw = read_input(input.as_deref())?;
            let mut busy: Vec<BusyInterval> =
                serde_json::from_str(&raw).context("invalid busy-interval JSON")?;
            // The sweep expects intervals sorted by start time.
            busy.sort_by_key(|b| (b.start_date_time, b.end_date_time));

            let slots = free_slots(&busy, window);
            let slots = if ranked {
                rank_by_daytime(slots, window)
            } else {
                slots
            };
            print_json(&slots)?;
        }
    }

    Ok(())
}

fn load_store(input: Option<&str>) -> Result<MemoryStore> {
    let raw = read_input(input)?;
    serde_json::from_str(&raw).context("invalid fixture JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_window(start: &str, end: &str) -> Result<Window> {
    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    ensure!(start < end, "window start must be before its end");
    Ok(Window::new(start, end))
}

/// Accepts RFC 3339 (with offset) or a naive local time interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("invalid datetime '{}'", s))
}
