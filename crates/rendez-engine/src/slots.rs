//! Free-slot computation -- the gaps between busy intervals within a query
//! window, reordered by a daytime-preference heuristic.
//!
//! The sweep assumes busy intervals sorted by start time; intervals may
//! overlap or nest. Malformed intervals (end before start) are the caller's
//! responsibility and are not validated here.

use crate::error::Result;
use crate::merge::{self, MergeMode, RecordSource};
use crate::record::{OwnerId, Window};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A busy interval, typically a flattened merged occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
}

/// A gap with no overlapping busy interval within the query window.
/// `duration` is whole minutes, rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub duration: i64,
}

/// Compute the gaps between busy intervals within the window.
///
/// Emits a leading slot when the first busy interval starts after the window
/// start, a gap slot for every hole in the covered prefix (tracked as the
/// running maximum end), and a trailing slot when that maximum falls short of
/// the window end. Intervals fully nested within the covered prefix
/// contribute nothing.
pub fn free_slots(busy: &[BusyInterval], window: Window) -> Vec<FreeSlot> {
    let first = match busy.first() {
        Some(first) => first,
        None => return vec![slot(window.start, window.end)],
    };

    let mut slots = Vec::new();
    if first.start_date_time > window.start {
        slots.push(slot(window.start, first.start_date_time));
    }

    let mut current_end = first.end_date_time;
    for interval in &busy[1..] {
        if interval.end_date_time <= current_end {
            continue;
        }
        if interval.start_date_time > current_end {
            slots.push(slot(current_end, interval.start_date_time));
        }
        current_end = interval.end_date_time;
    }

    if current_end < window.end {
        slots.push(slot(current_end, window.end));
    }

    slots
}

/// Reorder slots so those overlapping the daytime band of the proposal
/// window come first.
///
/// A slot is preferred when its start is before `window.end - 2h` AND its end
/// is after `window.start + 9h` (the 09:00-22:00 band of a whole-day window,
/// kept window-relative on purpose). Both groups are always returned in
/// full, each preserving chronological order -- this is a tie-break, not a
/// filter.
pub fn rank_by_daytime(slots: Vec<FreeSlot>, window: Window) -> Vec<FreeSlot> {
    let latest_start = window.end - Duration::hours(2);
    let earliest_end = window.start + Duration::hours(9);

    let (mut preferred, remaining): (Vec<_>, Vec<_>) = slots
        .into_iter()
        .partition(|s| s.start_date_time < latest_start && s.end_date_time > earliest_end);

    preferred.extend(remaining);
    preferred
}

/// End-to-end proposal computation for a set of subjects: merge their
/// occurrences over the window, sweep out the gaps, drop slots shorter than
/// the optional `min_duration` hint (minutes), and rank by daytime
/// preference.
pub fn propose_meeting_slots<S: RecordSource>(
    source: &S,
    owners: &[OwnerId],
    window: Window,
    min_duration: Option<i64>,
) -> Result<Vec<FreeSlot>> {
    let mut busy: Vec<BusyInterval> = merge::merge_schedules(source, owners, window, MergeMode::Full)?
        .into_schedules()
        .into_iter()
        .map(|o| BusyInterval {
            start_date_time: o.start_date_time,
            end_date_time: o.end_date_time,
        })
        .collect();
    busy.sort_by_key(|b| (b.start_date_time, b.end_date_time));

    let mut slots = free_slots(&busy, window);
    if let Some(min) = min_duration {
        slots.retain(|s| s.duration >= min);
    }

    Ok(rank_by_daytime(slots, window))
}

fn slot(start: DateTime<Utc>, end: DateTime<Utc>) -> FreeSlot {
    FreeSlot {
        start_date_time: start,
        end_date_time: end,
        duration: round_minutes(end - start),
    }
}

/// Whole minutes with standard rounding (half a minute rounds up).
fn round_minutes(span: Duration) -> i64 {
    (span.num_milliseconds() + 30_000).div_euclid(60_000)
}
