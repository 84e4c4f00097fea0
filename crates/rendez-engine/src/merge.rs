//! Occurrence merging -- the unified view of stored records for a set of
//! subjects within a query window.
//!
//! Partitions fetched records into non-recurring (direct overlap test) and
//! recurring (expanded through [`crate::recurrence`]), flattens both into one
//! view, and tracks the earliest observed start for summary consumers.

use crate::error::Result;
use crate::record::{Occurrence, OwnerId, ScheduleRecord, Window};
use crate::recurrence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The record-fetch seam. Implementations return the stored records for the
/// given owners; they may pre-filter with the coarse window predicates
/// (non-recurring three-way overlap, recurring `start <= window.end`) -- the
/// merger re-applies the exact tests either way.
pub trait RecordSource {
    fn records_for(&self, owners: &[OwnerId], window: &Window) -> Result<Vec<ScheduleRecord>>;
}

/// Full expansion, or only the earliest qualifying occurrence per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Full,
    Summary,
}

/// Output of [`merge_schedules`]: the two occurrence partitions plus the
/// minimum observed start time. `earliest_date` is `None` iff both lists are
/// empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub earliest_date: Option<DateTime<Utc>>,
    pub non_recurrence_schedule: Vec<Occurrence>,
    pub recurrence_schedule: Vec<Occurrence>,
}

impl ScheduleView {
    pub fn is_empty(&self) -> bool {
        self.non_recurrence_schedule.is_empty() && self.recurrence_schedule.is_empty()
    }

    /// Flatten into a single list: non-recurring occurrences first, then the
    /// expanded recurring ones, each in production order.
    pub fn into_schedules(self) -> Vec<Occurrence> {
        let mut schedules = self.non_recurrence_schedule;
        schedules.extend(self.recurrence_schedule);
        schedules
    }
}

/// Whole-calendar view over two subject sets, concatenated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub schedules: Vec<Occurrence>,
}

/// Merge every occurrence of the owners' records that intersects the window.
///
/// Non-recurring records are kept iff their interval passes the three-way
/// overlap test. Recurring records are kept for expansion when their first
/// occurrence starts on or before the window end; exact inclusion is the
/// evaluator's call. In [`MergeMode::Summary`] each rule contributes only its
/// first qualifying occurrence, stamped with the rule's own bounds.
///
/// Any source or expansion failure aborts the whole merge; no partial view
/// is returned.
pub fn merge_schedules<S: RecordSource>(
    source: &S,
    owners: &[OwnerId],
    window: Window,
    mode: MergeMode,
) -> Result<ScheduleView> {
    let records = source.records_for(owners, &window)?;

    let mut earliest: Option<DateTime<Utc>> = None;
    let mut non_recurring = Vec::new();
    let mut recurring = Vec::new();

    for record in &records {
        if record.is_recurring() {
            if record.start_date_time > window.end {
                continue;
            }
            match mode {
                MergeMode::Full => {
                    let expanded = recurrence::expand_record(record, window)?;
                    for occurrence in &expanded {
                        track_earliest(&mut earliest, occurrence.start_date_time);
                    }
                    recurring.extend(expanded);
                }
                MergeMode::Summary => {
                    if let Some(first) = recurrence::first_occurrence(record, window)? {
                        track_earliest(&mut earliest, first.start_date_time);
                        recurring.push(first);
                    }
                }
            }
        } else if window.overlaps(record.start_date_time, record.end_date_time) {
            track_earliest(&mut earliest, record.start_date_time);
            non_recurring.push(base_occurrence(record));
        }
    }

    Ok(ScheduleView {
        earliest_date: earliest,
        non_recurrence_schedule: non_recurring,
        recurrence_schedule: recurring,
    })
}

/// Whole-calendar view: one merge per subject type, concatenated.
///
/// The concatenation is deliberately NOT re-sorted -- ordering between the
/// personal and group lists is unspecified, and callers needing strict
/// chronological order sort client-side.
pub fn calendar_view<S: RecordSource>(
    source: &S,
    user_owners: &[OwnerId],
    group_owners: &[OwnerId],
    window: Window,
) -> Result<CalendarView> {
    let mut schedules =
        merge_schedules(source, user_owners, window, MergeMode::Full)?.into_schedules();
    schedules
        .extend(merge_schedules(source, group_owners, window, MergeMode::Full)?.into_schedules());
    Ok(CalendarView { schedules })
}

fn track_earliest(earliest: &mut Option<DateTime<Utc>>, candidate: DateTime<Utc>) {
    if earliest.map_or(true, |current| candidate < current) {
        *earliest = Some(candidate);
    }
}

fn base_occurrence(record: &ScheduleRecord) -> Occurrence {
    Occurrence {
        source_id: record.id,
        title: record.title.clone(),
        content: record.content.clone(),
        start_date_time: record.start_date_time,
        end_date_time: record.end_date_time,
        is_group: record.owner.is_group(),
        recurrence: None,
        start_recur: None,
        end_recur: None,
    }
}
