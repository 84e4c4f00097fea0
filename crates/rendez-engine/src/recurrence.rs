//! Recurrence expansion -- converts a stored recurrence descriptor into the
//! concrete occurrences that intersect a query window.
//!
//! Wraps the `rrule` crate (v0.13): the structured descriptor is rendered to
//! iCalendar text (`DTSTART` + `RRULE`), parsed into an `RRuleSet`, bounded
//! to the query range, and expanded. All stored timestamps are UTC.

use crate::error::{EngineError, Result};
use crate::record::{Occurrence, RecurrenceRule, ScheduleRecord, Window};
use chrono::{DateTime, Duration, Utc};
use rrule::{RRuleSet, Tz};

/// Hard cap on expanded instances per rule. Hitting it truncates the
/// expansion (reported via `tracing::warn!`); it is not an error.
pub const EXPANSION_LIMIT: u16 = 500;

/// Expand a recurring record into every occurrence whose interval intersects
/// the window.
///
/// The rule is queried over `[window.start - L, window.end + 1s]`, where `L`
/// is the record's occurrence length -- the left widening catches instances
/// that start before the window but end inside it, the one-second epsilon
/// keeps an instance starting exactly at the window end. Candidates whose
/// computed end falls before the window start are discarded; the right side
/// needs no filter because the query range already bounds it.
///
/// # Errors
/// `EngineError::InvalidData` if the record carries no recurrence rule.
/// `EngineError::Internal` if the rule cannot be rebuilt or expanded.
pub fn expand_record(record: &ScheduleRecord, window: Window) -> Result<Vec<Occurrence>> {
    let rule = required_rule(record)?;

    // A rule whose UNTIL precedes its own first occurrence produces nothing.
    if rule.until < record.start_date_time {
        return Ok(Vec::new());
    }

    let result = bounded_set(record, rule, window)?.all(EXPANSION_LIMIT);
    if result.limited {
        tracing::warn!(
            record_id = record.id,
            limit = EXPANSION_LIMIT,
            "recurrence expansion truncated at instance cap"
        );
    }

    let length = record.occurrence_length();
    let occurrences = result
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .map(|start| (start, start + length))
        .filter(|(_, end)| *end >= window.start)
        .map(|(start, end)| occurrence_from(record, rule, start, end))
        .collect();

    Ok(occurrences)
}

/// Summary mode: only the first occurrence intersecting the window, with the
/// rule's own bounds stamped as `start_recur`/`end_recur`. Returns `Ok(None)`
/// when the rule produces nothing in the window.
pub fn first_occurrence(record: &ScheduleRecord, window: Window) -> Result<Option<Occurrence>> {
    let rule = required_rule(record)?;

    if rule.until < record.start_date_time {
        return Ok(None);
    }

    let result = bounded_set(record, rule, window)?.all(1);
    let length = record.occurrence_length();

    Ok(result.dates.into_iter().next().map(|dt| {
        let start = dt.with_timezone(&Utc);
        let mut occurrence = occurrence_from(record, rule, start, start + length);
        occurrence.start_recur = Some(record.start_date_time);
        occurrence.end_recur = Some(rule.until);
        occurrence
    }))
}

fn required_rule(record: &ScheduleRecord) -> Result<&RecurrenceRule> {
    record.recurrence.as_ref().ok_or_else(|| {
        EngineError::InvalidData(format!("schedule {} carries no recurrence rule", record.id))
    })
}

/// Parse the record's rule into an `RRuleSet` bounded to the widened query
/// range.
fn bounded_set(record: &ScheduleRecord, rule: &RecurrenceRule, window: Window) -> Result<RRuleSet> {
    let text = ical_text(record, rule);
    tracing::debug!(record_id = record.id, rule = %text, "rebuilt recurrence rule");

    let set: RRuleSet = text
        .parse()
        .map_err(|e| EngineError::Internal(format!("rule expansion failed: {e}")))?;

    let length = record.occurrence_length();
    let range_start = (window.start - length).with_timezone(&Tz::UTC);
    let range_end = (window.end + Duration::seconds(1)).with_timezone(&Tz::UTC);

    Ok(set.after(range_start).before(range_end))
}

/// Render the rule as the iCalendar text the `rrule` crate parses. DTSTART
/// and UNTIL must share a timezone, so both carry the UTC marker.
fn ical_text(record: &ScheduleRecord, rule: &RecurrenceRule) -> String {
    let mut parts = vec![
        format!("FREQ={}", rule.freq.ical_token()),
        format!("INTERVAL={}", rule.interval),
    ];
    if !rule.by_weekday.is_empty() {
        let days: Vec<&str> = rule.by_weekday.iter().map(|d| d.ical_token()).collect();
        parts.push(format!("BYDAY={}", days.join(",")));
    }
    parts.push(format!("UNTIL={}Z", rule.until.format("%Y%m%dT%H%M%S")));

    format!(
        "DTSTART;TZID=UTC:{}\nRRULE:{}",
        record.start_date_time.format("%Y%m%dT%H%M%S"),
        parts.join(";")
    )
}

fn occurrence_from(
    record: &ScheduleRecord,
    rule: &RecurrenceRule,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Occurrence {
    Occurrence {
        source_id: record.id,
        title: record.title.clone(),
        content: record.content.clone(),
        start_date_time: start,
        end_date_time: end,
        is_group: record.owner.is_group(),
        recurrence: Some(rule.clone()),
        start_recur: None,
        end_recur: None,
    }
}
