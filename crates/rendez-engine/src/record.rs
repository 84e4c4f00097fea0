//! Core value types: stored schedule records, their recurrence descriptors,
//! and the derived occurrence instances.
//!
//! Records are plain immutable value structs. A `recurrence` of `None` is a
//! single occurrence; `Some(rule)` repeats per the rule. The "all recurrence
//! fields populated iff repeating" invariant is carried by the type, not by
//! runtime checks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Owner of a schedule record: a personal calendar or a group calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum OwnerId {
    User(u64),
    Group(u64),
}

impl OwnerId {
    pub fn is_group(&self) -> bool {
        matches!(self, OwnerId::Group(_))
    }

    /// The raw numeric id, whichever kind it is.
    pub fn raw(&self) -> u64 {
        match *self {
            OwnerId::User(id) | OwnerId::Group(id) => id,
        }
    }
}

/// Repetition frequency of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub(crate) fn ical_token(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

/// Weekday token of a weekly rule's BYDAY constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    pub(crate) fn ical_token(self) -> &'static str {
        match self {
            Weekday::Mo => "MO",
            Weekday::Tu => "TU",
            Weekday::We => "WE",
            Weekday::Th => "TH",
            Weekday::Fr => "FR",
            Weekday::Sa => "SA",
            Weekday::Su => "SU",
        }
    }
}

/// The freq/interval/byweekday/until descriptor governing repetition.
///
/// `by_weekday` is meaningful only for weekly rules (and must be non-empty
/// there); for every other frequency it stays empty and imposes no
/// constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    #[serde(rename = "byweekday", default, skip_serializing_if = "Vec::is_empty")]
    pub by_weekday: Vec<Weekday>,
    pub until: DateTime<Utc>,
}

/// A stored schedule row, personal or group-owned. `start_date_time` and
/// `end_date_time` are the first occurrence's window; repetitions keep the
/// same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: u64,
    pub owner: OwnerId,
    pub title: String,
    pub content: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl ScheduleRecord {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Length of every occurrence of this record.
    pub fn occurrence_length(&self) -> Duration {
        self.end_date_time - self.start_date_time
    }
}

/// One concrete time instance of a (possibly repeating) record within a
/// query window. Several occurrences may share a `source_id`, one per
/// repetition. `start_recur`/`end_recur` carry the originating rule's bounds
/// and are populated in summary mode only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub source_id: u64,
    pub title: String,
    pub content: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub is_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_recur: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_recur: Option<DateTime<Utc>>,
}

/// A validated query window. Bounds are UTC instants with `start < end`,
/// guaranteed by the validation layer upstream of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Three-way interval overlap test used for non-recurring records:
    /// the interval starts in the window, ends in the window, or spans it.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let starts_inside = start >= self.start && start <= self.end;
        let ends_inside = end >= self.start && end <= self.end;
        let spans = start <= self.start && end >= self.end;
        starts_inside || ends_inside || spans
    }
}
