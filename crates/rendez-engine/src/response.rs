//! Single-event response assembly -- combines a freshly created or confirmed
//! schedule with "today" and "this week" derived views, so the client needs
//! no second round trip after creating a schedule.

use crate::error::Result;
use crate::merge::{self, MergeMode, RecordSource};
use crate::record::{Occurrence, OwnerId, RecurrenceRule, ScheduleRecord, Window};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Bare fields of the record itself: identity, ownership, timing, and the
/// recurrence descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub id: u64,
    pub owner: OwnerId,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    pub is_group: bool,
}

impl From<&ScheduleRecord> for ScheduleSummary {
    fn from(record: &ScheduleRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner,
            start_date_time: record.start_date_time,
            end_date_time: record.end_date_time,
            recurrence: record.recurrence.clone(),
            is_group: record.owner.is_group(),
        }
    }
}

/// The post-create/post-confirm response for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub schedule_summary: ScheduleSummary,
    pub today_schedules: Vec<Occurrence>,
    pub schedules_for_the_week: Vec<Occurrence>,
}

/// Assemble the response for a freshly persisted or confirmed record.
///
/// Both derived views re-run the merger restricted to the record's owner:
/// `today_schedules` over the window the client just asked about (does the
/// new event actually appear in it?), `schedules_for_the_week` over
/// caller-chosen week bounds (see [`week_bounds`]). Either view may be empty
/// when the record does not recur into it.
pub fn build_schedule_response<S: RecordSource>(
    source: &S,
    record: &ScheduleRecord,
    request_window: Window,
    week_window: Window,
) -> Result<ScheduleResponse> {
    let owners = [record.owner];
    let today = merge::merge_schedules(source, &owners, request_window, MergeMode::Full)?;
    let week = merge::merge_schedules(source, &owners, week_window, MergeMode::Full)?;

    Ok(ScheduleResponse {
        schedule_summary: ScheduleSummary::from(record),
        today_schedules: today.into_schedules(),
        schedules_for_the_week: week.into_schedules(),
    })
}

/// Calendar-week bounds around `anchor`: local Monday 00:00 through the next
/// Monday 00:00 in `tz`, returned as UTC instants.
pub fn week_bounds(anchor: DateTime<Utc>, tz: Tz) -> Window {
    let local_date = anchor.with_timezone(&tz).date_naive();
    let monday = local_date - Duration::days(local_date.weekday().num_days_from_monday() as i64);
    Window::new(
        local_midnight(monday, tz),
        local_midnight(monday + Duration::days(7), tz),
    )
}

/// Midnight of `date` in `tz` as a UTC instant. When a DST transition makes
/// midnight ambiguous, take the earlier reading; when it skips midnight
/// entirely, fall back to the naive UTC reading.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}
