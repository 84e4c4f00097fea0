//! Tests for the free-slot sweep and the daytime-preference ranking.

use chrono::{DateTime, TimeZone, Utc};
use rendez_engine::{
    free_slots, propose_meeting_slots, rank_by_daytime, BusyInterval, Frequency, MemoryStore,
    OwnerId, RecurrenceRule, ScheduleRecord, Weekday, Window,
};

fn dt(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
    BusyInterval {
        start_date_time: start,
        end_date_time: end,
    }
}

fn day_window(year: i32, month: u32, day: u32) -> Window {
    Window::new(dt(year, month, day, 0, 0), dt(year, month, day + 1, 0, 0))
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

#[test]
fn empty_busy_list_yields_whole_window() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(&[], window);

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_date_time, window.start);
    assert_eq!(slots[0].end_date_time, window.end);
    assert_eq!(slots[0].duration, 540);
}

#[test]
fn single_interval_yields_leading_and_trailing_gaps() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(&[busy(dt(2023, 4, 5, 10, 0), dt(2023, 4, 5, 11, 0))], window);

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_date_time, dt(2023, 4, 5, 8, 0));
    assert_eq!(slots[0].end_date_time, dt(2023, 4, 5, 10, 0));
    assert_eq!(slots[0].duration, 120);
    assert_eq!(slots[1].start_date_time, dt(2023, 4, 5, 11, 0));
    assert_eq!(slots[1].end_date_time, dt(2023, 4, 5, 17, 0));
    assert_eq!(slots[1].duration, 360);
}

#[test]
fn interval_flush_with_window_start_emits_no_leading_gap() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(&[busy(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 9, 0))], window);

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_date_time, dt(2023, 4, 5, 9, 0));
}

#[test]
fn nested_interval_contributes_nothing() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(
        &[
            busy(dt(2023, 4, 5, 9, 0), dt(2023, 4, 5, 13, 0)),
            busy(dt(2023, 4, 5, 10, 0), dt(2023, 4, 5, 11, 0)),
        ],
        window,
    );

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].end_date_time, dt(2023, 4, 5, 9, 0));
    assert_eq!(slots[1].start_date_time, dt(2023, 4, 5, 13, 0));
}

#[test]
fn overlapping_intervals_extend_the_covered_prefix() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(
        &[
            busy(dt(2023, 4, 5, 10, 0), dt(2023, 4, 5, 11, 30)),
            busy(dt(2023, 4, 5, 11, 0), dt(2023, 4, 5, 12, 0)),
        ],
        window,
    );

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].duration, 120); // 08:00-10:00
    assert_eq!(slots[1].start_date_time, dt(2023, 4, 5, 12, 0));
    assert_eq!(slots[1].duration, 300); // 12:00-17:00
}

#[test]
fn intervals_reaching_past_the_window_suppress_edge_gaps() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 17, 0));
    let slots = free_slots(
        &[
            busy(dt(2023, 4, 5, 7, 0), dt(2023, 4, 5, 9, 0)),
            busy(dt(2023, 4, 5, 16, 0), dt(2023, 4, 5, 18, 0)),
        ],
        window,
    );

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_date_time, dt(2023, 4, 5, 9, 0));
    assert_eq!(slots[0].end_date_time, dt(2023, 4, 5, 16, 0));
}

#[test]
fn slot_durations_round_to_whole_minutes() {
    let window = Window::new(
        Utc.with_ymd_and_hms(2023, 4, 5, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 4, 5, 10, 2, 30).unwrap(),
    );
    let slots = free_slots(&[], window);

    // 150 seconds rounds up to 3 minutes.
    assert_eq!(slots[0].duration, 3);
}

#[test]
fn slots_and_clipped_busy_tile_the_window() {
    let window = Window::new(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 18, 0));
    let intervals = [
        busy(dt(2023, 4, 5, 9, 0), dt(2023, 4, 5, 10, 0)),
        busy(dt(2023, 4, 5, 12, 0), dt(2023, 4, 5, 13, 0)),
        busy(dt(2023, 4, 5, 15, 0), dt(2023, 4, 5, 16, 0)),
    ];
    let slots = free_slots(&intervals, window);

    // Stitch slots and busy intervals back together chronologically; they
    // must cover the window end to end with no gap and no overlap.
    let mut pieces: Vec<(DateTime<Utc>, DateTime<Utc>)> = slots
        .iter()
        .map(|s| (s.start_date_time, s.end_date_time))
        .chain(intervals.iter().map(|b| (b.start_date_time, b.end_date_time)))
        .collect();
    pieces.sort();

    let mut cursor = window.start;
    for (start, end) in pieces {
        assert_eq!(start, cursor, "gap or overlap at {cursor}");
        cursor = end;
    }
    assert_eq!(cursor, window.end);
}

// ---------------------------------------------------------------------------
// Daytime-preference ranking
// ---------------------------------------------------------------------------

#[test]
fn evening_slot_ranks_ahead_of_small_hours_slot() {
    // The scenario from the proposal endpoint: one slot 18:00-24:00, one
    // 00:00-08:00. The evening slot overlaps the daytime band and must come
    // first even though it starts later.
    let window = day_window(2000, 4, 1);
    let slots = free_slots(
        &[busy(dt(2000, 4, 1, 8, 0), dt(2000, 4, 1, 18, 0))],
        window,
    );
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_date_time, dt(2000, 4, 1, 0, 0));

    let ranked = rank_by_daytime(slots, window);

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].start_date_time, dt(2000, 4, 1, 18, 0));
    assert_eq!(ranked[1].start_date_time, dt(2000, 4, 1, 0, 0));
}

#[test]
fn ranking_returns_both_groups_in_full() {
    let window = day_window(2023, 4, 5);
    let slots = free_slots(
        &[
            busy(dt(2023, 4, 5, 8, 0), dt(2023, 4, 5, 12, 0)),
            busy(dt(2023, 4, 5, 14, 0), dt(2023, 4, 5, 18, 0)),
        ],
        window,
    );
    let count = slots.len();

    let ranked = rank_by_daytime(slots, window);
    assert_eq!(ranked.len(), count, "ranking must not drop slots");
}

#[test]
fn preferred_slots_keep_chronological_order() {
    let window = day_window(2023, 4, 5);
    let slots = free_slots(
        &[
            busy(dt(2023, 4, 5, 10, 0), dt(2023, 4, 5, 11, 0)),
            busy(dt(2023, 4, 5, 14, 0), dt(2023, 4, 5, 15, 0)),
        ],
        window,
    );

    let ranked = rank_by_daytime(slots, window);

    // All three gaps overlap the daytime band; order is untouched.
    let starts: Vec<_> = ranked.iter().map(|s| s.start_date_time).collect();
    assert_eq!(
        starts,
        vec![dt(2023, 4, 5, 0, 0), dt(2023, 4, 5, 11, 0), dt(2023, 4, 5, 15, 0)]
    );
}

// ---------------------------------------------------------------------------
// End-to-end proposal
// ---------------------------------------------------------------------------

#[test]
fn propose_meeting_slots_merges_members_and_group() {
    let store = MemoryStore::with_records(vec![
        ScheduleRecord {
            id: 1,
            owner: OwnerId::Group(7),
            title: "Weekly sync".to_string(),
            content: String::new(),
            start_date_time: dt(2020, 1, 1, 12, 0),
            end_date_time: dt(2020, 1, 1, 13, 0),
            recurrence: Some(RecurrenceRule {
                freq: Frequency::Weekly,
                interval: 1,
                by_weekday: vec![Weekday::We],
                until: dt(2023, 12, 31, 0, 0),
            }),
        },
        ScheduleRecord {
            id: 2,
            owner: OwnerId::User(1),
            title: "Errand".to_string(),
            content: String::new(),
            start_date_time: dt(2023, 4, 5, 13, 30),
            end_date_time: dt(2023, 4, 5, 14, 0),
            recurrence: None,
        },
    ]);
    let window = day_window(2023, 4, 5); // a Wednesday
    let owners = [OwnerId::User(1), OwnerId::Group(7)];

    let slots = propose_meeting_slots(&store, &owners, window, None).expect("propose");

    // All three gaps overlap the daytime band, so ranking preserves the
    // chronological sweep order.
    let spans: Vec<_> = slots
        .iter()
        .map(|s| (s.start_date_time, s.end_date_time))
        .collect();
    assert_eq!(
        spans,
        vec![
            (dt(2023, 4, 5, 0, 0), dt(2023, 4, 5, 12, 0)),
            (dt(2023, 4, 5, 13, 0), dt(2023, 4, 5, 13, 30)),
            (dt(2023, 4, 5, 14, 0), dt(2023, 4, 6, 0, 0)),
        ]
    );
}

#[test]
fn duration_hint_drops_short_slots() {
    let store = MemoryStore::with_records(vec![
        ScheduleRecord {
            id: 1,
            owner: OwnerId::Group(7),
            title: "Weekly sync".to_string(),
            content: String::new(),
            start_date_time: dt(2020, 1, 1, 12, 0),
            end_date_time: dt(2020, 1, 1, 13, 0),
            recurrence: Some(RecurrenceRule {
                freq: Frequency::Weekly,
                interval: 1,
                by_weekday: vec![Weekday::We],
                until: dt(2023, 12, 31, 0, 0),
            }),
        },
        ScheduleRecord {
            id: 2,
            owner: OwnerId::User(1),
            title: "Errand".to_string(),
            content: String::new(),
            start_date_time: dt(2023, 4, 5, 13, 30),
            end_date_time: dt(2023, 4, 5, 14, 0),
            recurrence: None,
        },
    ]);
    let window = day_window(2023, 4, 5);
    let owners = [OwnerId::User(1), OwnerId::Group(7)];

    let slots = propose_meeting_slots(&store, &owners, window, Some(60)).expect("propose");

    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.duration >= 60));
}
