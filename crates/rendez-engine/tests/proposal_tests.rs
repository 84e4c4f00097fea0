//! Tests for proposal voting and the confirm transition.

use chrono::{DateTime, TimeZone, Utc};
use rendez_engine::error::EngineError;
use rendez_engine::{
    confirm_proposal, Frequency, MemoryStore, OwnerId, Proposal, ProposalStore, RecurrenceRule,
    Weekday,
};

fn dt(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
}

fn proposal(id: u64, group_id: u64, title: &str) -> Proposal {
    Proposal {
        id,
        group_id,
        title: title.to_string(),
        content: String::new(),
        start_date_time: dt(2023, 5, 12, 9, 0),
        end_date_time: dt(2023, 5, 12, 17, 0),
        recurrence: None,
        voting_end_date: dt(2023, 5, 1, 0, 0),
        votes: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

#[test]
fn record_vote_appends_and_replaces() {
    let mut p = proposal(1, 7, "Offsite");

    p.record_vote(1, true);
    p.record_vote(2, false);
    assert_eq!(p.votes.len(), 2);
    assert_eq!(p.tally(), (1, 1));

    // A second vote by the same user replaces the first.
    p.record_vote(2, true);
    assert_eq!(p.votes.len(), 2);
    assert_eq!(p.tally(), (2, 0));
}

// ---------------------------------------------------------------------------
// Confirm transition
// ---------------------------------------------------------------------------

#[test]
fn confirm_materializes_a_group_schedule() {
    let mut store = MemoryStore::new();
    store.insert_proposal(Proposal {
        recurrence: Some(RecurrenceRule {
            freq: Frequency::Weekly,
            interval: 2,
            by_weekday: vec![Weekday::Fr],
            until: dt(2023, 12, 31, 0, 0),
        }),
        ..proposal(1, 7, "Retro")
    });

    let record = confirm_proposal(&mut store, 1).expect("confirm");

    assert_eq!(record.owner, OwnerId::Group(7));
    assert_eq!(record.title, "Retro");
    assert_eq!(record.start_date_time, dt(2023, 5, 12, 9, 0));
    let rule = record.recurrence.as_ref().expect("rule carried over");
    assert_eq!(rule.interval, 2);
    // The store assigned an id and kept the row.
    assert!(record.id > 0);
    assert_eq!(store.records.len(), 1);
}

#[test]
fn confirm_discards_sibling_proposals_of_the_group() {
    let mut store = MemoryStore::new();
    store.insert_proposal(proposal(1, 7, "Offsite"));
    store.insert_proposal(proposal(2, 7, "Game night"));
    store.insert_proposal(proposal(3, 9, "Other group"));

    confirm_proposal(&mut store, 1).expect("confirm");

    // Every proposal for group 7 is gone, the confirmed one and its sibling
    // alike; group 9 is untouched.
    assert!(store.group_proposals(7).expect("query").is_empty());
    let remaining = store.group_proposals(9).expect("query");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 3);
}

#[test]
fn confirm_is_not_idempotent() {
    let mut store = MemoryStore::new();
    store.insert_proposal(proposal(1, 7, "Offsite"));
    store.insert_proposal(proposal(2, 7, "Game night"));

    confirm_proposal(&mut store, 1).expect("first confirm");

    // The sibling vanished with the first confirm, so confirming it now is
    // a NotFound, not a second schedule.
    let err = confirm_proposal(&mut store, 2).unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)), "got {err:?}");
    assert_eq!(store.records.len(), 1);
}

#[test]
fn confirm_unknown_proposal_is_not_found() {
    let mut store = MemoryStore::new();
    let err = confirm_proposal(&mut store, 42).unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)), "got {err:?}");
}
