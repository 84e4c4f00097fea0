//! Group meeting proposals -- vote bookkeeping and the destructive confirm
//! transition that turns a proposal into a group schedule.

use crate::error::{EngineError, Result};
use crate::record::{OwnerId, RecurrenceRule, ScheduleRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One member's vote on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub user_id: u64,
    pub agree: bool,
}

/// A pending schedule candidate tied to a group, open for member voting
/// until `voting_end_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: u64,
    pub group_id: u64,
    pub title: String,
    pub content: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    pub voting_end_date: DateTime<Utc>,
    #[serde(default)]
    pub votes: Vec<VoteResult>,
}

impl Proposal {
    /// Record a member's vote, replacing any earlier vote by the same user.
    pub fn record_vote(&mut self, user_id: u64, agree: bool) {
        match self.votes.iter_mut().find(|v| v.user_id == user_id) {
            Some(vote) => vote.agree = agree,
            None => self.votes.push(VoteResult { user_id, agree }),
        }
    }

    /// `(agree, against)` counts over the recorded votes.
    pub fn tally(&self) -> (usize, usize) {
        let agree = self.votes.iter().filter(|v| v.agree).count();
        (agree, self.votes.len() - agree)
    }
}

/// Proposal storage seam used by the confirm transition.
pub trait ProposalStore {
    fn proposal_by_id(&self, id: u64) -> Result<Option<Proposal>>;

    fn group_proposals(&self, group_id: u64) -> Result<Vec<Proposal>>;

    /// Remove every proposal for the group, returning how many were dropped.
    fn discard_group_proposals(&mut self, group_id: u64) -> Result<usize>;

    /// Persist a new group schedule, assigning its id.
    fn insert_group_schedule(&mut self, record: ScheduleRecord) -> Result<ScheduleRecord>;
}

/// Confirm a proposal: materialize it as a group-owned schedule record and
/// discard ALL of the group's proposals, the confirmed one and its siblings
/// alike.
///
/// The transition is destructive and not idempotent -- a second confirm on
/// the same id fails with [`EngineError::NotFound`].
pub fn confirm_proposal<S: ProposalStore>(store: &mut S, proposal_id: u64) -> Result<ScheduleRecord> {
    let proposal = store
        .proposal_by_id(proposal_id)?
        .ok_or_else(|| EngineError::NotFound(format!("proposal {proposal_id}")))?;

    let record = store.insert_group_schedule(ScheduleRecord {
        // Placeholder; the store assigns the real id on insert.
        id: 0,
        owner: OwnerId::Group(proposal.group_id),
        title: proposal.title,
        content: proposal.content,
        start_date_time: proposal.start_date_time,
        end_date_time: proposal.end_date_time,
        recurrence: proposal.recurrence,
    })?;

    store.discard_group_proposals(proposal.group_id)?;

    Ok(record)
}
