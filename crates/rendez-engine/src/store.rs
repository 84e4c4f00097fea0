//! In-memory record and proposal storage -- the fixture backend for tests
//! and the CLI.
//!
//! Implements the coarse fetch predicates of the record-fetch contract; the
//! merger re-applies the exact inclusion tests, so pre-filtering here only
//! narrows the rows it has to look at.

use crate::error::Result;
use crate::merge::RecordSource;
use crate::proposal::{Proposal, ProposalStore};
use crate::record::{OwnerId, ScheduleRecord, Window};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    #[serde(default)]
    pub records: Vec<ScheduleRecord>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScheduleRecord>) -> Self {
        Self {
            records,
            proposals: Vec::new(),
        }
    }

    pub fn insert_record(&mut self, record: ScheduleRecord) {
        self.records.push(record);
    }

    pub fn insert_proposal(&mut self, proposal: Proposal) {
        self.proposals.push(proposal);
    }
}

impl RecordSource for MemoryStore {
    fn records_for(&self, owners: &[OwnerId], window: &Window) -> Result<Vec<ScheduleRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| owners.contains(&r.owner))
            .filter(|r| match &r.recurrence {
                None => window.overlaps(r.start_date_time, r.end_date_time),
                Some(_) => r.start_date_time <= window.end,
            })
            .cloned()
            .collect())
    }
}

impl ProposalStore for MemoryStore {
    fn proposal_by_id(&self, id: u64) -> Result<Option<Proposal>> {
        Ok(self.proposals.iter().find(|p| p.id == id).cloned())
    }

    fn group_proposals(&self, group_id: u64) -> Result<Vec<Proposal>> {
        Ok(self
            .proposals
            .iter()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect())
    }

    fn discard_group_proposals(&mut self, group_id: u64) -> Result<usize> {
        let before = self.proposals.len();
        self.proposals.retain(|p| p.group_id != group_id);
        Ok(before - self.proposals.len())
    }

    fn insert_group_schedule(&mut self, mut record: ScheduleRecord) -> Result<ScheduleRecord> {
        record.id = self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        self.records.push(record.clone());
        Ok(record)
    }
}
