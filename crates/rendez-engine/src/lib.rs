//! # rendez-engine
//!
//! Recurring-schedule expansion and free-time proposal engine for group
//! scheduling backends.
//!
//! The engine is a pure function of (stored records, query window, subject
//! ids): it expands recurrence descriptors into concrete occurrences, merges
//! personal and group occurrences into one view, and computes ranked free
//! meeting slots from busy intervals. Persistence, HTTP, and auth live in the
//! surrounding application; they reach the engine through the [`merge::RecordSource`]
//! and [`proposal::ProposalStore`] seams and consume plain serde-serializable values.
//!
//! ## Modules
//!
//! - [`recurrence`] — recurrence descriptor → concrete occurrences in a window
//! - [`merge`] — unified occurrence view across users and groups
//! - [`slots`] — free-slot sweep and daytime-preference ranking
//! - [`proposal`] — vote bookkeeping and the destructive confirm transition
//! - [`response`] — post-create/post-confirm response assembly
//! - [`store`] — in-memory record/proposal store for tests and fixtures
//! - [`record`] — core value types
//! - [`error`] — error types

pub mod error;
pub mod merge;
pub mod proposal;
pub mod record;
pub mod recurrence;
pub mod response;
pub mod slots;
pub mod store;

pub use error::EngineError;
pub use merge::{calendar_view, merge_schedules, CalendarView, MergeMode, RecordSource, ScheduleView};
pub use proposal::{confirm_proposal, Proposal, ProposalStore, VoteResult};
pub use record::{Frequency, Occurrence, OwnerId, RecurrenceRule, ScheduleRecord, Weekday, Window};
pub use recurrence::{expand_record, first_occurrence};
pub use response::{build_schedule_response, week_bounds, ScheduleResponse, ScheduleSummary};
pub use slots::{free_slots, propose_meeting_slots, rank_by_daytime, BusyInterval, FreeSlot};
pub use store::MemoryStore;
