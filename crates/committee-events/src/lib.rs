//! Shared record types and serialization for the committee simulation.
//!
//! This crate contains pure data structures with no deliberation logic.
//! Everything the engine hands back to callers (round reports, snapshots,
//! batch summaries) lives here so that writers and analysis tools can depend
//! on it without pulling in the engine.

pub mod batch;
pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{InfluenceEvent, InfluenceOutcome, RoundReport};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, AgentBeliefSnapshot, CommitteeSnapshot};

// Re-export batch types
pub use batch::{generate_run_id, BatchGroupSummary, BatchReport, BatchRunRecord};
