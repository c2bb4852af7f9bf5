//! Event Types
//!
//! Per-round records produced by the deliberation engine and handed to the caller.

use serde::{Deserialize, Serialize};

use crate::CommitteeSnapshot;

/// How an influence application resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceOutcome {
    /// Listener moved by the full persuasion step
    Moved,
    /// Listener was pulled exactly onto the speaker's position
    Clamped,
}

/// A single eligible persuasion: one speaker moving one listener on one argument.
///
/// Values are in belief space. `before` is `None` when the listener had no
/// opinion on the argument prior to being addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEvent {
    pub round: u64,
    pub speaker: u32,
    pub listener: u32,
    pub argument: usize,
    pub before: Option<f64>,
    pub after: f64,
    pub outcome: InfluenceOutcome,
}

impl InfluenceEvent {
    /// Absolute change in belief caused by this event (unknown counts as 0.5).
    pub fn shift(&self) -> f64 {
        (self.after - self.before.unwrap_or(0.5)).abs()
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Everything that happened in one `step()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u64,
    /// Agent IDs in the order they spoke this round
    pub speaking_order: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub influences: Vec<InfluenceEvent>,
    /// Decision before this round's argumentation
    pub previous_decision: String,
    pub snapshot: CommitteeSnapshot,
}

impl RoundReport {
    /// Returns true if the committee changed its mind this round.
    pub fn decision_changed(&self) -> bool {
        self.previous_decision != self.snapshot.decision
    }

    /// Number of influence applications that ended clamped on the speaker.
    pub fn clamped_count(&self) -> usize {
        self.influences
            .iter()
            .filter(|e| e.outcome == InfluenceOutcome::Clamped)
            .count()
    }

    /// Sum of absolute belief shifts caused this round.
    pub fn total_shift(&self) -> f64 {
        self.influences.iter().map(InfluenceEvent::shift).sum()
    }
}
