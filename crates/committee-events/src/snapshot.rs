//! Snapshot Types
//!
//! Serialization structs for committee snapshots.
//!
//! A snapshot captures the complete observable state of a deliberation at the
//! end of a round: every doctor's beliefs, the committee's per-argument
//! probabilities and the current diagnosis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generates a snapshot ID with the given round number.
pub fn generate_snapshot_id(round: u64) -> String {
    format!("snap_{:06}", round)
}

/// One agent's beliefs at a point in time.
///
/// `None` entries are arguments the agent has not formed an opinion on yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentBeliefSnapshot {
    pub agent_id: u32,
    pub beliefs: Vec<Option<f64>>,
    pub influence: f64,
    pub stubbornness: f64,
}

impl AgentBeliefSnapshot {
    /// Returns the belief on an argument, if known.
    pub fn belief(&self, argument: usize) -> Option<f64> {
        self.beliefs.get(argument).copied().flatten()
    }
}

/// Complete committee snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeSnapshot {
    pub snapshot_id: String,
    pub round: u64,
    /// Argument labels, index-aligned with every belief vector
    pub arguments: Vec<String>,
    pub agents: Vec<AgentBeliefSnapshot>,
    /// Mean known belief per argument
    #[serde(default)]
    pub average_beliefs: Vec<Option<f64>>,
    /// Committee probability per argument (softmax over the summed convincing values)
    #[serde(default)]
    pub argument_probabilities: Vec<f64>,
    /// Final probability per conclusion
    pub diagnosis: BTreeMap<String, f64>,
    pub decision: String,
}

impl CommitteeSnapshot {
    /// Finds an agent by ID.
    pub fn find_agent(&self, agent_id: u32) -> Option<&AgentBeliefSnapshot> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Returns the probability assigned to a conclusion.
    pub fn probability_of(&self, conclusion: &str) -> Option<f64> {
        self.diagnosis.get(conclusion).copied()
    }

    /// Returns the probability of the decided conclusion.
    pub fn decision_probability(&self) -> f64 {
        self.probability_of(&self.decision).unwrap_or(0.0)
    }

    /// Returns the number of arguments.
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the snapshot to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
