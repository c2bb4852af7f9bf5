//! Batch Run Types
//!
//! Records of many independent deliberations, grouped by committee size.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generates a run ID for the given committee size and repetition.
pub fn generate_run_id(agent_count: usize, repetition: usize) -> String {
    format!("run_{:03}_{:04}", agent_count, repetition)
}

/// Final outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRunRecord {
    pub run_id: String,
    pub seed: u64,
    pub agent_count: usize,
    pub argument_count: usize,
    pub rounds: u64,
    pub decision: String,
    pub probabilities: BTreeMap<String, f64>,
    /// How many rounds flipped the decision
    pub decision_changes: u32,
    /// Last round in which the decision changed (0 if it never did)
    pub last_change_round: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

impl BatchRunRecord {
    /// Probability of the decided conclusion.
    pub fn decision_probability(&self) -> f64 {
        self.probabilities.get(&self.decision).copied().unwrap_or(0.0)
    }
}

/// Aggregate statistics for all runs sharing a committee size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGroupSummary {
    pub agent_count: usize,
    pub runs: usize,
    pub decision_counts: BTreeMap<String, usize>,
    /// Fraction of runs matching the ground truth, when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub mean_decision_probability: f64,
    pub mean_last_change_round: f64,
}

/// Complete batch output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    pub groups: Vec<BatchGroupSummary>,
    pub runs: Vec<BatchRunRecord>,
}

impl BatchReport {
    /// Builds a report, summarizing runs per committee size in ascending order.
    pub fn from_runs(ground_truth: Option<String>, runs: Vec<BatchRunRecord>) -> Self {
        let mut by_size: BTreeMap<usize, Vec<&BatchRunRecord>> = BTreeMap::new();
        for run in &runs {
            by_size.entry(run.agent_count).or_default().push(run);
        }

        let groups = by_size
            .into_iter()
            .map(|(agent_count, group)| summarize(agent_count, &group))
            .collect();

        Self {
            ground_truth,
            groups,
            runs,
        }
    }

    /// Finds the summary for a committee size.
    pub fn group(&self, agent_count: usize) -> Option<&BatchGroupSummary> {
        self.groups.iter().find(|g| g.agent_count == agent_count)
    }

    /// Serializes the report to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn summarize(agent_count: usize, group: &[&BatchRunRecord]) -> BatchGroupSummary {
    let runs = group.len();
    let mut decision_counts = BTreeMap::new();
    for run in group {
        *decision_counts.entry(run.decision.clone()).or_insert(0) += 1;
    }

    let judged: Vec<bool> = group.iter().filter_map(|r| r.correct).collect();
    let accuracy = if judged.is_empty() {
        None
    } else {
        Some(judged.iter().filter(|c| **c).count() as f64 / judged.len() as f64)
    };

    BatchGroupSummary {
        agent_count,
        runs,
        decision_counts,
        accuracy,
        mean_decision_probability: mean(group, BatchRunRecord::decision_probability),
        mean_last_change_round: mean(group, |r| r.last_change_round as f64),
    }
}

fn mean(group: &[&BatchRunRecord], f: impl Fn(&BatchRunRecord) -> f64) -> f64 {
    if group.is_empty() {
        return 0.0;
    }
    group.iter().map(|r| f(*r)).sum::<f64>() / group.len() as f64
}
