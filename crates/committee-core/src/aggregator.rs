//! Committee Aggregation
//!
//! Turns the committee's beliefs into a diagnosis:
//!
//! 1. sum every agent's convincing values per argument
//! 2. map the sums back through the inverse transform (smoothing, not normalization)
//! 3. softmax over arguments
//! 4. score each conclusion by its weighted argument probabilities
//! 5. softmax over conclusion scores
//! 6. pick the most probable conclusion
//!
//! Aggregation is a pure function of current beliefs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::belief::from_convincing;
use crate::error::CommitteeError;

/// Conclusion label -> relevance weight per argument.
///
/// Weights are raw relevances and are never normalized. Iteration is ordered
/// by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentWeights(BTreeMap<String, Vec<f64>>);

impl ArgumentWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, conclusion: impl Into<String>, weights: Vec<f64>) -> Self {
        self.insert(conclusion, weights);
        self
    }

    pub fn insert(&mut self, conclusion: impl Into<String>, weights: Vec<f64>) {
        self.0.insert(conclusion.into(), weights);
    }

    pub fn get(&self, conclusion: &str) -> Option<&[f64]> {
        self.0.get(conclusion).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn conclusions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Checks every weight vector has one finite entry per argument.
    pub fn validate(&self, argument_count: usize) -> Result<(), CommitteeError> {
        if self.0.is_empty() {
            return Err(CommitteeError::config("at least one conclusion is required"));
        }
        for (conclusion, weights) in &self.0 {
            if weights.len() != argument_count {
                return Err(CommitteeError::config(format!(
                    "conclusion '{}' has {} weights but the committee weighs {} arguments",
                    conclusion,
                    weights.len(),
                    argument_count
                )));
            }
            if let Some(&bad) = weights.iter().find(|w| !w.is_finite()) {
                return Err(CommitteeError::Domain {
                    field: format!("weight of '{}'", conclusion),
                    value: bad,
                    expected: "finite reals",
                });
            }
        }
        Ok(())
    }
}

/// The committee's collective view after one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// Summed convincing value per argument
    pub committee_convincing: Vec<f64>,
    /// Softmax over the smoothed sums, one entry per argument
    pub argument_probabilities: Vec<f64>,
    /// Weighted score per conclusion before the final softmax
    pub raw_scores: BTreeMap<String, f64>,
    /// Final probability per conclusion, summing to 1
    pub probabilities: BTreeMap<String, f64>,
    pub decision: String,
}

impl Diagnosis {
    pub fn probability_of(&self, conclusion: &str) -> Option<f64> {
        self.probabilities.get(conclusion).copied()
    }

    pub fn decision_probability(&self) -> f64 {
        self.probability_of(&self.decision).unwrap_or(0.0)
    }
}

/// Numerically stable softmax. Empty input gives empty output.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Picks the most probable conclusion; ties go to the lowest label.
fn decide(probabilities: &BTreeMap<String, f64>) -> String {
    let mut best: Option<(&String, f64)> = None;
    for (label, &p) in probabilities {
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((label, p)),
        }
    }
    best.map(|(label, _)| label.clone()).unwrap_or_default()
}

/// Combines beliefs and argument weights into a diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeAggregator {
    weights: ArgumentWeights,
    argument_count: usize,
}

impl CommitteeAggregator {
    pub fn new(weights: ArgumentWeights, argument_count: usize) -> Result<Self, CommitteeError> {
        weights.validate(argument_count)?;
        Ok(Self {
            weights,
            argument_count,
        })
    }

    pub fn weights(&self) -> &ArgumentWeights {
        &self.weights
    }

    /// Element-wise sum of convincing values. Unknown beliefs count as indifference.
    pub fn committee_convincing(&self, agents: &[Agent]) -> Vec<f64> {
        let mut summary = vec![0.0; self.argument_count];
        for agent in agents {
            for (total, belief) in summary.iter_mut().zip(agent.beliefs().iter()) {
                *total += belief.convincing_or_indifferent();
            }
        }
        summary
    }

    pub fn aggregate(&self, agents: &[Agent]) -> Diagnosis {
        let committee_convincing = self.committee_convincing(agents);
        let smoothed: Vec<f64> = committee_convincing.iter().copied().map(from_convincing).collect();
        let argument_probabilities = softmax(&smoothed);

        let total: f64 = argument_probabilities.iter().sum();
        let normalizer = if total.is_finite() && total > 0.0 { total } else { 1.0 };

        let raw_scores: BTreeMap<String, f64> = self
            .weights
            .iter()
            .map(|(conclusion, weights)| {
                let score: f64 = weights
                    .iter()
                    .zip(&argument_probabilities)
                    .map(|(w, p)| w * p)
                    .sum();
                (conclusion.to_string(), score / normalizer)
            })
            .collect();

        let scores: Vec<f64> = raw_scores.values().copied().collect();
        let probabilities: BTreeMap<String, f64> = raw_scores
            .keys()
            .cloned()
            .zip(softmax(&scores))
            .collect();
        let decision = decide(&probabilities);

        Diagnosis {
            committee_convincing,
            argument_probabilities,
            raw_scores,
            probabilities,
            decision,
        }
    }
}
