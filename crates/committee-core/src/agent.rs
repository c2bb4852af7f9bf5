//! Doctor Agents
//!
//! An agent is a committee member with beliefs over the arguments, a
//! persuasive strength and a resistance to persuasion. Only its beliefs
//! change after creation, and only through [`crate::influence::InfluenceRule`].

use committee_events::AgentBeliefSnapshot;

use crate::belief::{Belief, BeliefVector};
use crate::error::{check_unit, CommitteeError};

/// Stable agent identifier, equal to the agent's position in the committee.
pub type AgentId = u32;

/// Initial state for one agent, supplied by whoever sets up the committee.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub beliefs: BeliefVector,
    /// Persuasive strength when speaking, in [0, 1]
    pub influence: f64,
    /// Resistance to being persuaded, in [0, 1]
    pub stubbornness: f64,
}

impl AgentSpec {
    /// Builds a spec from raw belief values (`-1.0` marks an unknown belief).
    pub fn new(beliefs: &[f64], influence: f64, stubbornness: f64) -> Result<Self, CommitteeError> {
        Ok(Self {
            beliefs: BeliefVector::from_raw(beliefs)?,
            influence,
            stubbornness,
        })
    }
}

/// A committee member.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    beliefs: BeliefVector,
    influence: f64,
    stubbornness: f64,
}

impl Agent {
    /// Validates a spec against the committee's argument count.
    pub fn from_spec(id: AgentId, spec: AgentSpec, argument_count: usize) -> Result<Self, CommitteeError> {
        if spec.beliefs.len() != argument_count {
            return Err(CommitteeError::config(format!(
                "agent {} has {} beliefs but the committee weighs {} arguments",
                id,
                spec.beliefs.len(),
                argument_count
            )));
        }
        for (i, belief) in spec.beliefs.iter().enumerate() {
            if let Belief::Known(v) = belief {
                check_unit(format!("agent {} belief[{}]", id, i), v)?;
            }
        }

        Ok(Self {
            id,
            beliefs: spec.beliefs,
            influence: check_unit(format!("agent {} influence", id), spec.influence)?,
            stubbornness: check_unit(format!("agent {} stubbornness", id), spec.stubbornness)?,
        })
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn beliefs(&self) -> &BeliefVector {
        &self.beliefs
    }

    pub fn belief(&self, argument: usize) -> Option<Belief> {
        self.beliefs.get(argument)
    }

    pub fn influence(&self) -> f64 {
        self.influence
    }

    pub fn stubbornness(&self) -> f64 {
        self.stubbornness
    }

    pub(crate) fn set_belief(&mut self, argument: usize, belief: Belief) {
        self.beliefs.set(argument, belief);
    }

    pub fn snapshot(&self) -> AgentBeliefSnapshot {
        AgentBeliefSnapshot {
            agent_id: self.id,
            beliefs: self.beliefs.values(),
            influence: self.influence,
            stubbornness: self.stubbornness,
        }
    }
}
