//! Activation Scheduler
//!
//! Every round each agent speaks exactly once. Speakers go one after another
//! and later speakers see listeners already moved by earlier ones, so the
//! drawn order matters and must never be parallelized.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use committee_events::InfluenceEvent;

use crate::agent::{Agent, AgentId};
use crate::influence::InfluenceRule;

/// How the speaking order is chosen each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Fresh uniform permutation every round
    #[default]
    Random,
    /// Ascending id order every round
    Sequential,
}

/// Output of one scheduler pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundActivity {
    pub speaking_order: Vec<AgentId>,
    pub influences: Vec<InfluenceEvent>,
}

/// Orders and runs the speakers of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scheduler {
    activation: Activation,
}

impl Scheduler {
    pub fn new(activation: Activation) -> Self {
        Self { activation }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Draws the speaking order for a committee of `agent_count`.
    pub fn speaking_order<R: Rng + ?Sized>(&self, agent_count: usize, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..agent_count).collect();
        if self.activation == Activation::Random {
            order.shuffle(rng);
        }
        order
    }

    /// Runs one full round: every agent speaks once, sequentially, in a
    /// freshly drawn order.
    pub fn run_round<R: Rng + ?Sized>(
        &self,
        agents: &mut [Agent],
        rule: &InfluenceRule,
        round: u64,
        rng: &mut R,
    ) -> RoundActivity {
        let order = self.speaking_order(agents.len(), rng);
        let mut influences = Vec::new();

        for &speaker in &order {
            influences.extend(rule.speak(agents, speaker, round));
        }

        RoundActivity {
            speaking_order: order.iter().map(|&i| agents[i].id()).collect(),
            influences,
        }
    }
}
