//! Deliberation Simulation
//!
//! Owns the committee, the seeded random source and the latest diagnosis.
//! Each [`Simulation::step`] runs one scheduler pass followed by one
//! aggregation pass and hands the caller a [`RoundReport`]; nothing is
//! accumulated internally between rounds.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use committee_events::{generate_snapshot_id, CommitteeSnapshot, RoundReport};

use crate::agent::{Agent, AgentId, AgentSpec};
use crate::aggregator::{ArgumentWeights, CommitteeAggregator, Diagnosis};
use crate::error::CommitteeError;
use crate::influence::{InfluenceParams, InfluenceRule};
use crate::scenario::argument_label;
use crate::scheduler::{Activation, Scheduler};

/// Everything needed to assemble a committee.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeSetup {
    pub argument_count: usize,
    pub agents: Vec<AgentSpec>,
    pub conclusions: ArgumentWeights,
    pub influence: InfluenceParams,
    pub activation: Activation,
    /// Defaults to "A", "B", ... when absent
    pub argument_labels: Option<Vec<String>>,
}

impl CommitteeSetup {
    pub fn new(argument_count: usize, agents: Vec<AgentSpec>, conclusions: ArgumentWeights) -> Self {
        Self {
            argument_count,
            agents,
            conclusions,
            influence: InfluenceParams::default(),
            activation: Activation::default(),
            argument_labels: None,
        }
    }

    pub fn with_influence(mut self, influence: InfluenceParams) -> Self {
        self.influence = influence;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_argument_labels(mut self, labels: Vec<String>) -> Self {
        self.argument_labels = Some(labels);
        self
    }
}

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, only the baseline diagnosis exists
    Idle,
    /// At least one round has run
    Advanced,
}

/// A running committee deliberation.
#[derive(Debug, Clone)]
pub struct Simulation<R = SmallRng> {
    agents: Vec<Agent>,
    arguments: Vec<String>,
    rule: InfluenceRule,
    scheduler: Scheduler,
    aggregator: CommitteeAggregator,
    rng: R,
    round: u64,
    diagnosis: Diagnosis,
}

impl Simulation<SmallRng> {
    /// Builds a simulation driven by a `SmallRng` seeded from `seed`.
    pub fn seeded(setup: CommitteeSetup, seed: u64) -> Result<Self, CommitteeError> {
        Self::new(setup, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Validates the setup and computes the round-0 diagnosis.
    pub fn new(setup: CommitteeSetup, rng: R) -> Result<Self, CommitteeError> {
        if setup.argument_count == 0 {
            return Err(CommitteeError::config("committee needs at least one argument"));
        }
        if setup.agents.is_empty() {
            return Err(CommitteeError::config("committee needs at least one agent"));
        }

        let arguments = match setup.argument_labels {
            Some(labels) if labels.len() != setup.argument_count => {
                return Err(CommitteeError::config(format!(
                    "{} argument labels given for {} arguments",
                    labels.len(),
                    setup.argument_count
                )));
            }
            Some(labels) => labels,
            None => (0..setup.argument_count).map(argument_label).collect(),
        };

        let agents = setup
            .agents
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Agent::from_spec(i as AgentId, spec, setup.argument_count))
            .collect::<Result<Vec<_>, _>>()?;

        let rule = InfluenceRule::new(setup.influence)?;
        let aggregator = CommitteeAggregator::new(setup.conclusions, setup.argument_count)?;
        let diagnosis = aggregator.aggregate(&agents);

        tracing::info!(
            agents = agents.len(),
            arguments = setup.argument_count,
            conclusions = aggregator.weights().len(),
            alpha = rule.alpha(),
            baseline = %diagnosis.decision,
            "committee assembled"
        );

        Ok(Self {
            agents,
            arguments,
            rule,
            scheduler: Scheduler::new(setup.activation),
            aggregator,
            rng,
            round: 0,
            diagnosis,
        })
    }

    /// Advances one round: every agent speaks once, then the committee is re-aggregated.
    pub fn step(&mut self) -> RoundReport {
        let round = self.round + 1;
        let previous_decision = self.diagnosis.decision.clone();

        let activity = self
            .scheduler
            .run_round(&mut self.agents, &self.rule, round, &mut self.rng);
        self.diagnosis = self.aggregator.aggregate(&self.agents);
        self.round = round;

        tracing::debug!(
            round,
            order = ?activity.speaking_order,
            influences = activity.influences.len(),
            decision = %self.diagnosis.decision,
            p = self.diagnosis.decision_probability(),
            "round complete"
        );

        RoundReport {
            round,
            speaking_order: activity.speaking_order,
            influences: activity.influences,
            previous_decision,
            snapshot: self.snapshot(),
        }
    }

    /// Runs `rounds` steps and returns their reports in order.
    pub fn run_for(&mut self, rounds: u64) -> Vec<RoundReport> {
        (0..rounds).map(|_| self.step()).collect()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        if self.round == 0 {
            Phase::Idle
        } else {
            Phase::Advanced
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id as usize)
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn diagnosis(&self) -> &Diagnosis {
        &self.diagnosis
    }

    pub fn decision(&self) -> &str {
        &self.diagnosis.decision
    }

    /// Re-aggregates the current beliefs without advancing.
    pub fn aggregate(&self) -> Diagnosis {
        self.aggregator.aggregate(&self.agents)
    }

    /// Mean known belief per argument; `None` where nobody has an opinion.
    pub fn average_beliefs(&self) -> Vec<Option<f64>> {
        (0..self.arguments.len())
            .map(|argument| {
                let known: Vec<f64> = self
                    .agents
                    .iter()
                    .filter_map(|a| a.belief(argument).and_then(|b| b.value()))
                    .collect();
                if known.is_empty() {
                    None
                } else {
                    Some(known.iter().sum::<f64>() / known.len() as f64)
                }
            })
            .collect()
    }

    /// Serializable view of the current state.
    pub fn snapshot(&self) -> CommitteeSnapshot {
        CommitteeSnapshot {
            snapshot_id: generate_snapshot_id(self.round),
            round: self.round,
            arguments: self.arguments.clone(),
            agents: self.agents.iter().map(Agent::snapshot).collect(),
            average_beliefs: self.average_beliefs(),
            argument_probabilities: self.diagnosis.argument_probabilities.clone(),
            diagnosis: self.diagnosis.probabilities.clone(),
            decision: self.diagnosis.decision.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::Belief;

    fn setup() -> CommitteeSetup {
        CommitteeSetup::new(
            3,
            vec![
                AgentSpec::new(&[0.9, 0.2, 0.5], 0.8, 0.3).unwrap(),
                AgentSpec::new(&[0.4, 0.6, -1.0], 0.4, 0.5).unwrap(),
            ],
            ArgumentWeights::new()
                .with("X", vec![1.0, 0.0, 0.5])
                .with("Y", vec![0.0, 1.0, 0.5]),
        )
    }

    #[test]
    fn test_construction_is_idle_with_baseline() {
        let sim = Simulation::seeded(setup(), 1).unwrap();

        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.round(), 0);
        assert_eq!(sim.arguments(), &["A", "B", "C"]);
        let total: f64 = sim.diagnosis().probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(sim.snapshot().snapshot_id, "snap_000000");
    }

    #[test]
    fn test_step_advances_round() {
        let mut sim = Simulation::seeded(setup(), 1).unwrap();

        let first = sim.step();
        assert_eq!(first.round, 1);
        assert_eq!(sim.phase(), Phase::Advanced);

        let second = sim.step();
        assert_eq!(second.round, 2);
        assert_eq!(second.snapshot.round, 2);
        assert_eq!(second.previous_decision, first.snapshot.decision);
        assert_eq!(sim.round(), 2);
    }

    #[test]
    fn test_run_for() {
        let mut sim = Simulation::seeded(setup(), 5).unwrap();
        let reports = sim.run_for(4);

        assert_eq!(reports.len(), 4);
        assert_eq!(reports.last().map(|r| r.round), Some(4));
        assert_eq!(sim.round(), 4);
    }

    #[test]
    fn test_unknown_belief_gets_formed() {
        let mut sim = Simulation::seeded(setup(), 3).unwrap();
        assert_eq!(sim.agent(1).unwrap().belief(2), Some(Belief::Unknown));

        // agent 0 is indifferent on C, so nobody argues it
        sim.step();
        assert_eq!(sim.agent(1).unwrap().belief(2), Some(Belief::Unknown));
        assert_eq!(sim.average_beliefs()[2], Some(0.5));
    }

    #[test]
    fn test_average_beliefs_skip_unknown() {
        let mut s = setup();
        s.agents[0] = AgentSpec::new(&[0.9, 0.2, -1.0], 0.8, 0.3).unwrap();
        let sim = Simulation::seeded(s, 1).unwrap();

        let avg = sim.average_beliefs();
        assert!((avg[0].unwrap() - 0.65).abs() < 1e-12);
        assert!((avg[1].unwrap() - 0.4).abs() < 1e-12);
        assert_eq!(avg[2], None);
    }

    #[test]
    fn test_aggregate_matches_stored_diagnosis() {
        let mut sim = Simulation::seeded(setup(), 11).unwrap();
        sim.step();
        assert_eq!(&sim.aggregate(), sim.diagnosis());
        assert_eq!(sim.aggregate(), sim.aggregate());
    }

    #[test]
    fn test_configuration_errors() {
        let mut s = setup();
        s.agents.clear();
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Configuration(_))));

        let mut s = setup();
        s.argument_count = 0;
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Configuration(_))));

        let s = setup().with_argument_labels(vec!["only one".into()]);
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Configuration(_))));

        let mut s = setup();
        s.agents.push(AgentSpec::new(&[0.5, 0.5], 0.5, 0.5).unwrap());
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Configuration(_))));
    }

    #[test]
    fn test_domain_errors() {
        let s = setup().with_influence(InfluenceParams { alpha: -0.1 });
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Domain { .. })));

        let mut s = setup();
        s.agents[1].influence = 2.0;
        assert!(matches!(Simulation::seeded(s, 0), Err(CommitteeError::Domain { .. })));
    }

    #[test]
    fn test_custom_labels_in_snapshot() {
        let labels: Vec<String> = vec!["fever".into(), "travel".into(), "rash".into()];
        let sim = Simulation::seeded(setup().with_argument_labels(labels.clone()), 0).unwrap();
        assert_eq!(sim.snapshot().arguments, labels);
    }
}
