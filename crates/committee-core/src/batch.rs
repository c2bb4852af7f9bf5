//! Batch Runs
//!
//! Sweeps committee sizes, running several independently seeded
//! deliberations per size and summarizing how the decision settles.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use committee_events::{generate_run_id, BatchReport, BatchRunRecord};

use crate::config::{CommitteeConfig, ConfigError};
use crate::simulation::Simulation;

/// Runs every batch configured in a [`CommitteeConfig`].
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: CommitteeConfig,
}

impl BatchRunner {
    pub fn new(config: CommitteeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommitteeConfig {
        &self.config
    }

    /// Total number of runs the sweep will perform.
    pub fn run_count(&self) -> usize {
        self.config.batch.agent_counts.len() * self.config.batch.runs_per_count
    }

    /// Seed for the `index`-th run of the sweep.
    pub fn seed_for(&self, index: usize) -> u64 {
        self.config.batch.base_seed.wrapping_add(index as u64)
    }

    /// Performs one run. The same seed drives committee generation and the
    /// deliberation, so a record is reproducible from its seed alone.
    pub fn run_one(&self, agent_count: usize, repetition: usize, seed: u64) -> Result<BatchRunRecord, ConfigError> {
        let batch = &self.config.batch;
        let run_id = generate_run_id(agent_count, repetition);

        let mut rng = SmallRng::seed_from_u64(seed);
        let setup = self.config.build_setup_with(batch.preset, agent_count, &mut rng)?;
        let argument_count = setup.argument_count;
        let agent_count = setup.agents.len();
        let mut sim = Simulation::new(setup, rng)?;

        let mut decision_changes = 0;
        let mut last_change_round = 0;
        for _ in 0..batch.rounds {
            let report = sim.step();
            if report.decision_changed() {
                decision_changes += 1;
                last_change_round = report.round;
                tracing::warn!(
                    run = %run_id,
                    round = report.round,
                    from = %report.previous_decision,
                    to = %report.snapshot.decision,
                    "decision flipped"
                );
            }
        }

        let diagnosis = sim.diagnosis();
        let correct = self
            .config
            .committee
            .ground_truth
            .as_ref()
            .map(|truth| *truth == diagnosis.decision);

        Ok(BatchRunRecord {
            run_id,
            seed,
            agent_count,
            argument_count,
            rounds: sim.round(),
            decision: diagnosis.decision.clone(),
            probabilities: diagnosis.probabilities.clone(),
            decision_changes,
            last_change_round,
            correct,
        })
    }

    /// Runs the whole sweep, committee sizes in configured order.
    pub fn run(&self) -> Result<BatchReport, ConfigError> {
        let batch = &self.config.batch;
        tracing::info!(
            sizes = ?batch.agent_counts,
            runs_per_count = batch.runs_per_count,
            rounds = batch.rounds,
            preset = ?batch.preset,
            "starting batch"
        );

        let mut runs = Vec::with_capacity(self.run_count());
        for (group, &agent_count) in batch.agent_counts.iter().enumerate() {
            for repetition in 0..batch.runs_per_count {
                let seed = self.seed_for(group * batch.runs_per_count + repetition);
                runs.push(self.run_one(agent_count, repetition, seed)?);
            }
        }

        let report = BatchReport::from_runs(self.config.committee.ground_truth.clone(), runs);
        tracing::info!(runs = report.runs.len(), groups = report.groups.len(), "batch finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommitteeError;
    use crate::scenario::Preset;

    fn config() -> CommitteeConfig {
        let mut config = CommitteeConfig::default();
        config.batch.agent_counts = vec![3, 6];
        config.batch.runs_per_count = 4;
        config.batch.rounds = 8;
        config.batch.base_seed = 500;
        config
    }

    #[test]
    fn test_batch_covers_every_size() {
        let report = BatchRunner::new(config()).run().unwrap();

        assert_eq!(report.runs.len(), 8);
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.group(3).unwrap().runs, 4);
        assert_eq!(report.group(6).unwrap().runs, 4);

        for run in &report.runs {
            assert_eq!(run.rounds, 8);
            assert_eq!(run.argument_count, 5);
            assert!(run.last_change_round <= 8);
            assert!(run.decision_changes as u64 <= run.rounds);
            let total: f64 = run.probabilities.values().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seeds_count_up_from_base() {
        let runner = BatchRunner::new(config());
        let report = runner.run().unwrap();

        let seeds: Vec<u64> = report.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, (500..508).collect::<Vec<_>>());
        assert_eq!(report.runs[5].run_id, "run_006_0001");
    }

    #[test]
    fn test_batch_is_reproducible() {
        let a = BatchRunner::new(config()).run().unwrap();
        let b = BatchRunner::new(config()).run().unwrap();
        assert_eq!(a, b);

        let runner = BatchRunner::new(config());
        let again = runner.run_one(6, 1, a.runs[5].seed).unwrap();
        assert_eq!(again, a.runs[5]);
    }

    #[test]
    fn test_ground_truth_scores_runs() {
        let mut config = config();
        config.committee.ground_truth = Some("Zika".to_string());
        let report = BatchRunner::new(config).run().unwrap();

        for run in &report.runs {
            assert_eq!(run.correct, Some(run.decision == "Zika"));
        }
        assert!(report.group(3).unwrap().accuracy.is_some());
    }

    #[test]
    fn test_without_ground_truth_runs_are_unscored() {
        let report = BatchRunner::new(config()).run().unwrap();
        assert!(report.runs.iter().all(|r| r.correct.is_none()));
        assert!(report.groups.iter().all(|g| g.accuracy.is_none()));
    }

    #[test]
    fn test_invalid_preset_size_fails() {
        let mut config = config();
        config.batch.preset = Preset::Default;
        let err = BatchRunner::new(config).run().unwrap_err();
        assert!(matches!(err, ConfigError::Committee(CommitteeError::Configuration(_))));
    }

    fn custom_config(agent_counts: Vec<usize>) -> CommitteeConfig {
        let mut config = CommitteeConfig::from_str(
            r#"
            [committee]
            preset = "custom"
            arguments = 2

            [[committee.agents]]
            beliefs = [0.9, 0.2]
            influence = 0.6
            stubbornness = 0.3

            [[committee.agents]]
            beliefs = [0.3, 0.8]
            influence = 0.5
            stubbornness = 0.4

            [conclusions]
            flu = [1.0, 0.0]
            cold = [0.0, 1.0]
            "#,
        )
        .unwrap();
        config.batch.preset = Preset::Custom;
        config.batch.agent_counts = agent_counts;
        config.batch.runs_per_count = 3;
        config.batch.rounds = 5;
        config
    }

    #[test]
    fn test_custom_batch_records_actual_committee_size() {
        let report = BatchRunner::new(custom_config(vec![2])).run().unwrap();

        assert_eq!(report.runs.len(), 3);
        assert!(report.runs.iter().all(|r| r.agent_count == 2));
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].agent_count, 2);
    }

    #[test]
    fn test_custom_batch_cannot_be_resized() {
        let err = BatchRunner::new(custom_config(vec![3, 7])).run().unwrap_err();
        assert!(matches!(err, ConfigError::Committee(CommitteeError::Configuration(_))));
    }

    #[test]
    fn test_empty_sweep() {
        let mut config = config();
        config.batch.agent_counts.clear();
        let runner = BatchRunner::new(config);

        assert_eq!(runner.run_count(), 0);
        let report = runner.run().unwrap();
        assert!(report.runs.is_empty());
        assert!(report.groups.is_empty());
    }
}
