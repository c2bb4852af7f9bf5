//! Zika / Chikungunya committee tests
//!
//! The fixed three-doctor case plus invariants that must hold over many rounds.

use committee_core::agent::AgentSpec;
use committee_core::aggregator::ArgumentWeights;
use committee_core::config::CommitteeConfig;
use committee_core::scenario::{zika_chikungunya_weights, Preset, ZIKA_CHIKUNGUNYA_ARGUMENTS};
use committee_core::scheduler::Activation;
use committee_core::simulation::{CommitteeSetup, Simulation};
use committee_events::InfluenceOutcome;

fn case_setup() -> CommitteeSetup {
    CommitteeSetup::new(
        5,
        vec![
            AgentSpec::new(&[0.75, 0.30, 0.80, 0.50, 0.50], 0.5, 0.5).unwrap(),
            AgentSpec::new(&[0.80, 0.50, 0.70, 0.40, 0.50], 0.5, 0.5).unwrap(),
            AgentSpec::new(&[0.40, 0.90, 0.55, 0.75, 0.98], 0.7, 0.6).unwrap(),
        ],
        ArgumentWeights::new()
            .with("Zika", vec![0.4, 0.0, 0.6, 0.0, 0.0])
            .with("Chikungunya", vec![0.0, 0.25, 0.0, 0.25, 0.5]),
    )
}

fn assert_distribution(probabilities: impl IntoIterator<Item = f64>) {
    let probabilities: Vec<f64> = probabilities.into_iter().collect();
    for p in &probabilities {
        assert!(*p > 0.0 && *p < 1.0, "probability {} outside (0, 1)", p);
    }
    let total: f64 = probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-9, "probabilities sum to {}", total);
}

#[test]
fn test_default_preset_matches_case() {
    let config = CommitteeConfig::default();
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let setup = config.build_setup(&mut rng).unwrap();

    assert_eq!(setup.agents, case_setup().agents);
    assert_eq!(setup.conclusions, zika_chikungunya_weights());
    assert_eq!(ZIKA_CHIKUNGUNYA_ARGUMENTS.len(), setup.argument_count);
}

#[test]
fn test_one_step_diagnosis() {
    for seed in 0..32 {
        let mut sim = Simulation::seeded(case_setup(), seed).unwrap();
        let report = sim.step();

        assert!(["Zika", "Chikungunya"].contains(&report.snapshot.decision.as_str()));
        assert_distribution(report.snapshot.diagnosis.values().copied());
        // every speaking order of this committee ends round one on Zika
        assert_eq!(report.snapshot.decision, "Zika", "seed {}", seed);
    }
}

#[test]
fn test_sequential_activation_matches_pinned_baseline() {
    let setup = case_setup().with_activation(Activation::Sequential);
    let mut sim = Simulation::seeded(setup, 0).unwrap();

    assert_eq!(sim.decision(), "Zika");
    let report = sim.step();
    assert_eq!(report.speaking_order, vec![0, 1, 2]);
    assert_eq!(report.snapshot.decision, "Zika");
}

#[test]
fn test_invariants_hold_over_many_rounds() {
    let mut sim = Simulation::seeded(case_setup(), 2024).unwrap();

    for expected_round in 1..=100 {
        let report = sim.step();
        assert_eq!(report.round, expected_round);

        let mut order = report.speaking_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2]);

        assert_distribution(report.snapshot.diagnosis.values().copied());
        assert_distribution(report.snapshot.argument_probabilities.iter().copied());

        for agent in &report.snapshot.agents {
            for belief in agent.beliefs.iter().flatten() {
                assert!((0.0..=1.0).contains(belief));
            }
        }
        for event in &report.influences {
            assert_ne!(event.speaker, event.listener);
            assert!((0.0..=1.0).contains(&event.after));
        }
    }
}

#[test]
fn test_traits_never_change() {
    let mut sim = Simulation::seeded(case_setup(), 8).unwrap();
    let before: Vec<(f64, f64)> = sim.agents().iter().map(|a| (a.influence(), a.stubbornness())).collect();

    sim.run_for(30);

    let after: Vec<(f64, f64)> = sim.agents().iter().map(|a| (a.influence(), a.stubbornness())).collect();
    assert_eq!(before, after);
}

#[test]
fn test_listener_never_overshoots_speaker() {
    // The expert cannot be moved (no one else has influence), so the novice
    // climbs towards 0.9 and must never pass it.
    let setup = CommitteeSetup::new(
        1,
        vec![
            AgentSpec::new(&[0.9], 1.0, 0.0).unwrap(),
            AgentSpec::new(&[0.1], 0.0, 0.0).unwrap(),
        ],
        ArgumentWeights::new().with("X", vec![1.0]).with("Y", vec![-1.0]),
    );
    let mut sim = Simulation::seeded(setup, 21).unwrap();

    let mut previous = 0.1;
    let mut clamped = false;
    for report in sim.run_for(60) {
        let expert = report.snapshot.agents[0].belief(0).unwrap();
        let novice = report.snapshot.agents[1].belief(0).unwrap();

        assert!((expert - 0.9).abs() < 1e-9);
        assert!(novice <= 0.9 + 1e-9, "novice overshot to {}", novice);
        assert!(novice >= previous - 1e-12, "novice moved away from the expert");
        previous = novice;

        clamped |= report
            .influences
            .iter()
            .any(|e| e.listener == 1 && e.outcome == InfluenceOutcome::Clamped);
    }
    assert!(clamped, "novice should reach the expert within 60 rounds");
}

#[test]
fn test_fully_stubborn_committee_never_moves() {
    let setup = CommitteeSetup::new(
        2,
        vec![
            AgentSpec::new(&[0.9, 0.1], 1.0, 1.0).unwrap(),
            AgentSpec::new(&[0.2, 0.8], 1.0, 1.0).unwrap(),
        ],
        ArgumentWeights::new().with("X", vec![1.0, 0.0]).with("Y", vec![0.0, 1.0]),
    );
    let mut sim = Simulation::seeded(setup, 1).unwrap();
    let initial = sim.snapshot();

    let report = sim.step();
    assert!(report.influences.is_empty());
    assert_eq!(report.snapshot.agents, initial.agents);
    assert_eq!(report.snapshot.decision, initial.decision);
}

#[test]
fn test_single_conclusion_always_decides_it() {
    let setup = CommitteeSetup::new(
        5,
        case_setup().agents,
        ArgumentWeights::new().with("Zika", vec![0.4, 0.0, 0.6, 0.0, 0.0]),
    );
    let mut sim = Simulation::seeded(setup, 3).unwrap();

    for report in sim.run_for(5) {
        assert_eq!(report.snapshot.decision, "Zika");
        assert_eq!(report.snapshot.probability_of("Zika"), Some(1.0));
    }
}

#[test]
fn test_every_generated_preset_runs() {
    for &preset in Preset::generated() {
        let mut config = CommitteeConfig::default();
        config.committee.preset = preset;
        config.committee.doctors = if preset == Preset::Default { 3 } else { 6 };

        let mut rng = <rand::rngs::SmallRng as rand::SeedableRng>::seed_from_u64(17);
        let setup = config.build_setup(&mut rng).unwrap();
        let mut sim = Simulation::new(setup, rng).unwrap();

        for report in sim.run_for(10) {
            assert_distribution(report.snapshot.diagnosis.values().copied());
        }
    }
}
