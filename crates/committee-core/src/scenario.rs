//! Committee Presets
//!
//! Ready-made committees for the Zika / Chikungunya case and the standard
//! influence configurations used to study how committee make-up affects the
//! outcome.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::AgentSpec;
use crate::aggregator::ArgumentWeights;
use crate::error::CommitteeError;

/// Label for the argument at `index`: "A" to "Z", then "arg_27", ...
pub fn argument_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("arg_{}", index + 1)
    }
}

/// Human-readable argument texts for the default case.
pub const ZIKA_CHIKUNGUNYA_ARGUMENTS: &[(&str, &str)] = &[
    ("A", "The patient has high fevers, which is one of the main symptoms of Zika"),
    ("B", "The patient has high fevers, which is one of the main symptoms of Chikungunya"),
    (
        "C",
        "The patient recently traveled to Brazil. To date, Brazil is the country with the \
         largest number of reported cases of Zika; this number is estimated to be between \
         500,000 and 1,500,000",
    ),
    ("D", "The patient presents acute joint pain, which is a common symptom of Chikungunya"),
    (
        "E",
        "RT-PCR test results came positive. The sensitivity of this test for CHIKV \
         (Chikungunya) in the early stages of infection is 88.3%.",
    ),
];

/// Candidate diagnoses for the default case.
pub const ZIKA_CHIKUNGUNYA_CONCLUSIONS: &[(&str, &str)] = &[
    ("Zika", "He has Zika"),
    ("Chikungunya", "He has Chikungunya"),
];

/// Argument weights for the default case.
pub fn zika_chikungunya_weights() -> ArgumentWeights {
    ArgumentWeights::new()
        .with("Zika", vec![0.4, 0.0, 0.6, 0.0, 0.0])
        .with("Chikungunya", vec![0.0, 0.25, 0.0, 0.25, 0.5])
}

/// The case as read out to the committee: every argument, then every
/// candidate diagnosis.
pub fn zika_chikungunya_briefing() -> String {
    let mut text = String::from("Arguments:\n");
    for (label, argument) in ZIKA_CHIKUNGUNYA_ARGUMENTS {
        text.push_str(&format!("  {}: {}\n", label, argument));
    }
    text.push_str("Possible diagnoses:\n");
    for (label, conclusion) in ZIKA_CHIKUNGUNYA_CONCLUSIONS {
        text.push_str(&format!("  {}: {}\n", label, conclusion));
    }
    text
}

const STRONG_TRAIT: &[f64] = &[0.8, 0.9, 0.95];
const WEAK_TRAIT: &[f64] = &[0.1, 0.2, 0.3];
const UNCERTAIN_BELIEF: &[f64] = &[0.4, 0.5, 0.6];
const RANDOM_LEVEL: &[f64] = &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Belief arrays firmly backing one conclusion each (Zika-leaning, Chikungunya-leaning).
const STRONG_CONCLUSION: [[f64; 5]; 2] = [
    [0.90, 0.3, 0.90, 0.2, 0.4],
    [0.3, 0.90, 0.2, 0.80, 0.90],
];

const DEFAULT_COMMITTEE: [([f64; 5], f64, f64); 3] = [
    ([0.75, 0.30, 0.80, 0.50, 0.50], 0.5, 0.5),
    ([0.80, 0.50, 0.70, 0.40, 0.50], 0.5, 0.5),
    ([0.40, 0.90, 0.55, 0.75, 0.98], 0.7, 0.6),
];

/// Standard committee compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// The fixed three-doctor Zika / Chikungunya committee
    #[default]
    Default,
    /// One strong, convinced doctor among weak, uncertain peers
    DominantExpert,
    /// Two strong doctors backing opposite conclusions, the rest weak and uncertain
    Bipolar,
    /// Everyone weak and uncertain
    WeakUncertain,
    /// Everyone strong and uncertain
    StrongUncertain,
    /// Everyone at 0.5 influence and stubbornness, uncertain beliefs
    Balanced,
    /// Beliefs, influence and stubbornness drawn from 0.1 to 0.9
    Random,
    /// Agents supplied explicitly in configuration
    Custom,
}

impl Preset {
    /// Returns all variants that generate their own agents.
    pub fn generated() -> &'static [Preset] {
        &[
            Preset::Default,
            Preset::DominantExpert,
            Preset::Bipolar,
            Preset::WeakUncertain,
            Preset::StrongUncertain,
            Preset::Balanced,
            Preset::Random,
        ]
    }

    /// Builds agent specs for `doctors` agents over `arguments` arguments.
    pub fn agents<R: Rng + ?Sized>(
        self,
        doctors: usize,
        arguments: usize,
        rng: &mut R,
    ) -> Result<Vec<AgentSpec>, CommitteeError> {
        if doctors == 0 {
            return Err(CommitteeError::config("committee needs at least one agent"));
        }

        let specs = match self {
            Preset::Default => {
                if doctors != 3 || arguments != 5 {
                    return Err(CommitteeError::config(format!(
                        "the default case needs 3 doctors and 5 arguments, got {} and {}",
                        doctors, arguments
                    )));
                }
                DEFAULT_COMMITTEE
                    .iter()
                    .map(|(beliefs, influence, stubbornness)| {
                        AgentSpec::new(beliefs, *influence, *stubbornness)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            Preset::DominantExpert => {
                require_conclusion_arrays(self, arguments)?;
                let mut specs = Vec::with_capacity(doctors);
                let beliefs = pick(&STRONG_CONCLUSION, rng);
                specs.push(AgentSpec::new(&beliefs, pick(STRONG_TRAIT, rng), pick(STRONG_TRAIT, rng))?);
                for _ in 1..doctors {
                    specs.push(uncertain(arguments, WEAK_TRAIT, rng)?);
                }
                specs
            }
            Preset::Bipolar => {
                require_conclusion_arrays(self, arguments)?;
                let mut specs = Vec::with_capacity(doctors);
                for beliefs in STRONG_CONCLUSION.iter().take(doctors) {
                    specs.push(AgentSpec::new(beliefs, pick(STRONG_TRAIT, rng), pick(STRONG_TRAIT, rng))?);
                }
                for _ in specs.len()..doctors {
                    specs.push(uncertain(arguments, WEAK_TRAIT, rng)?);
                }
                specs
            }
            Preset::WeakUncertain => (0..doctors)
                .map(|_| uncertain(arguments, WEAK_TRAIT, rng))
                .collect::<Result<Vec<_>, _>>()?,
            Preset::StrongUncertain => (0..doctors)
                .map(|_| uncertain(arguments, STRONG_TRAIT, rng))
                .collect::<Result<Vec<_>, _>>()?,
            Preset::Balanced => (0..doctors)
                .map(|_| {
                    let beliefs = draw(UNCERTAIN_BELIEF, arguments, rng);
                    AgentSpec::new(&beliefs, 0.5, 0.5)
                })
                .collect::<Result<Vec<_>, _>>()?,
            Preset::Random => (0..doctors)
                .map(|_| {
                    let beliefs = draw(RANDOM_LEVEL, arguments, rng);
                    AgentSpec::new(&beliefs, pick(RANDOM_LEVEL, rng), pick(RANDOM_LEVEL, rng))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Preset::Custom => {
                return Err(CommitteeError::config(
                    "the custom preset takes its agents from configuration",
                ));
            }
        };

        Ok(specs)
    }
}

fn require_conclusion_arrays(preset: Preset, arguments: usize) -> Result<(), CommitteeError> {
    if arguments == STRONG_CONCLUSION[0].len() {
        Ok(())
    } else {
        Err(CommitteeError::config(format!(
            "preset {:?} uses 5-argument conclusion beliefs, got {} arguments",
            preset, arguments
        )))
    }
}

/// Weak or strong doctor with uncertain beliefs.
fn uncertain<R: Rng + ?Sized>(
    arguments: usize,
    traits: &[f64],
    rng: &mut R,
) -> Result<AgentSpec, CommitteeError> {
    let beliefs = draw(UNCERTAIN_BELIEF, arguments, rng);
    AgentSpec::new(&beliefs, pick(traits, rng), pick(traits, rng))
}

fn pick<T: Copy, R: Rng + ?Sized>(choices: &[T], rng: &mut R) -> T {
    // choices are non-empty constants
    *choices.choose(rng).unwrap_or(&choices[0])
}

fn draw<R: Rng + ?Sized>(choices: &[f64], count: usize, rng: &mut R) -> Vec<f64> {
    (0..count).map(|_| pick(choices, rng)).collect()
}
