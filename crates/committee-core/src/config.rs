//! Configuration System
//!
//! Loads committee, simulation and batch settings from a TOML file. Every
//! section falls back to defaults, so a partial file only overrides what it
//! names.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::agent::AgentSpec;
use crate::aggregator::ArgumentWeights;
use crate::error::CommitteeError;
use crate::influence::{InfluenceParams, DEFAULT_ALPHA};
use crate::scenario::{zika_chikungunya_weights, Preset};
use crate::scheduler::Activation;
use crate::simulation::CommitteeSetup;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "committee.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitteeConfig {
    pub simulation: SimulationConfig,
    pub committee: CommitteeSection,
    /// Conclusion label -> weight per argument
    pub conclusions: ArgumentWeights,
    pub batch: BatchConfig,
}

impl Default for CommitteeConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            committee: CommitteeSection::default(),
            conclusions: zika_chikungunya_weights(),
            batch: BatchConfig::default(),
        }
    }
}

/// Single-run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Rounds to run
    pub rounds: u64,
    /// Persuasion damping
    pub alpha: f64,
    pub activation: Activation,
    /// Rounds between captured snapshots (0 captures only first and last)
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: 10,
            alpha: DEFAULT_ALPHA,
            activation: Activation::Random,
            snapshot_interval: 1,
        }
    }
}

/// Committee composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitteeSection {
    pub preset: Preset,
    pub doctors: usize,
    pub arguments: usize,
    /// Conclusion considered correct, for scoring batch runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    /// Explicit agents, used with the `custom` preset
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentConfig>,
}

impl Default for CommitteeSection {
    fn default() -> Self {
        Self {
            preset: Preset::Default,
            doctors: 3,
            arguments: 5,
            ground_truth: None,
            agents: Vec::new(),
        }
    }
}

/// One explicitly configured agent. A belief of `-1` means no opinion yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub beliefs: Vec<f64>,
    pub influence: f64,
    pub stubbornness: f64,
}

/// Batch sweep parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Committee sizes to sweep
    pub agent_counts: Vec<usize>,
    /// Independent runs per committee size
    pub runs_per_count: usize,
    /// Rounds per run
    pub rounds: u64,
    /// Seed of the first run; later runs count up from here
    pub base_seed: u64,
    pub preset: Preset,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            agent_counts: vec![3, 5, 7, 9],
            runs_per_count: 10,
            rounds: 20,
            base_seed: 1000,
            preset: Preset::Random,
        }
    }
}

impl CommitteeConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Loads from the default path, or uses defaults if it cannot be read.
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("could not load {}: {}. Using defaults.", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn influence_params(&self) -> InfluenceParams {
        InfluenceParams {
            alpha: self.simulation.alpha,
        }
    }

    /// Builds the configured committee. A custom committee is as large as
    /// its listed agents, whatever `doctors` says.
    pub fn build_setup<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<CommitteeSetup, ConfigError> {
        let doctors = match self.committee.preset {
            Preset::Custom => self.committee.agents.len(),
            _ => self.committee.doctors,
        };
        self.build_setup_with(self.committee.preset, doctors, rng)
    }

    /// Builds a committee from a preset and size, keeping every other setting.
    ///
    /// The custom preset cannot be resized: `doctors` must match the number
    /// of configured agents.
    pub fn build_setup_with<R: Rng + ?Sized>(
        &self,
        preset: Preset,
        doctors: usize,
        rng: &mut R,
    ) -> Result<CommitteeSetup, ConfigError> {
        let arguments = self.committee.arguments;
        let agents = match preset {
            Preset::Custom => {
                let configured = self.committee.agents.len();
                if doctors != configured {
                    return Err(CommitteeError::config(format!(
                        "custom committee lists {} agents, cannot run it with {}",
                        configured, doctors
                    ))
                    .into());
                }
                self.committee
                    .agents
                    .iter()
                    .map(|a| AgentSpec::new(&a.beliefs, a.influence, a.stubbornness))
                    .collect::<Result<Vec<_>, _>>()?
            }
            preset => preset.agents(doctors, arguments, rng)?,
        };

        Ok(CommitteeSetup::new(arguments, agents, self.conclusions.clone())
            .with_influence(self.influence_params())
            .with_activation(self.simulation.activation))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Committee(#[from] CommitteeError),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Committee Deliberation Configuration

[simulation]
seed = 42
rounds = 10
alpha = 0.25
activation = "random"      # or "sequential"
snapshot_interval = 1

[committee]
# default | dominant_expert | bipolar | weak_uncertain | strong_uncertain
# | balanced | random | custom
preset = "default"
doctors = 3
arguments = 5
# ground_truth = "Chikungunya"

# With preset = "custom", list each doctor (-1 marks an unformed opinion):
# [[committee.agents]]
# beliefs = [0.75, 0.30, 0.80, 0.50, 0.50]
# influence = 0.5
# stubbornness = 0.5

[conclusions]
Zika = [0.4, 0.0, 0.6, 0.0, 0.0]
Chikungunya = [0.0, 0.25, 0.0, 0.25, 0.5]

[batch]
agent_counts = [3, 5, 7, 9]
runs_per_count = 10
rounds = 20
base_seed = 1000
preset = "random"
"#
    .to_string()
}
