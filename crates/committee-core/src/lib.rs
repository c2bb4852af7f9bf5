//! Core deliberation logic: beliefs, persuasion, scheduling, aggregation.

pub mod agent;
pub mod aggregator;
pub mod batch;
pub mod belief;
pub mod config;
pub mod error;
pub mod influence;
pub mod output;
pub mod scenario;
pub mod scheduler;
pub mod simulation;

pub use agent::{Agent, AgentId, AgentSpec};
pub use aggregator::{ArgumentWeights, CommitteeAggregator, Diagnosis};
pub use batch::BatchRunner;
pub use belief::{Belief, BeliefVector};
pub use config::{CommitteeConfig, ConfigError};
pub use error::CommitteeError;
pub use influence::{InfluenceParams, InfluenceRule};
pub use output::{OutputError, SnapshotWriter};
pub use scenario::Preset;
pub use scheduler::{Activation, Scheduler};
pub use simulation::{CommitteeSetup, Phase, Simulation};
