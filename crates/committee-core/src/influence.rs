//! Pairwise Persuasion
//!
//! When a speaker addresses a listener, each argument is considered on its
//! own. The speaker can only pull the listener towards a position it holds
//! more firmly on the same side of indifference, and the listener never ends
//! up past the speaker.

use serde::{Deserialize, Serialize};

use committee_events::{InfluenceEvent, InfluenceOutcome};

use crate::agent::Agent;
use crate::belief::{sign, Belief};
use crate::error::{check_unit, CommitteeError};

/// Maximum persuasion rate per address.
pub const DEFAULT_ALPHA: f64 = 0.25;

/// Tunable parameters of the influence rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceParams {
    /// Damping applied to every persuasion step
    pub alpha: f64,
}

impl Default for InfluenceParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Result of one persuasion in convincing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Persuasion {
    pub value: f64,
    pub outcome: InfluenceOutcome,
}

/// Scalar persuasion step on convincing values.
///
/// `a` is the speaker's value, `b` the listener's, `eta` the effective rate.
/// Returns `None` when the speaker is not eligible to move the listener.
pub fn persuade(a: f64, b: f64, eta: f64) -> Option<Persuasion> {
    let sign_s = sign(a);
    // An indifferent speaker has nothing to push.
    if sign_s == 0.0 || sign(a - b) != sign_s {
        return None;
    }

    let candidate = b + eta * a;
    if sign_s * a > sign_s * candidate {
        Some(Persuasion {
            value: candidate,
            outcome: InfluenceOutcome::Moved,
        })
    } else {
        Some(Persuasion {
            value: a,
            outcome: InfluenceOutcome::Clamped,
        })
    }
}

/// A listener's belief change on one argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefShift {
    pub argument: usize,
    pub before: Belief,
    pub after: Belief,
    pub outcome: InfluenceOutcome,
}

/// The engine-owned persuasion rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluenceRule {
    alpha: f64,
}

impl Default for InfluenceRule {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl InfluenceRule {
    pub fn new(params: InfluenceParams) -> Result<Self, CommitteeError> {
        Ok(Self {
            alpha: check_unit("alpha", params.alpha)?,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Effective persuasion rate of `speaker` on `listener`.
    pub fn eta(&self, speaker: &Agent, listener: &Agent) -> f64 {
        speaker.influence() * (1.0 - listener.stubbornness()) * self.alpha
    }

    /// Applies the speaker's position on one argument to the listener.
    ///
    /// A speaker without an opinion on the argument never argues it. A
    /// listener without one is persuaded starting from indifference. A step
    /// of zero size (no influence, or a fully stubborn listener) leaves the
    /// listener untouched and is not reported.
    pub fn apply(&self, speaker: &Agent, listener: &mut Agent, argument: usize) -> Option<BeliefShift> {
        let a = speaker.belief(argument)?.convincing()?;
        let before = listener.belief(argument)?;
        let b = before.convincing_or_indifferent();

        let persuasion = persuade(a, b, self.eta(speaker, listener))?;
        if persuasion.value == b {
            return None;
        }
        let after = Belief::from_convincing(persuasion.value);
        listener.set_belief(argument, after);

        Some(BeliefShift {
            argument,
            before,
            after,
            outcome: persuasion.outcome,
        })
    }

    /// Lets the agent at `speaker` address every other agent, in id order.
    ///
    /// Listeners do not interact during one speaker's turn, so the order of
    /// listeners does not affect the result.
    pub fn speak(&self, agents: &mut [Agent], speaker: usize, round: u64) -> Vec<InfluenceEvent> {
        let mut events = Vec::new();

        for listener in 0..agents.len() {
            if listener == speaker {
                continue;
            }
            let (s, l) = speaker_and_listener(agents, speaker, listener);
            for argument in 0..s.beliefs().len() {
                if let Some(shift) = self.apply(s, l, argument) {
                    let after = shift.after.value().unwrap_or_default();
                    tracing::trace!(
                        round,
                        speaker = s.id(),
                        listener = l.id(),
                        argument,
                        after,
                        "persuaded"
                    );
                    events.push(InfluenceEvent {
                        round,
                        speaker: s.id(),
                        listener: l.id(),
                        argument,
                        before: shift.before.value(),
                        after,
                        outcome: shift.outcome,
                    });
                }
            }
        }

        events
    }
}

/// Borrows one agent immutably and a different one mutably.
fn speaker_and_listener(agents: &mut [Agent], speaker: usize, listener: usize) -> (&Agent, &mut Agent) {
    debug_assert_ne!(speaker, listener);
    if speaker < listener {
        let (left, right) = agents.split_at_mut(listener);
        (&left[speaker], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(speaker);
        (&right[0], &mut left[listener])
    }
}
