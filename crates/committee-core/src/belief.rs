//! Beliefs and the Convincing Transform
//!
//! A belief is a confidence in [0, 1] that an argument holds, with 0.5 meaning
//! indifference. The convincing transform recentres that scale on zero so the
//! sign gives the side and the magnitude gives the strength:
//!
//! ```
//! use committee_core::belief::{from_convincing, to_convincing};
//!
//! assert_eq!(to_convincing(0.75), 0.5);
//! assert_eq!(from_convincing(-1.0), 0.0);
//! ```

use crate::error::CommitteeError;

/// Raw value used by setup files to mark an argument with no opinion yet.
pub const UNKNOWN_SENTINEL: f64 = -1.0;

/// Maps a belief in [0, 1] to a convincing value in [-1, 1].
#[inline]
pub fn to_convincing(belief: f64) -> f64 {
    2.0 * belief - 1.0
}

/// Inverse of [`to_convincing`].
#[inline]
pub fn from_convincing(convincing: f64) -> f64 {
    (convincing + 1.0) / 2.0
}

/// Sign with `sign(0) == 0`, unlike `f64::signum`.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Confidence in a single argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Belief {
    Known(f64),
    /// No opinion formed yet
    Unknown,
}

impl Belief {
    /// Validates a known belief.
    pub fn new(value: f64) -> Result<Self, CommitteeError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Belief::Known(value))
        } else {
            Err(CommitteeError::unit_interval("belief", value))
        }
    }

    /// Decodes a raw setup value, accepting [`UNKNOWN_SENTINEL`] as `Unknown`.
    pub fn from_raw(value: f64) -> Result<Self, CommitteeError> {
        if value == UNKNOWN_SENTINEL {
            Ok(Belief::Unknown)
        } else {
            Self::new(value)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Belief::Known(v) => Some(v),
            Belief::Unknown => None,
        }
    }

    /// Convincing value, or `None` when no opinion exists.
    pub fn convincing(self) -> Option<f64> {
        self.value().map(to_convincing)
    }

    /// Convincing value with an unformed opinion read as indifference.
    pub fn convincing_or_indifferent(self) -> f64 {
        self.convincing().unwrap_or(0.0)
    }

    /// Builds a known belief from a convincing value.
    pub fn from_convincing(convincing: f64) -> Self {
        Belief::Known(from_convincing(convincing))
    }
}

/// One agent's beliefs, one entry per argument.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefVector(Vec<Belief>);

impl BeliefVector {
    pub fn new(beliefs: Vec<Belief>) -> Self {
        Self(beliefs)
    }

    /// Validates every value, decoding the unknown sentinel.
    pub fn from_raw(values: &[f64]) -> Result<Self, CommitteeError> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Belief::from_raw(v).map_err(|_| {
                    CommitteeError::unit_interval(format!("belief[{}]", i), v)
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, argument: usize) -> Option<Belief> {
        self.0.get(argument).copied()
    }

    pub(crate) fn set(&mut self, argument: usize, belief: Belief) {
        self.0[argument] = belief;
    }

    pub fn iter(&self) -> impl Iterator<Item = Belief> + '_ {
        self.0.iter().copied()
    }

    /// Element-wise convincing transform; unknown entries map to `None`.
    pub fn to_convincing(&self) -> Vec<Option<f64>> {
        self.iter().map(Belief::convincing).collect()
    }

    /// Raw values, `None` for unknown entries.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.iter().map(Belief::value).collect()
    }

    pub fn as_slice(&self) -> &[Belief] {
        &self.0
    }
}

impl From<Vec<Belief>> for BeliefVector {
    fn from(beliefs: Vec<Belief>) -> Self {
        Self(beliefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_over_unit_interval() {
        for i in 0..=1000 {
            let b = i as f64 / 1000.0;
            let back = from_convincing(to_convincing(b));
            assert!((back - b).abs() < 1e-12, "round trip drifted at {}", b);
        }
    }

    #[test]
    fn test_transform_endpoints() {
        assert_eq!(to_convincing(0.0), -1.0);
        assert_eq!(to_convincing(0.5), 0.0);
        assert_eq!(to_convincing(1.0), 1.0);
        assert_eq!(from_convincing(0.0), 0.5);
    }

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(0.3), 1.0);
        assert_eq!(sign(-2.0), -1.0);
    }

    #[test]
    fn test_belief_domain() {
        assert_eq!(Belief::new(0.3), Ok(Belief::Known(0.3)));
        assert!(Belief::new(1.2).is_err());
        assert!(Belief::new(f64::INFINITY).is_err());
        // the sentinel is only meaningful through from_raw
        assert!(Belief::new(UNKNOWN_SENTINEL).is_err());
        assert_eq!(Belief::from_raw(UNKNOWN_SENTINEL), Ok(Belief::Unknown));
        assert!(Belief::from_raw(-0.5).is_err());
    }

    #[test]
    fn test_unknown_has_no_convincing_value() {
        assert_eq!(Belief::Unknown.convincing(), None);
        assert_eq!(Belief::Unknown.convincing_or_indifferent(), 0.0);
        let c = Belief::Known(0.9).convincing().unwrap();
        assert!((c - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_vector_from_raw() {
        let v = BeliefVector::from_raw(&[0.75, -1.0, 0.2]).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.values(), vec![Some(0.75), None, Some(0.2)]);
        assert_eq!(v.to_convincing()[0], Some(0.5));

        let err = BeliefVector::from_raw(&[0.5, 3.0]).unwrap_err();
        assert!(err.to_string().contains("belief[1]"));
    }
}
