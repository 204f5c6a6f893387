//! Feature snapshot and prediction types.
//!
//! The two microstructure features are fixed-point by construction: book
//! imbalance is a Q10 fraction (0..=1024, where 1024 represents 1.0) and
//! trade intensity is a saturating 8-bit decayed count. No floats exist on
//! the inference path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Q10 fixed-point representation of 1.0.
pub const Q10_ONE: u16 = 1024;

/// Derived feature values, recomputed on every event.
///
/// Not persisted beyond the current evaluation; the engine's internal
/// accumulators are the durable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Book imbalance: `bid_volume / (bid_volume + ask_volume)` as a Q10
    /// fraction in `[0, 1024]`. Defined as 0 when total volume is zero.
    pub imbalance_q10: u16,
    /// Decayed count of recent trade events, in `[0, 255]`.
    pub trade_intensity: u8,
}

impl FeatureSnapshot {
    /// Imbalance as a plain fraction. For logging and display only, not for
    /// the decision path.
    pub fn imbalance_fraction(&self) -> f64 {
        f64::from(self.imbalance_q10) / f64::from(Q10_ONE)
    }
}

/// Binary direction prediction produced by the inference engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    /// Model expects the mid to move up.
    Up,
    /// No upward move expected.
    NotUp,
}

impl Prediction {
    /// Returns `true` for [`Prediction::Up`].
    #[inline]
    pub const fn is_up(&self) -> bool {
        matches!(self, Prediction::Up)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Up => write!(f, "UP"),
            Prediction::NotUp => write!(f, "NOT_UP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imbalance_fraction() {
        let snap = FeatureSnapshot {
            imbalance_q10: 512,
            trade_intensity: 0,
        };
        assert!((snap.imbalance_fraction() - 0.5).abs() < 1e-12);

        let full = FeatureSnapshot {
            imbalance_q10: Q10_ONE,
            trade_intensity: 0,
        };
        assert_eq!(full.imbalance_fraction(), 1.0);
    }

    #[test]
    fn test_prediction_is_up() {
        assert!(Prediction::Up.is_up());
        assert!(!Prediction::NotUp.is_up());
    }

    #[test]
    fn test_prediction_display() {
        assert_eq!(format!("{}", Prediction::Up), "UP");
        assert_eq!(format!("{}", Prediction::NotUp), "NOT_UP");
    }
}
