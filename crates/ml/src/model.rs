//! Fixed two-level decision tree over the feature snapshot.
//!
//! The tree is the deployed artifact of the external training pipeline:
//! two integer thresholds, no weights, no runtime state. Inference is a
//! pure function of the snapshot and compiles down to two compares.
//!
//! ```text
//! if imbalance_q10 > imbalance_threshold_q10:   # 614 = 0.60 in Q10
//!     if trade_intensity > intensity_threshold: # 25
//!         UP
//!     else:
//!         NOT_UP
//! else:
//!     NOT_UP
//! ```

use ttc_core::config::ModelConfig;
use ttc_core::types::{FeatureSnapshot, Prediction};

/// Two-level decision tree with fixed-point thresholds.
///
/// Thresholds are set at construction and never change for the lifetime of
/// the pipeline; retuning requires a restart, mirroring compile-time
/// constant semantics.
#[derive(Debug, Clone, Copy)]
pub struct TreeModel {
    imbalance_threshold_q10: u16,
    intensity_threshold: u8,
}

impl TreeModel {
    /// Build a model from explicit thresholds.
    pub const fn new(imbalance_threshold_q10: u16, intensity_threshold: u8) -> Self {
        Self {
            imbalance_threshold_q10,
            intensity_threshold,
        }
    }

    /// Build a model from configuration.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.imbalance_threshold_q10, config.intensity_threshold)
    }

    /// Evaluate the tree. Pure; both thresholds are strict.
    #[inline]
    pub fn evaluate(&self, snapshot: &FeatureSnapshot) -> Prediction {
        if snapshot.imbalance_q10 > self.imbalance_threshold_q10
            && snapshot.trade_intensity > self.intensity_threshold
        {
            Prediction::Up
        } else {
            Prediction::NotUp
        }
    }
}

impl Default for TreeModel {
    /// The reference thresholds: imbalance 614 (0.60), intensity 25.
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}
