//! # ttc-ml
//!
//! Real-time microstructure features and the fixed-point decision-tree
//! predictor for the ttc decision core.
//!
//! Two components live here:
//! - [`FeatureEngine`]: stateful, one instance per instrument, consuming
//!   every market event and maintaining the book-imbalance and
//!   trade-intensity signals.
//! - [`TreeModel`]: stateless, mapping a feature snapshot to a binary
//!   direction prediction via a fixed two-level tree.

pub mod features;
pub mod model;

pub use features::FeatureEngine;
pub use model::TreeModel;
