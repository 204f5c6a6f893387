//! Core types for the ttc decision core.
//!
//! All types in this module are designed for the hot path: prices are plain
//! integer tick counts, features use Q10 fixed-point arithmetic, timestamps
//! are raw nanoseconds, and nothing here allocates.

pub mod book;
pub mod event;
pub mod feature;
pub mod signal;
pub mod timestamp;

// Re-export primary types for convenient access via `ttc_core::types::*`.
pub use book::{BookState, SideState};
pub use event::{EventKind, InstrumentId, MarketEvent, Price};
pub use feature::{FeatureSnapshot, Prediction, Q10_ONE};
pub use signal::TradeSignal;
pub use timestamp::Timestamp;
