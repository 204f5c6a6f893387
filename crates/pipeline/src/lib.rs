//! # ttc-pipeline
//!
//! The tick-to-trade decision path: per-instrument sequencing of
//! book tracking, feature extraction, inference, and the trade decision,
//! plus a sharded engine for running many instruments in parallel.
//!
//! Data flow per event, strictly in this order:
//!
//! ```text
//! MarketEvent → BboTracker → FeatureEngine → TreeModel → DecisionCore → Option<TradeSignal>
//! ```
//!
//! No component calls back into an earlier one, and one `process_event`
//! call runs to completion before the next is accepted.

pub mod decision;
pub mod driver;
pub mod shard;

pub use decision::DecisionCore;
pub use driver::{PipelineDriver, PipelineError};
pub use shard::{ShardedEngine, SignalOut};
