//! Per-instrument pipeline driver: the single externally consumed operation.
//!
//! [`PipelineDriver::process_event`] looks up (or lazily creates) the
//! instrument's state triple — BBO tracker, feature engine, decision core —
//! and runs the four components in fixed order. Events for one instrument
//! must arrive in sequence; regressions and duplicates are rejected before
//! any state is touched, and a fatal book error halts the instrument
//! permanently.

use std::collections::HashMap;

use ttc_book::{BboTracker, TrackerError};
use ttc_core::config::AppConfig;
use ttc_core::types::{InstrumentId, MarketEvent, TradeSignal};
use ttc_ml::{FeatureEngine, TreeModel};

use crate::decision::DecisionCore;

/// Errors surfaced by [`PipelineDriver::process_event`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// The event's sequence is not strictly greater than the last one
    /// processed for this instrument — out-of-order or duplicate delivery,
    /// a collaborator contract violation. No state was mutated.
    #[error("stale event for {instrument}: sequence {received} <= last {last}")]
    StaleEvent {
        instrument: InstrumentId,
        received: u64,
        last: u64,
    },
    /// The book invariant was violated while applying this event. The
    /// instrument is now halted.
    #[error("book error for {instrument}: {source}")]
    Book {
        instrument: InstrumentId,
        source: TrackerError,
    },
    /// The instrument was halted by an earlier fatal error; the event was
    /// rejected.
    #[error("{0} is halted after a fatal book error")]
    Halted(InstrumentId),
}

/// State triple for one instrument, created at first event.
struct InstrumentPipeline {
    tracker: BboTracker,
    features: FeatureEngine,
    decision: DecisionCore,
    last_sequence: Option<u64>,
    halted: bool,
}

/// Sequences events through the decision path for any number of
/// instruments.
///
/// Single-threaded and synchronous: each call runs to completion before
/// the next is accepted. After an instrument's first event (which
/// allocates its state triple), processing performs no allocation.
pub struct PipelineDriver {
    model: TreeModel,
    config: AppConfig,
    pipelines: HashMap<InstrumentId, InstrumentPipeline>,
}

impl PipelineDriver {
    /// Build a driver; thresholds are fixed for its lifetime.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            model: TreeModel::from_config(&config.model),
            config: config.clone(),
            pipelines: HashMap::new(),
        }
    }

    /// Process one event for one instrument.
    ///
    /// Runs book → features → inference → decision and returns the
    /// optional trade pulse. An accepted event is always fully processed;
    /// rejected events (stale sequence, halted instrument) leave all state
    /// untouched.
    pub fn process_event(
        &mut self,
        instrument: InstrumentId,
        event: &MarketEvent,
    ) -> Result<Option<TradeSignal>, PipelineError> {
        let feature_config = &self.config.features;
        let spread_threshold = self.config.decision.spread_threshold_ticks;
        let pipeline = self.pipelines.entry(instrument).or_insert_with(|| {
            tracing::debug!(%instrument, "registering instrument pipeline");
            InstrumentPipeline {
                tracker: BboTracker::new(),
                features: FeatureEngine::new(feature_config),
                decision: DecisionCore::new(spread_threshold),
                last_sequence: None,
                halted: false,
            }
        });

        if pipeline.halted {
            return Err(PipelineError::Halted(instrument));
        }

        if let Some(last) = pipeline.last_sequence {
            if event.sequence <= last {
                tracing::warn!(
                    %instrument,
                    received = event.sequence,
                    last,
                    "rejecting out-of-order event"
                );
                return Err(PipelineError::StaleEvent {
                    instrument,
                    received: event.sequence,
                    last,
                });
            }
        }
        pipeline.last_sequence = Some(event.sequence);

        let book = match pipeline.tracker.update(event) {
            Ok(book) => *book,
            Err(source) => {
                pipeline.halted = true;
                tracing::error!(%instrument, %source, "halting instrument");
                return Err(PipelineError::Book { instrument, source });
            }
        };

        let snapshot = pipeline.features.update(event);
        let prediction = self.model.evaluate(&snapshot);
        let signal = pipeline.decision.evaluate(&book, prediction);

        if signal.is_some() {
            tracing::debug!(
                %instrument,
                sequence = event.sequence,
                imbalance_q10 = snapshot.imbalance_q10,
                trade_intensity = snapshot.trade_intensity,
                spread = ?book.spread(),
                "trade signal"
            );
        }

        Ok(signal)
    }

    /// Number of registered instruments.
    pub fn instrument_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Returns `true` if the given instrument has been halted by a fatal
    /// book error.
    pub fn is_halted(&self, instrument: InstrumentId) -> bool {
        self.pipelines
            .get(&instrument)
            .map(|p| p.halted)
            .unwrap_or(false)
    }
}
