//! Trade decision: spread gate plus the one-tick-delayed prediction.
//!
//! The prediction consulted on each call is the one produced on the
//! *previous* call, held in an explicit cell — the software rendering of a
//! register delay. The new prediction is stored after the decision, for use
//! on the next call.
//!
//! Emission is pulse (edge) semantics, not level: the trade condition is
//! recomputed every call, and a [`TradeSignal`] fires only when it
//! transitions from false to true. A condition that stays true emits
//! nothing further until it has first gone false again.

use ttc_core::types::{BookState, Prediction, TradeSignal};

/// Per-instrument trade decision state.
#[derive(Debug, Clone)]
pub struct DecisionCore {
    /// Minimum spread in ticks; must be exceeded strictly.
    spread_threshold_ticks: i64,
    /// Prediction produced on the previous call.
    previous_prediction: Prediction,
    /// Whether the trade condition held on the previous call.
    condition_held: bool,
}

impl DecisionCore {
    /// Create a decision core with the given spread threshold.
    ///
    /// Starts with a `NotUp` previous prediction, so the first call can
    /// never trade regardless of the book.
    pub const fn new(spread_threshold_ticks: i64) -> Self {
        Self {
            spread_threshold_ticks,
            previous_prediction: Prediction::NotUp,
            condition_held: false,
        }
    }

    /// Evaluate the trade condition against the current book and store
    /// `prediction` for the next call.
    ///
    /// The condition is
    /// `spread > threshold && previous_prediction == UP`; it is skipped
    /// entirely (treated as false) while either book side is still at its
    /// reset value. Returns a signal only on a false→true transition of
    /// the condition.
    pub fn evaluate(&mut self, book: &BookState, prediction: Prediction) -> Option<TradeSignal> {
        let condition = match book.spread() {
            Some(spread) => {
                spread > self.spread_threshold_ticks && self.previous_prediction.is_up()
            }
            // One side still at sentinel/reset: no signal possible.
            None => false,
        };

        let fire = condition && !self.condition_held;
        self.condition_held = condition;
        self.previous_prediction = prediction;

        if fire {
            Some(TradeSignal)
        } else {
            None
        }
    }

    /// The prediction that will gate the next call.
    pub fn previous_prediction(&self) -> Prediction {
        self.previous_prediction
    }
}
