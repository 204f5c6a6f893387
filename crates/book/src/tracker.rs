//! BBO tracker maintaining a single resting best price per side.
//!
//! The tracker consumes bid/ask events and keeps the best bid/offer for one
//! instrument. Levels only ever improve: a lower-or-equal bid and a
//! higher-or-equal ask are ignored, and nothing is ever cancelled or
//! removed. This single top-of-book approximation is deliberate; extending
//! to multi-level books or cancellations is out of scope.
//!
//! The crossed-book invariant (`best_bid < best_ask` once both sides are
//! known) is checked after every update and surfaced as a fatal
//! [`TrackerError::CrossedBook`] — a logic defect, never a market condition
//! to recover from.

use ttc_core::types::{BookState, EventKind, MarketEvent, Price};

/// Errors that can occur while tracking the BBO.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrackerError {
    /// Best bid >= best ask after an update. Fatal: the caller must stop
    /// processing this instrument.
    #[error("crossed book: best bid {bid} >= best ask {ask}")]
    CrossedBook { bid: Price, ask: Price },
}

/// Best-bid/offer tracker for a single instrument.
///
/// Owns its [`BookState`] exclusively; the state is mutated only through
/// [`BboTracker::update`] and read through [`BboTracker::state`].
#[derive(Debug, Clone)]
pub struct BboTracker {
    state: BookState,
}

impl BboTracker {
    /// Create a tracker in the reset state (bid 0, ask at the sentinel).
    pub const fn new() -> Self {
        Self {
            state: BookState::reset(),
        }
    }

    /// Read-only view of the current BBO.
    #[inline]
    pub fn state(&self) -> &BookState {
        &self.state
    }

    /// Apply one event and return the post-update BBO.
    ///
    /// - `NewBid` with a price above the current best bid replaces it;
    ///   lower or equal bids are ignored.
    /// - `NewAsk` with a price below the current best ask replaces it;
    ///   higher or equal asks are ignored.
    /// - `Trade` never touches the BBO.
    ///
    /// Returns [`TrackerError::CrossedBook`] if the invariant
    /// `best_bid < best_ask` no longer holds after applying the event. The
    /// update is applied before the check, so the crossed state is visible
    /// to diagnostics; the tracker must not be fed further events after an
    /// error.
    pub fn update(&mut self, event: &MarketEvent) -> Result<&BookState, TrackerError> {
        match event.kind {
            EventKind::NewBid => {
                if event.price > self.state.best_bid_price {
                    self.state.best_bid_price = event.price;
                    self.state.best_bid_size = event.size;
                }
            }
            EventKind::NewAsk => {
                if event.price < self.state.best_ask_price {
                    self.state.best_ask_price = event.price;
                    self.state.best_ask_size = event.size;
                }
            }
            EventKind::Trade => {}
        }

        if self.state.is_crossed() {
            let bid = self.state.best_bid_price;
            let ask = self.state.best_ask_price;
            tracing::error!(%bid, %ask, "BBO invariant violated");
            return Err(TrackerError::CrossedBook { bid, ask });
        }

        Ok(&self.state)
    }

    /// Return to the reset state.
    pub fn reset(&mut self) {
        self.state = BookState::reset();
    }
}

impl Default for BboTracker {
    fn default() -> Self {
        Self::new()
    }
}
