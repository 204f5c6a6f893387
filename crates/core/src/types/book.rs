//! Top-of-book state: best bid and offer for a single instrument.
//!
//! [`BookState`] is a single-level approximation of the order book: one
//! resting best price per side, no depth, no cancellation. Levels only ever
//! improve (higher bid, lower ask). This is deliberate and must not be
//! "fixed" — multi-level books are out of scope.

use serde::{Deserialize, Serialize};

use super::event::Price;

/// Which sides of the book have been observed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideState {
    /// Neither side seen yet (reset state).
    Uninitialized,
    /// Only a bid has been observed.
    BidOnly,
    /// Only an ask has been observed.
    AskOnly,
    /// Both sides known; the spread is defined and the crossed-book
    /// invariant is in force.
    BothSidesKnown,
}

/// Best bid/offer for one instrument.
///
/// Invariant: once both sides are initialized, `best_bid_price <
/// best_ask_price` must hold after every update. The tracker owning this
/// state checks the invariant and fails loudly on violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookState {
    /// Highest resting bid price. `0` until a bid is seen.
    pub best_bid_price: Price,
    /// Size at the best bid.
    pub best_bid_size: u32,
    /// Lowest resting ask price. [`Price::SENTINEL_ASK`] until an ask is seen.
    pub best_ask_price: Price,
    /// Size at the best ask.
    pub best_ask_size: u32,
}

impl BookState {
    /// Reset state: bid at zero, ask at the sentinel, sizes zero.
    pub const fn reset() -> Self {
        Self {
            best_bid_price: Price::ZERO,
            best_bid_size: 0,
            best_ask_price: Price::SENTINEL_ASK,
            best_ask_size: 0,
        }
    }

    /// Which sides have been observed.
    pub fn side_state(&self) -> SideState {
        match (self.has_bid(), self.has_ask()) {
            (false, false) => SideState::Uninitialized,
            (true, false) => SideState::BidOnly,
            (false, true) => SideState::AskOnly,
            (true, true) => SideState::BothSidesKnown,
        }
    }

    /// Returns `true` if a bid has been observed.
    #[inline]
    pub fn has_bid(&self) -> bool {
        self.best_bid_price != Price::ZERO
    }

    /// Returns `true` if an ask has been observed.
    #[inline]
    pub fn has_ask(&self) -> bool {
        !self.best_ask_price.is_sentinel()
    }

    /// Returns `true` if both sides have been observed.
    #[inline]
    pub fn has_both_sides(&self) -> bool {
        self.has_bid() && self.has_ask()
    }

    /// Spread in ticks: `best_ask - best_bid`.
    ///
    /// Returns `None` while either side is still at its reset value — no
    /// spread is defined and no decision may be taken against it.
    #[inline]
    pub fn spread(&self) -> Option<i64> {
        if self.has_both_sides() {
            Some(self.best_ask_price.ticks() - self.best_bid_price.ticks())
        } else {
            None
        }
    }

    /// Returns `true` if the book is crossed (`best_bid >= best_ask` with
    /// both sides known). A crossed book is a logic defect, never a market
    /// condition.
    #[inline]
    pub fn is_crossed(&self) -> bool {
        self.has_both_sides() && self.best_bid_price >= self.best_ask_price
    }
}

impl Default for BookState {
    fn default() -> Self {
        Self::reset()
    }
}
