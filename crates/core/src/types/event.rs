//! Market event model: the single input type of the decision core.
//!
//! One [`MarketEvent`] arrives per market occurrence (new bid, new ask,
//! trade). Arrival order per instrument is significant and is the sole
//! source of correctness for the BBO and decay logic downstream, so every
//! event carries the per-instrument `sequence` assigned by the ingest layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp::Timestamp;

/// Price in integer tick units.
///
/// A tick is the smallest price increment of the instrument's price
/// representation; no fractional prices exist inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub i64);

impl Price {
    /// Sentinel ask price meaning "no ask observed yet".
    ///
    /// Chosen so that any real ask compares below it and the first
    /// `NewAsk` always improves the book.
    pub const SENTINEL_ASK: Price = Price(i64::MAX);

    /// Zero price — the reset value for the bid side.
    pub const ZERO: Price = Price(0);

    /// Raw tick count.
    #[inline]
    pub const fn ticks(&self) -> i64 {
        self.0
    }

    /// Returns `true` if this is the "no ask yet" sentinel.
    #[inline]
    pub const fn is_sentinel(&self) -> bool {
        self.0 == i64::MAX
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "∅")
        } else {
            write!(f, "{}t", self.0)
        }
    }
}

/// Tradable instrument identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub u32);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INST-{}", self.0)
    }
}

/// Kind of market occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new resting bid at `price` for `size`.
    NewBid,
    /// A new resting ask at `price` for `size`.
    NewAsk,
    /// An executed trade. Observed only by the feature engine; the BBO
    /// tracker ignores it.
    Trade,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::NewBid => write!(f, "NewBid"),
            EventKind::NewAsk => write!(f, "NewAsk"),
            EventKind::Trade => write!(f, "Trade"),
        }
    }
}

/// A single market event. Immutable once constructed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketEvent {
    /// What happened.
    pub kind: EventKind,
    /// Price in tick units.
    pub price: Price,
    /// Size at that price (shares/contracts).
    pub size: u32,
    /// Per-instrument arrival sequence, strictly increasing. Assigned by
    /// the ingest layer; the pipeline rejects regressions and duplicates.
    pub sequence: u64,
    /// Capture timestamp (nanoseconds). Drives wall-clock feature decay
    /// and paced replay.
    pub timestamp: Timestamp,
}

impl MarketEvent {
    /// Convenience constructor used heavily in tests and replay.
    pub const fn new(
        kind: EventKind,
        price: i64,
        size: u32,
        sequence: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind,
            price: Price(price),
            size,
            sequence,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_sentinel() {
        assert!(Price::SENTINEL_ASK.is_sentinel());
        assert!(!Price(1_000).is_sentinel());
        assert!(Price(999) < Price::SENTINEL_ASK);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(format!("{}", Price(1002)), "1002t");
        assert_eq!(format!("{}", Price::SENTINEL_ASK), "∅");
    }

    #[test]
    fn test_instrument_display() {
        assert_eq!(format!("{}", InstrumentId(7)), "INST-7");
    }

    #[test]
    fn test_event_kind_serde_names() {
        let json = serde_json::to_string(&EventKind::NewBid).unwrap();
        assert_eq!(json, "\"new_bid\"");
        let kind: EventKind = serde_json::from_str("\"trade\"").unwrap();
        assert_eq!(kind, EventKind::Trade);
    }

    #[test]
    fn test_event_round_trip() {
        let event = MarketEvent::new(EventKind::NewAsk, 1002, 10, 42, Timestamp(1_000));
        let json = serde_json::to_string(&event).unwrap();
        let back: MarketEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, EventKind::NewAsk);
        assert_eq!(back.price, Price(1002));
        assert_eq!(back.size, 10);
        assert_eq!(back.sequence, 42);
    }
}
