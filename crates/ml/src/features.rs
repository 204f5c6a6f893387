//! Rolling microstructure features: book imbalance and trade intensity.
//!
//! The engine keeps two lifetime volume accumulators and a decayed trade
//! counter, and derives a fresh [`FeatureSnapshot`] on every event. The
//! accumulate/decay discipline approximates a sliding window without
//! storing individual timestamps: O(1) state, O(1) work per event.
//!
//! The volume accumulators are never reset after startup. Over a very
//! long-running instrument they drift toward 0.5 imbalance sensitivity;
//! that staleness is a known limitation of the accumulator design, kept as
//! is rather than silently reworked into a windowed sum.

use ttc_core::config::{DecayMode, FeatureConfig};
use ttc_core::types::{EventKind, FeatureSnapshot, MarketEvent, Timestamp, Q10_ONE};

/// Decay bookkeeping for the trade-intensity counter.
#[derive(Debug, Clone)]
enum DecayClock {
    /// Decrement once every `interval` processed events of any kind.
    Events { interval: u32, ticks: u32 },
    /// Decrement once every `interval_ns` of event time.
    WallClock {
        interval_ns: u64,
        epoch: Option<Timestamp>,
    },
}

impl DecayClock {
    /// Advance the clock by one event; returns how many decay steps fired.
    fn advance(&mut self, event_time: Timestamp) -> u32 {
        match self {
            DecayClock::Events { interval, ticks } => {
                *ticks += 1;
                if *ticks == *interval {
                    *ticks = 0;
                    1
                } else {
                    0
                }
            }
            DecayClock::WallClock { interval_ns, epoch } => match epoch {
                None => {
                    *epoch = Some(event_time);
                    0
                }
                Some(start) => {
                    let elapsed = event_time.nanos_since(*start);
                    let steps = elapsed / *interval_ns;
                    if steps > 0 {
                        // Move the epoch forward by whole intervals so the
                        // remainder keeps accruing.
                        *start = Timestamp(start.0 + steps * *interval_ns);
                    }
                    steps.min(u32::MAX as u64) as u32
                }
            },
        }
    }
}

/// Per-instrument feature engine.
///
/// Owns its state exclusively; mutated only through
/// [`FeatureEngine::update`].
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    /// Lifetime sum of bid sizes. Monotonically non-decreasing.
    total_bid_volume: u64,
    /// Lifetime sum of ask sizes. Monotonically non-decreasing.
    total_ask_volume: u64,
    /// Decayed trade count, saturating at 255.
    trade_count_window: u8,
    decay: DecayClock,
}

impl FeatureEngine {
    /// Build an engine from the feature configuration.
    pub fn new(config: &FeatureConfig) -> Self {
        let decay = match config.decay_mode {
            DecayMode::Events => DecayClock::Events {
                interval: config.decay_interval_events,
                ticks: 0,
            },
            DecayMode::WallClock => DecayClock::WallClock {
                interval_ns: config.decay_interval_ns,
                epoch: None,
            },
        };
        Self {
            total_bid_volume: 0,
            total_ask_volume: 0,
            trade_count_window: 0,
            decay,
        }
    }

    /// Convenience constructor for event-count decay.
    pub fn with_event_decay(interval_events: u32) -> Self {
        Self::new(&FeatureConfig {
            decay_mode: DecayMode::Events,
            decay_interval_events: interval_events,
            ..FeatureConfig::default()
        })
    }

    /// Consume one event and return the freshly derived snapshot.
    ///
    /// Ordering within a single call matters and matches the verified
    /// behavior: the trade-count increment applies first, the decay step
    /// second, so an event that both records a trade and crosses a decay
    /// boundary nets to no change.
    pub fn update(&mut self, event: &MarketEvent) -> FeatureSnapshot {
        match event.kind {
            EventKind::NewBid => {
                self.total_bid_volume = self.total_bid_volume.saturating_add(u64::from(event.size));
            }
            EventKind::NewAsk => {
                self.total_ask_volume = self.total_ask_volume.saturating_add(u64::from(event.size));
            }
            EventKind::Trade => {
                self.trade_count_window = self.trade_count_window.saturating_add(1);
            }
        }

        let steps = self.decay.advance(event.timestamp);
        if steps > 0 {
            self.trade_count_window = self
                .trade_count_window
                .saturating_sub(steps.min(u32::from(u8::MAX)) as u8);
        }

        self.snapshot()
    }

    /// Derive the current snapshot without consuming an event.
    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot {
            imbalance_q10: self.imbalance_q10(),
            trade_intensity: self.trade_count_window,
        }
    }

    /// Book imbalance as a Q10 fraction:
    /// `floor(bid_volume * 1024 / (bid_volume + ask_volume))`.
    ///
    /// Defined as 0 when no volume has been observed. The u128 intermediate
    /// keeps the division exact over the full u64 accumulator range.
    fn imbalance_q10(&self) -> u16 {
        let bid = u128::from(self.total_bid_volume);
        let ask = u128::from(self.total_ask_volume);
        let total = bid + ask;
        if total == 0 {
            return 0;
        }
        (bid * u128::from(Q10_ONE) / total) as u16
    }

    /// Current lifetime bid volume.
    pub fn total_bid_volume(&self) -> u64 {
        self.total_bid_volume
    }

    /// Current lifetime ask volume.
    pub fn total_ask_volume(&self) -> u64 {
        self.total_ask_volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttc_core::config::FeatureConfig;

    fn bid(size: u32, seq: u64) -> MarketEvent {
        MarketEvent::new(EventKind::NewBid, 1000, size, seq, Timestamp(seq * 100))
    }

    fn ask(size: u32, seq: u64) -> MarketEvent {
        MarketEvent::new(EventKind::NewAsk, 1002, size, seq, Timestamp(seq * 100))
    }

    fn trade_at(seq: u64, ts: u64) -> MarketEvent {
        MarketEvent::new(EventKind::Trade, 1001, 1, seq, Timestamp(ts))
    }

    fn trade(seq: u64) -> MarketEvent {
        trade_at(seq, seq * 100)
    }

    #[test]
    fn test_zero_volume_imbalance_is_zero() {
        let engine = FeatureEngine::with_event_decay(1000);
        assert_eq!(engine.snapshot().imbalance_q10, 0);
    }

    #[test]
    fn test_imbalance_round_trip() {
        // 800 bid vs 200 ask: floor(800 * 1024 / 1000) == 819.
        let mut engine = FeatureEngine::with_event_decay(1000);
        engine.update(&bid(800, 1));
        let snap = engine.update(&ask(200, 2));
        assert_eq!(snap.imbalance_q10, 819);
    }

    #[test]
    fn test_imbalance_bounds() {
        let mut engine = FeatureEngine::with_event_decay(1000);
        let snap = engine.update(&bid(500, 1));
        assert_eq!(snap.imbalance_q10, Q10_ONE); // all bid

        let mut engine = FeatureEngine::with_event_decay(1000);
        let snap = engine.update(&ask(500, 1));
        assert_eq!(snap.imbalance_q10, 0); // all ask
    }

    #[test]
    fn test_trade_does_not_move_volumes() {
        let mut engine = FeatureEngine::with_event_decay(1000);
        engine.update(&bid(10, 1));
        engine.update(&trade(2));
        assert_eq!(engine.total_bid_volume(), 10);
        assert_eq!(engine.total_ask_volume(), 0);
    }

    #[test]
    fn test_intensity_counts_trades() {
        let mut engine = FeatureEngine::with_event_decay(1000);
        for seq in 1..=5 {
            engine.update(&trade(seq));
        }
        assert_eq!(engine.snapshot().trade_intensity, 5);
    }

    #[test]
    fn test_intensity_saturates_at_255() {
        let mut engine = FeatureEngine::with_event_decay(100_000);
        for seq in 1..=300 {
            engine.update(&trade(seq));
        }
        assert_eq!(engine.snapshot().trade_intensity, 255);
    }

    #[test]
    fn test_event_count_decay() {
        let mut engine = FeatureEngine::with_event_decay(10);
        engine.update(&trade(1));
        assert_eq!(engine.snapshot().trade_intensity, 1);

        // Events 2..=10 complete the first decay interval of 10 events.
        for seq in 2..=10 {
            engine.update(&bid(1, seq));
        }
        assert_eq!(engine.snapshot().trade_intensity, 0);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut engine = FeatureEngine::with_event_decay(2);
        for seq in 1..=20 {
            engine.update(&bid(1, seq));
        }
        assert_eq!(engine.snapshot().trade_intensity, 0);
    }

    #[test]
    fn test_increment_then_decay_same_event() {
        // The 10th event is itself a trade: increment applies before decay,
        // so the two cancel out.
        let mut engine = FeatureEngine::with_event_decay(10);
        engine.update(&trade(1));
        for seq in 2..=9 {
            engine.update(&bid(1, seq));
        }
        let snap = engine.update(&trade(10));
        assert_eq!(snap.trade_intensity, 1);
    }

    #[test]
    fn test_wall_clock_decay() {
        let config = FeatureConfig {
            decay_mode: ttc_core::config::DecayMode::WallClock,
            decay_interval_ns: 10_000,
            ..FeatureConfig::default()
        };
        let mut engine = FeatureEngine::new(&config);

        // First event establishes the epoch.
        engine.update(&trade_at(1, 0));
        engine.update(&trade_at(2, 1_000));
        assert_eq!(engine.snapshot().trade_intensity, 2);

        // 9 µs later: still inside the first interval.
        engine.update(&trade_at(3, 9_000));
        assert_eq!(engine.snapshot().trade_intensity, 3);

        // Crossing 10 µs from the epoch fires one decay.
        engine.update(&bid(1, 4).with_time(11_000));
        assert_eq!(engine.snapshot().trade_intensity, 2);
    }

    #[test]
    fn test_wall_clock_decay_multiple_intervals() {
        let config = FeatureConfig {
            decay_mode: ttc_core::config::DecayMode::WallClock,
            decay_interval_ns: 10_000,
            ..FeatureConfig::default()
        };
        let mut engine = FeatureEngine::new(&config);

        engine.update(&trade_at(1, 0));
        for seq in 2..=6 {
            engine.update(&trade_at(seq, 100));
        }
        assert_eq!(engine.snapshot().trade_intensity, 6);

        // A 35 µs gap covers three whole intervals.
        engine.update(&bid(1, 7).with_time(35_000));
        assert_eq!(engine.snapshot().trade_intensity, 3);
    }

    trait WithTime {
        fn with_time(self, ns: u64) -> MarketEvent;
    }

    impl WithTime for MarketEvent {
        fn with_time(mut self, ns: u64) -> MarketEvent {
            self.timestamp = Timestamp(ns);
            self
        }
    }

    // ── Property tests ─────────────────────────────────────────────

    use proptest::prelude::*;

    proptest! {
        // Imbalance stays inside [0, 1024] and intensity inside [0, 255]
        // for arbitrary event mixes.
        #[test]
        fn snapshot_values_stay_in_range(
            sizes in proptest::collection::vec((0u8..3, 1u32..1_000_000), 1..300),
        ) {
            let mut engine = FeatureEngine::with_event_decay(7);
            for (i, (kind, size)) in sizes.iter().enumerate() {
                let kind = match *kind {
                    0 => EventKind::NewBid,
                    1 => EventKind::NewAsk,
                    _ => EventKind::Trade,
                };
                let event = MarketEvent::new(kind, 1000, *size, i as u64, Timestamp(i as u64));
                let snap = engine.update(&event);
                prop_assert!(snap.imbalance_q10 <= Q10_ONE);
            }
        }

        // Volumes never decrease.
        #[test]
        fn volumes_are_monotone(
            sizes in proptest::collection::vec(1u32..1_000_000, 1..100),
        ) {
            let mut engine = FeatureEngine::with_event_decay(1000);
            let mut prev = 0u64;
            for (i, size) in sizes.iter().enumerate() {
                engine.update(&bid(*size, i as u64));
                prop_assert!(engine.total_bid_volume() >= prev);
                prev = engine.total_bid_volume();
            }
        }
    }
}
