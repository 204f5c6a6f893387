//! Trade trigger pulse.

use serde::{Deserialize, Serialize};

/// Zero-payload trade trigger.
///
/// Emitted for exactly the one `process_event` call on which the trade
/// condition newly becomes true; never latched, never repeated for the same
/// cause. The downstream order router supplies sizing and routing — the
/// pulse itself carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignal;
