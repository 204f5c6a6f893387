//! # ttc-book
//!
//! Single-level best-bid/offer tracking for the ttc decision core.

pub mod tracker;

pub use tracker::{BboTracker, TrackerError};
