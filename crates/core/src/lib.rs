//! # ttc-core
//!
//! Shared types, configuration, and logging for the ttc tick-to-trade
//! decision core.
//!
//! This crate provides the foundational building blocks used across all other
//! crates in the workspace: the market event model, tick-denominated prices,
//! top-of-book state, feature snapshots, nanosecond timestamps, the layered
//! configuration loader, and tracing initialization.

pub mod config;
pub mod logging;
pub mod types;
