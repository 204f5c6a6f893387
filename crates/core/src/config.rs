//! Layered configuration for the ttc decision core.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (the model thresholds the training pipeline
//!    shipped with the reference tree)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `TTC_`, nested with `__`,
//!    e.g. `TTC_MODEL__INTENSITY_THRESHOLD=30`)
//!
//! Thresholds are fixed for the lifetime of a pipeline: there is no
//! hot-reload mid-stream. Changing them means restarting the pipeline for
//! the affected instruments.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::types::Q10_ONE;

// ── Default value functions ────────────────────────────────────────────

/// Default imbalance threshold: 614 (0.60 in Q10 fixed point).
fn default_imbalance_threshold_q10() -> u16 {
    614
}

/// Default trade intensity threshold: 25.
fn default_intensity_threshold() -> u8 {
    25
}

/// Default spread threshold: 5 ticks.
fn default_spread_threshold_ticks() -> i64 {
    5
}

/// Default decay interval: 1 000 processed events.
fn default_decay_interval_events() -> u32 {
    1_000
}

/// Default wall-clock decay interval: 10 000 ns (10 µs).
fn default_decay_interval_ns() -> u64 {
    10_000
}

/// Default shard count: 4 worker threads.
fn default_shards() -> usize {
    4
}

/// Default per-shard event queue capacity: 4 096.
fn default_queue_capacity() -> usize {
    4_096
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Decision-tree model thresholds.
    #[serde(default)]
    pub model: ModelConfig,
    /// Trade decision parameters.
    #[serde(default)]
    pub decision: DecisionConfig,
    /// Feature engine parameters.
    #[serde(default)]
    pub features: FeatureConfig,
    /// Sharded engine parameters.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Decision-tree thresholds, supplied by the external training pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Book imbalance threshold as a Q10 fraction (614 = 0.60).
    #[serde(default = "default_imbalance_threshold_q10")]
    pub imbalance_threshold_q10: u16,
    /// Trade intensity threshold.
    #[serde(default = "default_intensity_threshold")]
    pub intensity_threshold: u8,
}

/// Trade decision parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionConfig {
    /// Minimum spread, in ticks, that must be exceeded to trade.
    #[serde(default = "default_spread_threshold_ticks")]
    pub spread_threshold_ticks: i64,
}

/// How the trade-intensity counter decays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayMode {
    /// Decay by 1 every `decay_interval_events` processed events. Literal
    /// translation of the source's cycle counter (the event is the tick).
    Events,
    /// Decay by 1 every `decay_interval_ns` of event time, independent of
    /// event rate. Preserves the intended ~10 µs sliding window.
    WallClock,
}

/// Feature engine parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    /// Decay discipline for the trade-intensity counter.
    #[serde(default = "FeatureConfig::default_decay_mode")]
    pub decay_mode: DecayMode,
    /// Events per decay step (used when `decay_mode = "events"`).
    #[serde(default = "default_decay_interval_events")]
    pub decay_interval_events: u32,
    /// Nanoseconds of event time per decay step (used when
    /// `decay_mode = "wall_clock"`).
    #[serde(default = "default_decay_interval_ns")]
    pub decay_interval_ns: u64,
}

impl FeatureConfig {
    fn default_decay_mode() -> DecayMode {
        DecayMode::Events
    }
}

/// Sharded engine parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Number of worker threads. Instruments are assigned by
    /// `instrument_id % shards`, so events for one instrument always land
    /// on the same worker.
    #[serde(default = "default_shards")]
    pub shards: usize,
    /// Bounded capacity of each worker's input queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            imbalance_threshold_q10: default_imbalance_threshold_q10(),
            intensity_threshold: default_intensity_threshold(),
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            spread_threshold_ticks: default_spread_threshold_ticks(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            decay_mode: DecayMode::Events,
            decay_interval_events: default_decay_interval_events(),
            decay_interval_ns: default_decay_interval_ns(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shards: default_shards(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `TTC_` and `__` as the
    ///    nesting separator (e.g. `TTC_DECISION__SPREAD_THRESHOLD_TICKS=8`).
    ///
    /// After loading, validates threshold ranges.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("model.imbalance_threshold_q10", 614i64)?
            .set_default("model.intensity_threshold", 25i64)?
            .set_default("decision.spread_threshold_ticks", 5i64)?
            .set_default("features.decay_mode", "events")?
            .set_default("features.decay_interval_events", 1000i64)?
            .set_default("features.decay_interval_ns", 10_000i64)?
            .set_default("engine.shards", 4i64)?
            .set_default("engine.queue_capacity", 4096i64)?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (TTC_ prefix) ───────────────
        // The prefix separator must be set explicitly to `_` because the
        // `config` crate defaults it to the nesting separator when one is
        // provided; otherwise `TTC_MODEL__INTENSITY_THRESHOLD` would be
        // matched against prefix `ttc__`.
        builder = builder.add_source(
            Environment::with_prefix("TTC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.model.imbalance_threshold_q10 > Q10_ONE {
            bail!(
                "model.imbalance_threshold_q10 must be <= {} (Q10), got {}",
                Q10_ONE,
                self.model.imbalance_threshold_q10
            );
        }
        if self.decision.spread_threshold_ticks < 0 {
            bail!(
                "decision.spread_threshold_ticks must be non-negative, got {}",
                self.decision.spread_threshold_ticks
            );
        }
        if self.features.decay_interval_events == 0 {
            bail!("features.decay_interval_events must be positive");
        }
        if self.features.decay_interval_ns == 0 {
            bail!("features.decay_interval_ns must be positive");
        }
        if self.engine.shards == 0 {
            bail!("engine.shards must be at least 1");
        }
        if self.engine.queue_capacity == 0 {
            bail!("engine.queue_capacity must be at least 1");
        }
        Ok(())
    }
}
