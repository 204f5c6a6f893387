//! ttc market replay.
//!
//! Feeds a historical JSONL capture through the sharded decision engine,
//! either full-speed or paced to the recorded inter-event gaps, and reports
//! every trade pulse the core would have fired against that tape.

mod reader;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Parser;

use ttc_core::config::AppConfig;
use ttc_pipeline::ShardedEngine;

/// ttc market replay tool
#[derive(Parser, Debug)]
#[command(name = "ttc-replay", about = "replay a market capture through the decision core")]
struct Args {
    /// Path to the JSONL capture file.
    events: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pace the replay to the capture's own inter-event gaps instead of
    /// running full speed.
    #[arg(long)]
    pace: bool,

    /// Human-readable log output instead of JSON.
    #[arg(long)]
    pretty_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config)?;

    ttc_core::logging::init_tracing(!args.pretty_logs);

    let records = reader::read_events(&args.events)?;
    if records.is_empty() {
        bail!("capture file {} contains no events", args.events.display());
    }

    tracing::info!(
        events = records.len(),
        shards = config.engine.shards,
        pace = args.pace,
        "starting replay"
    );

    let engine = ShardedEngine::new(&config);

    let started = Instant::now();
    let first_ts = records[0].event.timestamp;

    for record in &records {
        if args.pace {
            // Sleep until this event's offset from the first event has
            // elapsed in real time.
            let offset = Duration::from_nanos(record.event.timestamp.nanos_since(first_ts));
            let elapsed = started.elapsed();
            if offset > elapsed {
                std::thread::sleep(offset - elapsed);
            }
        }

        if !engine.dispatch(record.instrument_id, record.event) {
            bail!("engine shut down mid-replay");
        }
    }

    let dispatched_in = started.elapsed();
    let signal_rx = engine.shutdown();

    let mut signals = 0usize;
    for out in signal_rx.iter() {
        signals += 1;
        tracing::info!(
            instrument = %out.instrument,
            sequence = out.sequence,
            event_time = %out.timestamp,
            "trade signal"
        );
    }

    let events_per_sec = records.len() as f64 / dispatched_in.as_secs_f64().max(1e-9);
    tracing::info!(
        events = records.len(),
        signals,
        elapsed_ms = dispatched_in.as_millis() as u64,
        events_per_sec = events_per_sec as u64,
        "replay complete"
    );

    Ok(())
}
