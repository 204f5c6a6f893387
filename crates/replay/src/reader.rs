//! JSONL capture file reader.
//!
//! One JSON object per line, one market event per object:
//!
//! ```text
//! {"instrument_id":1,"kind":"new_bid","price":1000,"size":10,"sequence":1,"timestamp":1000000}
//! ```
//!
//! The file format belongs to this tool, not to the decision core; the core
//! owns no wire format.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ttc_core::types::{InstrumentId, MarketEvent};

/// One captured event with its instrument attribution.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReplayRecord {
    /// Instrument the event belongs to.
    pub instrument_id: InstrumentId,
    /// The event itself (kind, price, size, sequence, timestamp).
    #[serde(flatten)]
    pub event: MarketEvent,
}

/// Read an entire capture file into memory.
///
/// Blank lines are skipped; any malformed line fails the whole load with
/// its line number, since replaying a partially parsed capture would skew
/// every sequence after the gap.
pub fn read_events(path: &Path) -> Result<Vec<ReplayRecord>> {
    let file =
        File::open(path).with_context(|| format!("open capture file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(&line)
            .with_context(|| format!("parse line {} of {}", idx + 1, path.display()))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use ttc_core::types::{EventKind, Price};

    fn write_capture(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        write!(f, "{}", content).expect("write temp file");
        f
    }

    #[test]
    fn test_read_well_formed_capture() {
        let f = write_capture(concat!(
            r#"{"instrument_id":1,"kind":"new_bid","price":1000,"size":10,"sequence":1,"timestamp":1000000}"#,
            "\n",
            r#"{"instrument_id":1,"kind":"new_ask","price":1002,"size":7,"sequence":2,"timestamp":2000000}"#,
            "\n",
            r#"{"instrument_id":2,"kind":"trade","price":1001,"size":3,"sequence":1,"timestamp":2500000}"#,
            "\n",
        ));

        let records = read_events(f.path()).expect("read capture");
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].instrument_id, InstrumentId(1));
        assert_eq!(records[0].event.kind, EventKind::NewBid);
        assert_eq!(records[0].event.price, Price(1000));
        assert_eq!(records[0].event.size, 10);

        assert_eq!(records[2].instrument_id, InstrumentId(2));
        assert_eq!(records[2].event.kind, EventKind::Trade);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let f = write_capture(concat!(
            r#"{"instrument_id":1,"kind":"new_bid","price":1000,"size":10,"sequence":1,"timestamp":1000000}"#,
            "\n\n   \n",
        ));
        let records = read_events(f.path()).expect("read capture");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let f = write_capture(concat!(
            r#"{"instrument_id":1,"kind":"new_bid","price":1000,"size":10,"sequence":1,"timestamp":1000000}"#,
            "\n",
            "this is not json\n",
        ));
        let err = read_events(f.path()).unwrap_err();
        assert!(format!("{}", err).contains("line 2"));
    }

    #[test]
    fn test_missing_file_errors() {
        let err = read_events(Path::new("/nonexistent/capture.jsonl")).unwrap_err();
        assert!(format!("{}", err).contains("open capture file"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let f = write_capture(concat!(
            r#"{"instrument_id":1,"kind":"cancel","price":1000,"size":10,"sequence":1,"timestamp":1000000}"#,
            "\n",
        ));
        assert!(read_events(f.path()).is_err());
    }
}
