//! Per-call parse statistics.
//!
//! A [`ParseStats`] value is produced once per parse call and returned
//! alongside the table. It is never stored on shared engine state, so
//! overlapping calls cannot race on it.

use std::time::Duration;

use serde::Serialize;

/// Throughput and volume statistics for one parse call.
#[derive(Debug, Clone, Serialize)]
pub struct ParseStats {
    /// Number of data rows in the resulting table.
    pub rows_processed: u64,
    /// Exact length in bytes of the input buffer.
    pub bytes_processed: u64,
    /// Data rows whose field count differed from the header width.
    pub ragged_rows: u64,
    /// Wall-clock time for the whole call.
    pub parse_time: Duration,
    /// Derived throughput in MiB per second (0 when the elapsed time is
    /// too small to measure).
    pub throughput_mbps: f64,
}

impl ParseStats {
    pub(crate) fn from_run(
        rows_processed: u64,
        bytes_processed: u64,
        ragged_rows: u64,
        parse_time: Duration,
    ) -> Self {
        let secs = parse_time.as_secs_f64();
        let throughput_mbps = if secs > 0.0 {
            (bytes_processed as f64 / (1024.0 * 1024.0)) / secs
        } else {
            0.0
        };
        Self {
            rows_processed,
            bytes_processed,
            ragged_rows,
            parse_time,
            throughput_mbps,
        }
    }

    /// Snapshot as a JSON value, for logging or persisting alongside
    /// load results.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "rows_processed": self.rows_processed,
            "bytes_processed": self.bytes_processed,
            "ragged_rows": self.ragged_rows,
            "parse_time_ms": self.parse_time.as_secs_f64() * 1000.0,
            "throughput_mbps": self.throughput_mbps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_derivation() {
        let stats = ParseStats::from_run(10, 2 * 1024 * 1024, 0, Duration::from_secs(1));
        assert_eq!(stats.throughput_mbps, 2.0);
    }

    #[test]
    fn zero_elapsed_time_yields_zero_throughput() {
        let stats = ParseStats::from_run(0, 100, 0, Duration::ZERO);
        assert_eq!(stats.throughput_mbps, 0.0);
    }

    #[test]
    fn json_snapshot_has_all_fields() {
        let stats = ParseStats::from_run(3, 42, 1, Duration::from_millis(5));
        let json = stats.to_json();
        assert_eq!(json["rows_processed"], 3);
        assert_eq!(json["bytes_processed"], 42);
        assert_eq!(json["ragged_rows"], 1);
        assert!(json["parse_time_ms"].as_f64().unwrap() >= 0.0);
    }
}
