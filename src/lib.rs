//! # Gridiron
//!
//! A **high-throughput delimited-text parsing engine** for Rust. Gridiron
//! turns raw byte buffers of delimiter-separated text into typed,
//! columnar Arrow record batches, using wide hardware vector operations
//! to scan for structural bytes faster than a byte-at-a-time scanner.
//!
//! ## Key Features
//!
//! - **Vectorized tokenization** - comma-delimited lines are scanned in
//!   32-byte AVX2 lanes, with a byte-wise scalar path taking over the
//!   moment a quote byte appears
//! - **Sample-based schema inference** - column types (`Int64`,
//!   `Float64`, `Utf8`) are inferred from the header plus up to 100 data
//!   rows with a conservative one-way promotion heuristic
//! - **Null-on-failure columns** - empty or malformed numeric values
//!   become nulls instead of aborting the parse
//! - **Batched, parallel column builds** - rows are grouped into record
//!   batches and built on a work-stealing pool (feature `parallel`, on
//!   by default), then concatenated in deterministic input order
//! - **Per-call statistics** - row/byte counts, ragged-row count, elapsed
//!   time and derived throughput returned with every parse
//!
//! ## Quick Start
//!
//! ```ignore
//! use gridiron::{parse_bytes, ParseOptions};
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let data = b"symbol,price,size\nES,4500.25,100\nNQ,15800.50,25\n";
//! let parsed = parse_bytes(data, &ParseOptions::default())?;
//!
//! assert_eq!(parsed.table.num_rows(), 2);
//! println!("{} MiB/s", parsed.stats.throughput_mbps);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Model
//!
//! Only structural problems fail a call: an unreadable file
//! ([`ParseError::Io`]), or an input with no rows to infer a schema from
//! ([`ParseError::EmptySample`]). Everything value-level is absorbed:
//! unparsable numerics become nulls, and malformed quoting degrades to
//! "rest of line quoted" rather than erroring.
//!
//! ## Feature Flags
//!
//! - `parallel` *(default)* - build record batches and columns on the
//!   rayon pool; disabling it yields a sequential engine with identical
//!   results
//!
//! ## Module Overview
//!
//! - [`tokenizer`] - quote-aware line splitting (accelerated + scalar)
//! - [`schema`] - sample-based column type inference
//! - [`columns`] - typed Arrow column construction with null handling
//! - [`engine`] - end-to-end orchestration, batching and statistics
//! - [`io`] - the single file-reading collaborator
//! - [`stats`] - per-call parse statistics
//! - [`error`] - structural failure taxonomy

pub mod columns;
pub mod engine;
pub mod error;
pub mod io;
pub mod schema;
pub mod stats;
pub mod tokenizer;

// General re-exports
pub use columns::build_column;
pub use engine::{DEFAULT_BATCH_SIZE, ParseOptions, ParsedTable, parse_bytes};
pub use error::{ParseError, Result};
pub use io::parse_file;
pub use schema::{ColumnType, SCHEMA_SAMPLE_ROWS, infer_schema};
pub use stats::ParseStats;
pub use tokenizer::{LANE_WIDTH, tokenize_line, tokenize_line_scalar};
