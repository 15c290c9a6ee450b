//! End-to-end parse orchestration.
//!
//! [`parse_bytes`] drives the full pipeline over one buffer:
//! buffer → lines → tokens → inferred schema → typed columns → table.
//! Data rows are grouped into record batches of at most
//! [`ParseOptions::batch_size`] rows; batches and the columns within a
//! batch are built on the rayon pool when the `parallel` feature is
//! enabled (the default), and the per-batch results are concatenated in
//! input order, so thread scheduling never affects the output.
//!
//! Ragged rows are tolerated rather than rejected: missing trailing
//! fields are treated as empty tokens (null in numeric columns, empty
//! text otherwise), extra fields are dropped, and the number of affected
//! rows is reported in [`ParseStats::ragged_rows`].

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::columns::build_column;
use crate::error::{ParseError, Result};
use crate::schema::{SCHEMA_SAMPLE_ROWS, infer_schema};
use crate::stats::ParseStats;
use crate::tokenizer::tokenize_line;

/// Default number of rows grouped into one record batch.
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Per-call parse configuration. There is no global engine state.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Upper bound on rows per record batch. A hint: it affects
    /// allocation granularity and parallel split, never the result.
    pub batch_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Result of one parse call: the assembled table and its statistics.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// All data rows as one record batch of named, typed, nullable
    /// columns of equal length.
    pub table: RecordBatch,
    /// Statistics for this call.
    pub stats: ParseStats,
}

/// Parse a delimited-text buffer into a typed columnar table.
///
/// The first line is the header; column types are inferred from up to
/// [`SCHEMA_SAMPLE_ROWS`] data lines and never revised afterwards;
/// later values that contradict the inferred type become nulls. The
/// buffer is decoded leniently (invalid UTF-8 is replaced), and both
/// `\n` and `\r\n` line endings are accepted.
///
/// # Errors
/// Returns [`ParseError::EmptySample`] for an input with no lines, or
/// [`ParseError::Arrow`] if column assembly breaks the equal-length
/// invariant. Bad values never error; they become nulls.
pub fn parse_bytes(data: &[u8], options: &ParseOptions) -> Result<ParsedTable> {
    let started = Instant::now();

    let text = String::from_utf8_lossy(data);
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Err(ParseError::EmptySample);
    }

    let rows = tokenize_rows(&lines, options.delimiter);
    let sample_end = rows.len().min(1 + SCHEMA_SAMPLE_ROWS);
    let schema: SchemaRef = Arc::new(infer_schema(&rows[..sample_end])?);

    let data_rows = &rows[1..];
    let batch_size = effective_batch_size(options.batch_size, data_rows.len());
    let built = build_batches(data_rows, &schema, batch_size)?;

    let mut ragged_rows = 0u64;
    let mut batches = Vec::with_capacity(built.len());
    for (batch, ragged) in built {
        ragged_rows += ragged;
        batches.push(batch);
    }
    let table = if batches.is_empty() {
        RecordBatch::new_empty(schema.clone())
    } else {
        concat_batches(&schema, &batches)?
    };

    let stats = ParseStats::from_run(
        table.num_rows() as u64,
        data.len() as u64,
        ragged_rows,
        started.elapsed(),
    );
    info!(
        "parsed {} rows ({} bytes) in {:?}",
        stats.rows_processed, stats.bytes_processed, stats.parse_time
    );
    Ok(ParsedTable { table, stats })
}

/// Shrink the batch-size hint so large inputs split into enough batches
/// to keep the worker pool busy. Always at least 1.
fn effective_batch_size(hint: usize, data_rows: usize) -> usize {
    let hint = hint.max(1);
    #[cfg(feature = "parallel")]
    {
        let target_batches = 2 * num_cpus::get().max(2);
        hint.min(data_rows.div_ceil(target_batches).max(1))
    }
    #[cfg(not(feature = "parallel"))]
    {
        let _ = data_rows;
        hint
    }
}

#[cfg(feature = "parallel")]
fn tokenize_rows<'a>(lines: &[&'a str], delimiter: u8) -> Vec<Vec<Cow<'a, str>>> {
    lines
        .par_iter()
        .map(|&line| tokenize_line(line, delimiter))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn tokenize_rows<'a>(lines: &[&'a str], delimiter: u8) -> Vec<Vec<Cow<'a, str>>> {
    lines
        .iter()
        .map(|&line| tokenize_line(line, delimiter))
        .collect()
}

#[cfg(feature = "parallel")]
fn build_batches(
    data_rows: &[Vec<Cow<'_, str>>],
    schema: &SchemaRef,
    batch_size: usize,
) -> Result<Vec<(RecordBatch, u64)>> {
    data_rows
        .par_chunks(batch_size)
        .map(|chunk| build_batch(chunk, schema))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn build_batches(
    data_rows: &[Vec<Cow<'_, str>>],
    schema: &SchemaRef,
    batch_size: usize,
) -> Result<Vec<(RecordBatch, u64)>> {
    data_rows
        .chunks(batch_size)
        .map(|chunk| build_batch(chunk, schema))
        .collect()
}

/// Build one record batch from a chunk of tokenized rows, returning the
/// batch and the number of ragged rows it absorbed.
fn build_batch(
    chunk: &[Vec<Cow<'_, str>>],
    schema: &SchemaRef,
) -> Result<(RecordBatch, u64)> {
    let ncols = schema.fields().len();
    let mut ragged = 0u64;

    // Gather column-major; missing trailing positions become empty
    // tokens so every column stays exactly chunk.len() long.
    let mut columns: Vec<Vec<&str>> = (0..ncols)
        .map(|_| Vec::with_capacity(chunk.len()))
        .collect();
    for row in chunk {
        if row.len() != ncols {
            ragged += 1;
        }
        for (j, column) in columns.iter_mut().enumerate() {
            let value: &str = match row.get(j) {
                Some(v) => v,
                None => "",
            };
            column.push(value);
        }
    }

    #[cfg(feature = "parallel")]
    let arrays: Vec<ArrayRef> = columns
        .into_par_iter()
        .enumerate()
        .map(|(j, values)| build_column(&values, schema.field(j).data_type()))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .enumerate()
        .map(|(j, values)| build_column(&values, schema.field(j).data_type()))
        .collect();

    // try_new enforces the equal-length column invariant.
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    Ok((batch, ragged))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_batch_size_is_positive_and_bounded() {
        for (hint, rows) in [(1, 0), (16384, 10), (16384, 1_000_000), (7, 7)] {
            let got = effective_batch_size(hint, rows);
            assert!(got >= 1);
            assert!(got <= hint.max(1));
        }
        assert_eq!(effective_batch_size(0, 100), 1);
    }

    #[test]
    fn default_options() {
        let opts = ParseOptions::default();
        assert_eq!(opts.delimiter, b',');
        assert_eq!(opts.batch_size, DEFAULT_BATCH_SIZE);
    }
}
