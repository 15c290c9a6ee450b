//! Sample-based column type inference.
//!
//! Column names come from the first sample row (the header); up to
//! [`SCHEMA_SAMPLE_ROWS`] subsequent rows drive type inference. Each
//! column runs a small one-way promotion state machine: it starts out
//! assuming integers, promotes to float when a sampled value carries a
//! decimal point, and drops irreversibly to text the first time a value
//! fails a strict full-string numeric parse. Empty values carry no
//! information and are skipped; a column that never observes a non-empty
//! value ends up as text.
//!
//! Inference is one-shot: the resulting schema is never revised, even if
//! rows outside the sample contradict it. Such values become nulls during
//! column construction instead.

use std::borrow::Cow;

use arrow::datatypes::{DataType, Field, Schema};
use log::debug;

use crate::error::{ParseError, Result};

/// Maximum number of data rows examined after the header.
pub const SCHEMA_SAMPLE_ROWS: usize = 100;

/// The semantic type assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integers.
    Int64,
    /// 64-bit floating point values.
    Float64,
    /// UTF-8 text.
    Utf8,
}

impl ColumnType {
    /// The Arrow data type backing this column type.
    pub fn to_arrow(self) -> DataType {
        match self {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Utf8 => DataType::Utf8,
        }
    }
}

/// Per-column promotion state. Transitions are one-way:
/// `Unobserved → AssumingInt → AssumingFloat → Text`, and `Text` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum TypeGuess {
    /// No non-empty value seen yet.
    #[default]
    Unobserved,
    /// Every value so far parsed as a number without a decimal point.
    AssumingInt,
    /// Every value so far parsed as a number, at least one with a
    /// decimal point.
    AssumingFloat,
    /// A value failed the numeric parse; the column is text.
    Text,
}

impl TypeGuess {
    /// Feed one sampled value into the state machine. Empty values are
    /// skipped; the entire value must parse numerically, a prefix is not
    /// enough.
    pub(crate) fn observe(&mut self, value: &str) {
        if value.is_empty() || *self == TypeGuess::Text {
            return;
        }
        if value.parse::<f64>().is_err() {
            *self = TypeGuess::Text;
        } else if value.contains('.') {
            *self = TypeGuess::AssumingFloat;
        } else if *self == TypeGuess::Unobserved {
            *self = TypeGuess::AssumingInt;
        }
    }

    /// Resolve the final column type. Columns with no evidence stay text.
    pub(crate) fn finish(self) -> ColumnType {
        match self {
            TypeGuess::AssumingInt => ColumnType::Int64,
            TypeGuess::AssumingFloat => ColumnType::Float64,
            TypeGuess::Unobserved | TypeGuess::Text => ColumnType::Utf8,
        }
    }
}

/// Infer a schema from tokenized sample rows.
///
/// `sample_rows[0]` is the header; its values become column names and are
/// passed through positionally (duplicates included). At most
/// [`SCHEMA_SAMPLE_ROWS`] following rows are examined. Rows shorter than
/// the header contribute only the positions they have; positions beyond
/// the header are ignored.
///
/// All fields are nullable: numeric columns null out unparsable values
/// later, and text columns may still legitimately hold empty strings.
///
/// # Errors
/// Returns [`ParseError::EmptySample`] when `sample_rows` is empty:
/// without a header there is nothing to infer.
pub fn infer_schema(sample_rows: &[Vec<Cow<'_, str>>]) -> Result<Schema> {
    let header = sample_rows.first().ok_or(ParseError::EmptySample)?;
    let mut guesses = vec![TypeGuess::default(); header.len()];

    let sample_end = sample_rows.len().min(1 + SCHEMA_SAMPLE_ROWS);
    for row in &sample_rows[1..sample_end] {
        for (guess, value) in guesses.iter_mut().zip(row.iter()) {
            guess.observe(value);
        }
    }

    let fields: Vec<Field> = header
        .iter()
        .zip(guesses.iter())
        .map(|(name, guess)| Field::new(name.as_ref(), guess.finish().to_arrow(), true))
        .collect();
    debug!(
        "inferred schema with {} columns from {} sample rows",
        fields.len(),
        sample_end - 1
    );
    Ok(Schema::new(fields))
}
