//! Error types for the parsing engine.
//!
//! The engine distinguishes **structural failures**, which abort a parse
//! call, from per-value failures, which never surface here: an
//! unparsable or empty value in a numeric column becomes a null entry in
//! the output column instead (see [`crate::columns`]).
//!
//! Structural failures are:
//! - [`ParseError::Io`] - the file collaborator could not open or read
//!   the input file,
//! - [`ParseError::EmptySample`] - no rows were available to infer a
//!   schema from,
//! - [`ParseError::Arrow`] - a column-assembly invariant was violated.
//!
//! Keeping the I/O condition as its own variant lets callers tell a
//! missing or unreadable file apart from malformed data.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A structural failure that aborts an entire parse call.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input contained no rows, so no header is available and no
    /// schema can be inferred.
    #[error("no rows available for schema inference")]
    EmptySample,

    /// Column assembly failed an Arrow-level invariant (e.g. unequal
    /// column lengths when building a record batch).
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}
