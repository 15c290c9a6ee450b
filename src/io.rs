//! File-reading collaborator.
//!
//! The engine core never touches a filesystem; this module is the single
//! exception. [`parse_file`] reads a file fully into memory with one
//! synchronous read (no streaming, no partial-read retry) and hands
//! the buffer to [`parse_bytes`](crate::parse_bytes). A file that cannot
//! be opened or read surfaces as [`ParseError::Io`], which callers can
//! tell apart from any parse-logic failure.

use std::fs;
use std::path::Path;

use crate::engine::{ParseOptions, ParsedTable, parse_bytes};
use crate::error::{ParseError, Result};

/// Read `path` fully into memory and parse it.
///
/// # Errors
/// Returns [`ParseError::Io`] with the offending path when the file
/// cannot be opened or read; otherwise whatever
/// [`parse_bytes`](crate::parse_bytes) returns.
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<ParsedTable> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&data, options)
}
