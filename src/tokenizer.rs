//! Quote-aware line tokenization with a vectorized fast path.
//!
//! A line is split on an ASCII delimiter byte into fields. A double quote
//! toggles an "inside quoted span" state; delimiters inside a quoted span
//! are field content, and the quote bytes themselves are stripped from
//! the emitted field. A backslash has no special meaning.
//!
//! Two paths produce identical token sequences:
//! - **Accelerated**: comma-delimited lines at least [`LANE_WIDTH`] bytes
//!   long are scanned in 32-byte lanes with AVX2 compare + movemask. The
//!   lane scan is only sound while no quote byte has been seen, so the
//!   moment a lane contains a quote the scan stops at that exact offset
//!   and the scalar path takes over for the remainder of the line.
//! - **Scalar**: byte-wise scan tracking the quote state. This is the
//!   portable reference path and is exposed as [`tokenize_line_scalar`]
//!   so the two can be tested against each other.
//!
//! Fields that no quote processing touched are borrowed from the input
//! line; fields that had quotes stripped are owned copies.

use std::borrow::Cow;

/// Number of bytes processed per wide compare in the accelerated path.
pub const LANE_WIDTH: usize = 32;

/// Split one line into fields, honoring quoted spans.
///
/// A line containing `k` delimiters outside quotes yields exactly `k + 1`
/// fields; the trailing (possibly empty) field is always emitted. There
/// is no failure mode: an unterminated quote leaves the rest of the line
/// inside the quoted span rather than producing an error.
pub fn tokenize_line(line: &str, delimiter: u8) -> Vec<Cow<'_, str>> {
    #[cfg(target_arch = "x86_64")]
    {
        if delimiter == b','
            && line.len() >= LANE_WIDTH
            && is_x86_feature_detected!("avx2")
        {
            return tokenize_line_accelerated(line, delimiter);
        }
    }
    tokenize_line_scalar(line, delimiter)
}

/// Byte-wise reference tokenizer.
///
/// Produces the same token sequence as [`tokenize_line`] on every input;
/// differential tests run both over the same corpus.
pub fn tokenize_line_scalar(line: &str, delimiter: u8) -> Vec<Cow<'_, str>> {
    let mut fields = Vec::new();
    finish_scalar(line, 0, 0, delimiter, &mut fields);
    fields
}

#[cfg(target_arch = "x86_64")]
fn tokenize_line_accelerated(line: &str, delimiter: u8) -> Vec<Cow<'_, str>> {
    let bytes = line.as_bytes();
    let mut cuts = Vec::new();
    // Guarded by the is_x86_feature_detected check in tokenize_line.
    let handoff = unsafe { scan_unquoted_prefix(bytes, delimiter, &mut cuts) };

    let mut fields = Vec::with_capacity(cuts.len() + 1);
    let mut field_start = 0;
    for &cut in &cuts {
        fields.push(Cow::Borrowed(&line[field_start..cut]));
        field_start = cut + 1;
    }
    finish_scalar(line, field_start, handoff, delimiter, &mut fields);
    fields
}

/// Emit delimiter offsets lane by lane until the first quote byte.
///
/// Returns the offset where scalar scanning must resume: the position of
/// the first quote, or the end of the last full lane when no quote was
/// seen. Delimiter bits before the first quote are still emitted, since
/// the quote state is known to be false up to that point.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn scan_unquoted_prefix(bytes: &[u8], delimiter: u8, cuts: &mut Vec<usize>) -> usize {
    use std::arch::x86_64::*;

    unsafe {
        let delim_lane = _mm256_set1_epi8(delimiter as i8);
        let quote_lane = _mm256_set1_epi8(b'"' as i8);

        let mut idx = 0;
        while idx + LANE_WIDTH <= bytes.len() {
            let lane = _mm256_loadu_si256(bytes.as_ptr().add(idx) as *const __m256i);
            let delims =
                _mm256_movemask_epi8(_mm256_cmpeq_epi8(lane, delim_lane)) as u32;
            let quotes =
                _mm256_movemask_epi8(_mm256_cmpeq_epi8(lane, quote_lane)) as u32;

            if quotes != 0 {
                let first_quote = quotes.trailing_zeros() as usize;
                let mut bits = delims & ((1u32 << first_quote) - 1);
                while bits != 0 {
                    cuts.push(idx + bits.trailing_zeros() as usize);
                    bits &= bits - 1;
                }
                return idx + first_quote;
            }

            let mut bits = delims;
            while bits != 0 {
                cuts.push(idx + bits.trailing_zeros() as usize);
                bits &= bits - 1;
            }
            idx += LANE_WIDTH;
        }
        idx
    }
}

/// Scalar scan of `line[scan_from..]`, with the current field having
/// started at `field_start`. Precondition: `line[field_start..scan_from]`
/// contains no delimiter or quote byte.
///
/// A field stays borrowed until the first quote forces it into an owned
/// buffer; unflushed literal runs are appended as `&str` slices. All cut
/// points are ASCII bytes, so slicing is boundary-safe on UTF-8 content.
fn finish_scalar<'a>(
    line: &'a str,
    mut field_start: usize,
    scan_from: usize,
    delimiter: u8,
    fields: &mut Vec<Cow<'a, str>>,
) {
    let bytes = line.as_bytes();
    let mut in_quotes = false;
    let mut pending: Option<String> = None;
    let mut run_start = field_start;

    let mut i = scan_from;
    while i < bytes.len() {
        let byte = bytes[i];
        if byte == b'"' {
            let buf = pending.get_or_insert_with(String::new);
            buf.push_str(&line[run_start..i]);
            run_start = i + 1;
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            match pending.take() {
                Some(mut buf) => {
                    buf.push_str(&line[run_start..i]);
                    fields.push(Cow::Owned(buf));
                }
                None => fields.push(Cow::Borrowed(&line[field_start..i])),
            }
            field_start = i + 1;
            run_start = i + 1;
        }
        i += 1;
    }

    match pending.take() {
        Some(mut buf) => {
            buf.push_str(&line[run_start..]);
            fields.push(Cow::Owned(buf));
        }
        None => fields.push(Cow::Borrowed(&line[field_start..])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(line: &str) -> Vec<String> {
        tokenize_line(line, b',')
            .into_iter()
            .map(|c| c.into_owned())
            .collect()
    }

    fn toks_scalar(line: &str) -> Vec<String> {
        tokenize_line_scalar(line, b',')
            .into_iter()
            .map(|c| c.into_owned())
            .collect()
    }

    #[test]
    fn short_line_basic_fields() {
        assert_eq!(toks("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(toks(""), vec![""]);
        assert_eq!(toks(","), vec!["", ""]);
        assert_eq!(toks("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn long_line_matches_scalar() {
        // Long enough to cover several lanes plus a tail.
        let line = "alpha,beta,gamma,delta,epsilon,zeta,eta,theta,iota,kappa,x";
        assert!(line.len() >= LANE_WIDTH);
        assert_eq!(toks(line), toks_scalar(line));
        assert_eq!(toks(line).len(), line.matches(',').count() + 1);
    }

    #[test]
    fn quote_in_first_lane_hands_off() {
        // Quote at offset 2: only the delimiter before it may be emitted
        // by the lane scan; everything after goes through the scalar path.
        let line = "a,\"b,c\",dddddddddddddddddddddddddddddddd";
        assert!(line.len() >= LANE_WIDTH);
        assert_eq!(
            toks(line),
            vec!["a", "b,c", "dddddddddddddddddddddddddddddddd"]
        );
    }

    #[test]
    fn quote_at_lane_start() {
        // Quote is the very first byte: the lane scan must emit nothing.
        let line = "\"x,y\",aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        assert!(line.len() >= LANE_WIDTH);
        assert_eq!(toks(line), vec!["x,y", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]);
    }

    #[test]
    fn quote_in_tail_after_lanes() {
        // 32 clean bytes first, quote only in the scalar tail.
        let line = "aaaaaaaaaaaaaaa,bbbbbbbbbbbbbbbb,\"c,d\"";
        assert!(line.len() > LANE_WIDTH);
        assert_eq!(
            toks(line),
            vec!["aaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbb", "c,d"]
        );
    }

    #[test]
    fn delimiter_at_lane_boundary() {
        // Delimiters at offsets 31 and 32, straddling the first lane edge.
        let mut line = "a".repeat(31);
        line.push(',');
        line.push(',');
        line.push_str("tail");
        let expect = vec!["a".repeat(31), String::new(), "tail".to_string()];
        assert_eq!(toks(&line), expect);
        assert_eq!(toks_scalar(&line), expect);
    }

    #[test]
    fn line_of_exactly_one_lane() {
        let line = "aaaa,bbbb,cccc,dddd,eeee,ffff,gg"; // 32 bytes
        assert_eq!(line.len(), LANE_WIDTH);
        assert_eq!(
            toks(line),
            vec!["aaaa", "bbbb", "cccc", "dddd", "eeee", "ffff", "gg"]
        );
    }

    #[test]
    fn unterminated_quote_swallows_rest_of_line() {
        let line = "a,\"b,c,d";
        assert_eq!(toks(line), vec!["a", "b,c,d"]);
        let long = format!("a,\"{}", "x,".repeat(30));
        assert_eq!(toks(&long).len(), 2);
    }

    #[test]
    fn doubled_quotes_concatenate_content() {
        assert_eq!(toks("\"a\"\"b\",c"), vec!["ab", "c"]);
    }

    #[test]
    fn non_comma_delimiter_uses_scalar_path() {
        let line = "a;b;c;ddddddddddddddddddddddddddddddd";
        let fields: Vec<String> = tokenize_line(line, b';')
            .into_iter()
            .map(|c| c.into_owned())
            .collect();
        assert_eq!(fields, vec!["a", "b", "c", "ddddddddddddddddddddddddddddddd"]);
    }

    #[test]
    fn multibyte_content_survives_both_paths() {
        let line = "naïve,Bücher,日本語,aaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        assert!(line.len() >= LANE_WIDTH);
        assert_eq!(toks(line), toks_scalar(line));
        assert_eq!(toks(line), vec!["naïve", "Bücher", "日本語", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]);
    }

    #[test]
    fn borrowed_unless_quoted() {
        let line = "plain,\"quoted\",tail";
        let fields = tokenize_line_scalar(line, b',');
        assert!(matches!(fields[0], Cow::Borrowed(_)));
        assert!(matches!(fields[1], Cow::Owned(_)));
        assert!(matches!(fields[2], Cow::Borrowed(_)));
    }
}
