//! Typed column construction from string tokens.
//!
//! A column build never fails: numeric tokens that do not parse (empty,
//! malformed, partial, out of range) become null entries, and text
//! columns take every token verbatim (an empty string is a valid
//! non-null text value). The output array always has exactly one slot per
//! input token.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::DataType;

/// Convert one column's tokens into a typed Arrow array.
///
/// `Int64` and `Float64` columns use strict full-string parses with
/// null-on-failure semantics; any other data type falls back to verbatim
/// text.
pub fn build_column(values: &[&str], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Int64 => {
            let mut builder = Int64Builder::with_capacity(values.len());
            for value in values {
                match value.parse::<i64>() {
                    Ok(v) => builder.append_value(v),
                    Err(_) => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        DataType::Float64 => {
            let mut builder = Float64Builder::with_capacity(values.len());
            for value in values {
                match value.parse::<f64>() {
                    Ok(v) => builder.append_value(v),
                    Err(_) => builder.append_null(),
                }
            }
            Arc::new(builder.finish())
        }
        _ => {
            let bytes = values.iter().map(|v| v.len()).sum();
            let mut builder = StringBuilder::with_capacity(values.len(), bytes);
            for value in values {
                builder.append_value(value);
            }
            Arc::new(builder.finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, Int64Array, StringArray};

    #[test]
    fn int_column_nulls_bad_values() {
        let array = build_column(&["1", "", "12x", "9223372036854775808", "-5"], &DataType::Int64);
        let ints = array.as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(ints.len(), 5);
        assert_eq!(ints.value(0), 1);
        assert!(ints.is_null(1));
        assert!(ints.is_null(2));
        assert!(ints.is_null(3)); // i64::MAX + 1 overflows
        assert_eq!(ints.value(4), -5);
    }

    #[test]
    fn float_column_nulls_bad_values() {
        let array = build_column(&["2.5", "", "nope", "1e3"], &DataType::Float64);
        let floats = array.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(floats.value(0), 2.5);
        assert!(floats.is_null(1));
        assert!(floats.is_null(2));
        assert_eq!(floats.value(3), 1000.0);
    }

    #[test]
    fn text_column_keeps_empty_strings_non_null() {
        let array = build_column(&["x", "", "y"], &DataType::Utf8);
        let text = array.as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(text.null_count(), 0);
        assert_eq!(text.value(1), "");
    }

    #[test]
    fn output_length_equals_input_length() {
        for dt in [DataType::Int64, DataType::Float64, DataType::Utf8] {
            let array = build_column(&["1", "2", "3"], &dt);
            assert_eq!(array.len(), 3);
        }
    }
}
