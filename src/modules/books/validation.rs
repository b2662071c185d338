//! Request-shape checks for the book handlers.

use inout_http::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub const CREATE_KEYS: &[&str] = &["id", "title", "author"];
pub const UPDATE_KEYS: &[&str] = &["title", "author"];

pub const BAD_REQUEST: &str = "Bad Request";
pub const NOT_A_NUMBER: &str = "Input must be a number";

/// Key-set validation: same number of keys, and every received key expected.
pub fn has_exact_keys(fields: &Map<String, Value>, expected: &[&str]) -> bool {
    fields.len() == expected.len() && fields.keys().all(|key| expected.contains(&key.as_str()))
}

/// Read the integer at the start of `raw`, ignoring whatever trails it.
///
/// Leading whitespace and one sign are skipped, and a `0x` prefix switches to
/// hexadecimal. `None` only when no digit follows. Out-of-range values
/// saturate, so they can never match a stored id.
pub fn leading_integer(raw: &str) -> Option<i64> {
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits: Vec<i64> = rest
        .chars()
        .map_while(|c| c.to_digit(radix))
        .map(i64::from)
        .collect();
    if digits.is_empty() {
        return None;
    }

    let radix = i64::from(radix);
    let value = digits.into_iter().fold(0i64, |acc, digit| {
        let next = acc.saturating_mul(radix);
        if negative {
            next.saturating_sub(digit)
        } else {
            next.saturating_add(digit)
        }
    });
    Some(value)
}

/// Parse a path identifier as a book id.
pub fn parse_id(raw: &str) -> AppResult<i64> {
    leading_integer(raw).ok_or_else(|| {
        tracing::warn!(raw_id = raw, "rejected non-numeric book id");
        AppError::bad_input(NOT_A_NUMBER)
    })
}

/// Require `body` to be an object with exactly `expected` keys, then
/// deserialize it.
pub fn exact_shape<T: DeserializeOwned>(body: Value, expected: &[&str]) -> AppResult<T> {
    let Value::Object(fields) = &body else {
        tracing::warn!("Bad Request: body is not a JSON object");
        return Err(AppError::bad_input(BAD_REQUEST));
    };

    if !has_exact_keys(fields, expected) {
        let received: Vec<&str> = fields.keys().map(String::as_str).collect();
        tracing::warn!(?received, ?expected, "Bad Request: missing keys or extra keys");
        return Err(AppError::bad_input(BAD_REQUEST));
    }

    serde_json::from_value(body).map_err(|err| {
        tracing::warn!(error = %err, "Bad Request: field values have the wrong type");
        AppError::bad_input(BAD_REQUEST)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::{Book, BookPatch};
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn exact_key_set_passes_in_any_order() {
        let body = fields(json!({"author": "a", "id": 1, "title": "t"}));
        assert!(has_exact_keys(&body, CREATE_KEYS));
    }

    #[test]
    fn missing_extra_or_swapped_keys_fail() {
        assert!(!has_exact_keys(&fields(json!({"id": 1, "title": "t"})), CREATE_KEYS));
        assert!(!has_exact_keys(
            &fields(json!({"id": 1, "title": "t", "author": "a", "isbn": "x"})),
            CREATE_KEYS
        ));
        assert!(!has_exact_keys(
            &fields(json!({"id": 1, "title": "t", "isbn": "x"})),
            CREATE_KEYS
        ));
        assert!(!has_exact_keys(
            &fields(json!({"id": 1, "title": "t", "author": "a"})),
            UPDATE_KEYS
        ));
    }

    #[test]
    fn key_check_ignores_value_types() {
        let body = fields(json!({"title": 42, "author": null}));
        assert!(has_exact_keys(&body, UPDATE_KEYS));
    }

    #[test]
    fn parse_id_reads_the_leading_integer() {
        assert_eq!(parse_id("17").unwrap(), 17);
        assert_eq!(parse_id("-3").unwrap(), -3);
        assert_eq!(parse_id("+4").unwrap(), 4);
        assert_eq!(parse_id("12abc").unwrap(), 12);
        assert_eq!(parse_id("1.5").unwrap(), 1);
        assert_eq!(parse_id("  2 ").unwrap(), 2);
        assert_eq!(parse_id("0x1f").unwrap(), 31);
    }

    #[test]
    fn parse_id_rejects_input_without_digits() {
        for raw in ["boo", "", "   ", "-", "abc12", ".5", "0x"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.to_string(), NOT_A_NUMBER);
        }
    }

    #[test]
    fn leading_integer_saturates() {
        assert_eq!(leading_integer("99999999999999999999"), Some(i64::MAX));
        assert_eq!(leading_integer("-99999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn exact_shape_deserializes_valid_bodies() {
        let book: Book =
            exact_shape(json!({"id": 6, "title": "Jurassic Park", "author": "Michael Crichton"}), CREATE_KEYS)
                .unwrap();
        assert_eq!(book, Book::new(6, "Jurassic Park", "Michael Crichton"));
    }

    #[test]
    fn exact_shape_rejects_non_objects_and_wrong_types() {
        let not_object = exact_shape::<BookPatch>(json!(["title", "author"]), UPDATE_KEYS);
        assert_eq!(not_object.unwrap_err().to_string(), BAD_REQUEST);

        let wrong_type = exact_shape::<BookPatch>(json!({"title": 42, "author": "a"}), UPDATE_KEYS);
        assert_eq!(wrong_type.unwrap_err().to_string(), BAD_REQUEST);
    }
}
