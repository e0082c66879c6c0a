//! Conversion between the snake_case names used on the Rust side and the
//! camelCase/PascalCase field names used by the gateway.
//!
//! The conversion is deterministic, and ordinary identifiers round-trip:
//! `to_snake(&to_upper_camel(s)) == s` for any snake_case `s` without
//! consecutive capitals or leading digits.
//!
//! Acronym-heavy names do not round-trip. For example `query_start_AMPM`
//! becomes `queryStartAMPM`, which converts back to `query_start_ampm`.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));
static LOWER_UPPER_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

/// Converts a snake_case name into the camelCase form the gateway expects.
///
/// Every underscore followed by a letter is dropped and the letter is upper-cased.
/// A leading underscore, or an underscore followed by anything else, is kept as is.
///
/// ```rust
/// # use firstpay_rust::naming::to_upper_camel;
/// assert_eq!(to_upper_camel("trans_date_and_time"), "transDateAndTime");
/// assert_eq!(to_upper_camel("query_start_AMPM"), "queryStartAMPM");
/// ```
pub fn to_upper_camel(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut chars = snake.chars().enumerate().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '_' && i > 0 {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_alphabetic() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }

    out
}

/// Upper-cases the first letter of `name`.
pub fn to_pascal(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a camelCase or PascalCase gateway field name into snake_case.
///
/// Handles both `wordWordWord` and `ABBRWord` boundaries:
///
/// ```rust
/// # use firstpay_rust::naming::to_snake;
/// assert_eq!(to_snake("isSuccess"), "is_success");
/// assert_eq!(to_snake("CCRecordId"), "cc_record_id");
/// ```
pub fn to_snake(name: &str) -> String {
    let s = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    LOWER_UPPER_BOUNDARY
        .replace_all(&s, "${1}_${2}")
        .to_lowercase()
}
