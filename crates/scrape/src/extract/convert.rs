// ABOUTME: Text-to-number conversion helpers for scraped stat values.
// ABOUTME: Strips thousands separators and percent signs, validating the remainder before parsing.

//! Conversion of noisy scraped text into typed numeric values.
//!
//! Every helper takes the (possibly absent) raw text of an extracted field
//! and returns either the cleanly converted value or the field's default.
//! Malformed input never produces an error: partial data beats a failed
//! request, so a field that does not validate simply falls back.

/// Strips thousands separators from a raw stat string.
fn strip_separators(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// True when the cleaned string is non-empty and entirely ASCII digits.
fn is_integer(cleaned: &str) -> bool {
    !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit())
}

/// True when the cleaned string is a plain decimal number: at most one `.`,
/// every other character a digit. Rejects empty strings and a bare `.`.
fn is_decimal(cleaned: &str) -> bool {
    let without_point = cleaned.replacen('.', "", 1);
    is_integer(&without_point)
}

/// Converts an integer stat like `"1,234"` to `1234`, or `default` when the
/// text is absent or malformed.
pub fn int_or(raw: Option<&str>, default: u32) -> u32 {
    match raw {
        Some(text) => {
            let cleaned = strip_separators(text);
            if is_integer(&cleaned) {
                cleaned.parse().unwrap_or(default)
            } else {
                default
            }
        }
        None => default,
    }
}

/// Converts an integer stat to `Some(n)`, or `None` when absent or malformed.
pub fn int_opt(raw: Option<&str>) -> Option<u32> {
    let cleaned = strip_separators(raw?);
    if is_integer(&cleaned) {
        cleaned.parse().ok()
    } else {
        None
    }
}

/// Converts a ratio or percentage stat like `"54.3%"` to `54.3`, or
/// `default` when the text is absent or malformed.
pub fn float_or(raw: Option<&str>, default: f64) -> f64 {
    match raw {
        Some(text) => {
            let cleaned = strip_separators(&text.replace('%', ""));
            if is_decimal(&cleaned) {
                cleaned.parse().unwrap_or(default)
            } else {
                default
            }
        }
        None => default,
    }
}

/// Converts a play-time label like `"1,204.5h Play Time"` to `1204.5`.
///
/// Takes the portion before the literal `h`, strips separators, and
/// float-validates it. Defaults to `0.0` when the text is absent, has no
/// `h`, or does not validate.
pub fn hours(raw: Option<&str>) -> f64 {
    match raw {
        Some(text) if text.contains('h') => {
            let prefix = text.split('h').next().unwrap_or("");
            float_or(Some(prefix), 0.0)
        }
        _ => 0.0,
    }
}

/// Returns the extracted text or a default label for rank-style fields.
pub fn label_or(raw: Option<String>, default: &str) -> String {
    match raw {
        Some(text) if !text.is_empty() => text,
        _ => default.to_string(),
    }
}
