//! Field-level coercions shared by the per-entity rules.
//!
//! Every helper leaves already-normalized values untouched, which is what
//! makes the whole pipeline idempotent.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Record;

/// Labels the grid shows for the two `is_active` states.
pub const ACTIVE_LABELS: &[&str] = &["활성", "active"];
pub const INACTIVE_LABELS: &[&str] = &["비활성", "inactive"];

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Replace a status label in `is_active` with the matching boolean.
pub fn status_to_bool(record: &mut Record) {
    let flag = match record.get("is_active") {
        Some(Value::String(s)) if ACTIVE_LABELS.contains(&s.as_str()) => true,
        Some(Value::String(s)) if INACTIVE_LABELS.contains(&s.as_str()) => false,
        _ => return,
    };
    record.insert("is_active".into(), Value::Bool(flag));
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Coerce a string-valued field to a float, falling back to `default`.
/// Non-string values are left as they are.
pub fn float_field(record: &mut Record, field: &str, default: f64) {
    if let Some(Value::String(raw)) = record.get(field) {
        let parsed = parse_float_prefix(raw)
            .filter(|v| v.is_finite())
            .unwrap_or(default);
        record.insert(field.into(), Value::from(parsed));
    }
}

/// Coerce a string-valued field to an integer, falling back to `default`.
pub fn int_field(record: &mut Record, field: &str, default: i64) {
    if let Some(Value::String(raw)) = record.get(field) {
        let parsed = parse_int_prefix(raw).unwrap_or(default);
        record.insert(field.into(), Value::from(parsed));
    }
}

/// Parse the longest leading decimal number in `raw`, so `"12.5kg"`
/// yields `12.5`. Returns `None` when no digits lead the string.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parse the longest leading decimal integer in `raw`; `"7.9"` yields `7`.
/// Values outside the `i64` range saturate to `i64::MIN`/`i64::MAX`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }

    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(s[..sign + digits].parse().unwrap_or(saturated))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// ---------------------------------------------------------------------------
// Optional text
// ---------------------------------------------------------------------------

/// Rewrite present-but-empty string fields to `null`. Absent fields stay
/// absent.
pub fn empty_to_null(record: &mut Record, fields: &[&str]) {
    for field in fields {
        if let Some(value) = record.get_mut(*field) {
            if value.as_str() == Some("") {
                *value = Value::Null;
            }
        }
    }
}

/// Fill `field` with `default` when it is absent, null or empty.
pub fn default_text(record: &mut Record, field: &str, default: &str) {
    let missing = match record.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    };
    if missing {
        record.insert(field.into(), Value::from(default));
    }
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// Require a non-blank text (or numeric) value.
pub fn require_text(record: &Record, field: &'static str, message: &str) -> Result<(), CoreError> {
    match record.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(()),
        Some(Value::Number(_)) => Ok(()),
        _ => Err(CoreError::validation(field, message)),
    }
}

/// Require a syntactically valid `email` field.
pub fn require_email(record: &Record) -> Result<(), CoreError> {
    let email = match record.get("email") {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => return Err(CoreError::validation("email", "이메일은 필수입니다.")),
    };
    if !is_valid_email(email) {
        return Err(CoreError::validation(
            "email",
            "유효한 이메일 형식이 아닙니다.",
        ));
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
