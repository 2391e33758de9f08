//! Type coercion of raw source cells into canonical values.
//!
//! Coercion never fails: a cell that cannot be read as the target type
//! becomes null.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value as JsonValue;

use crate::{
    canonical::FieldType,
    data::{Value, parse_naive_date, parse_naive_datetime},
    mapping::ValueTransform,
    source::Row,
};

const CURRENCY_PREFIXES: &[char] = &['$', '€', '£', '¥', '₹'];

pub fn coerce(raw: &JsonValue, field_type: FieldType, transform: Option<ValueTransform>) -> Option<Value> {
    if is_blank(raw) {
        return None;
    }
    match transform {
        Some(ValueTransform::Lookup(entries)) => {
            let code = render_text(raw)?;
            let label = entries
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(code.trim()))
                .map(|(_, label)| label.to_string())
                .unwrap_or(code);
            coerce_plain(&JsonValue::String(label), field_type)
        }
        Some(ValueTransform::MicrosToUnits) => scaled(raw, field_type, 1_000_000.0),
        Some(ValueTransform::CentsToUnits) => scaled(raw, field_type, 100.0),
        Some(ValueTransform::EpochSeconds) => {
            epoch(raw, field_type, 1).or_else(|| coerce_plain(raw, field_type))
        }
        Some(ValueTransform::EpochMillis) => {
            epoch(raw, field_type, 1000).or_else(|| coerce_plain(raw, field_type))
        }
        None => coerce_plain(raw, field_type),
    }
}

/// Coerces one source column across every row. Returns the values and the
/// number of non-blank cells that could not be coerced.
pub fn coerce_column(
    rows: &[Row],
    column: &str,
    field_type: FieldType,
    transform: Option<ValueTransform>,
) -> (Vec<Option<Value>>, usize) {
    let mut rejected = 0usize;
    let values = rows
        .iter()
        .map(|row| {
            let raw = row.get(column).unwrap_or(&JsonValue::Null);
            let value = coerce(raw, field_type, transform);
            if value.is_none() && !is_blank(raw) {
                rejected += 1;
            }
            value
        })
        .collect();
    (values, rejected)
}

fn coerce_plain(raw: &JsonValue, field_type: FieldType) -> Option<Value> {
    match field_type {
        FieldType::Identifier => render_identifier(raw).map(Value::String),
        FieldType::Text => render_text(raw)
            .filter(|text| !text.trim().is_empty())
            .map(Value::String),
        FieldType::Count => parse_number(raw).map(count_value),
        FieldType::Money | FieldType::Numeric => parse_number(raw).map(Value::Float),
        FieldType::Date => match raw {
            JsonValue::String(s) => parse_naive_date(s)
                .or_else(|_| parse_naive_datetime(s).map(|dt| dt.date()))
                .ok()
                .map(Value::Date),
            _ => None,
        },
        FieldType::DateTime => match raw {
            JsonValue::String(s) => parse_naive_datetime(s).ok().map(Value::DateTime),
            _ => None,
        },
    }
}

fn scaled(raw: &JsonValue, field_type: FieldType, divisor: f64) -> Option<Value> {
    let units = parse_number(raw)? / divisor;
    match field_type {
        FieldType::Count => Some(count_value(units)),
        FieldType::Money | FieldType::Numeric => Some(Value::Float(units)),
        _ => coerce_plain(raw, field_type),
    }
}

fn epoch(raw: &JsonValue, field_type: FieldType, per_second: i64) -> Option<Value> {
    let number = parse_number(raw)?;
    if number.fract() != 0.0 && per_second != 1 {
        return None;
    }
    let (seconds, nanos) = if per_second == 1 {
        let whole = number.trunc();
        (whole as i64, ((number - whole) * 1e9).round() as u32)
    } else {
        let millis = number as i64;
        (
            millis.div_euclid(per_second),
            (millis.rem_euclid(per_second) * 1_000_000) as u32,
        )
    };
    let timestamp: NaiveDateTime = DateTime::from_timestamp(seconds, nanos)?.naive_utc();
    match field_type {
        FieldType::Date => Some(Value::Date(timestamp.date())),
        FieldType::DateTime => Some(Value::DateTime(timestamp)),
        _ => coerce_plain(raw, field_type),
    }
}

fn count_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::Integer(number as i64)
    } else {
        Value::Float(number)
    }
}

fn is_blank(raw: &JsonValue) -> bool {
    match raw {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Numbers, or numeric strings with optional thousands separators and a
/// leading currency symbol. Non-finite results are rejected.
pub fn parse_number(raw: &JsonValue) -> Option<f64> {
    let number = match raw {
        JsonValue::Number(n) => n.as_f64()?,
        JsonValue::String(s) => {
            let trimmed = s.trim();
            let (negative, unsigned) = match trimmed.strip_prefix('-') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, trimmed),
            };
            let digits = unsigned
                .trim_start_matches(CURRENCY_PREFIXES)
                .trim()
                .replace(',', "");
            if digits.is_empty() {
                return None;
            }
            let parsed = digits.parse::<f64>().ok()?;
            if negative { -parsed } else { parsed }
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn render_identifier(raw: &JsonValue) -> Option<String> {
    match raw {
        JsonValue::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        JsonValue::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        }),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

fn render_text(raw: &JsonValue) -> Option<String> {
    match raw {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        JsonValue::Number(_) => render_identifier(raw),
        other => Some(other.to_string()),
    }
}
