//! Default filling.
//!
//! Counts default to 0 and money to 0.0; every other type defaults to null.
//! The policy applies to unresolved fields and to null cells of additive
//! fields. `full_name` is the one field that can be synthesized from two
//! other columns, and only when it did not resolve on its own.

use crate::{
    canonical::FieldType,
    data::Value,
    frame::{CanonicalFrame, ColumnOrigin},
    resolve::Resolution,
};

pub const FULL_NAME: &str = "full_name";
const FIRST_NAME: &str = "first_name";
const LAST_NAME: &str = "last_name";

pub fn default_for(field_type: FieldType) -> Option<Value> {
    match field_type {
        FieldType::Count => Some(Value::Integer(0)),
        FieldType::Money => Some(Value::Float(0.0)),
        _ => None,
    }
}

/// Joins the trimmed, non-empty name parts with one space.
pub fn synthesize_full_name(first: Option<&Value>, last: Option<&Value>) -> Option<Value> {
    let parts = [first, last]
        .into_iter()
        .flatten()
        .map(|value| value.as_display().trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if parts.is_empty() {
        None
    } else {
        Some(Value::String(parts.join(" ")))
    }
}

/// Fills defaults across the whole frame. Returns the canonical fields that
/// were filled entirely from the default policy.
pub fn fill_defaults(frame: &mut CanonicalFrame, resolution: &Resolution) -> Vec<String> {
    let mut defaulted = Vec::new();
    for (idx, column) in frame.columns.iter().enumerate() {
        if column.origin != ColumnOrigin::Mapped {
            continue;
        }
        let Some(field_type) = column.field_type else {
            continue;
        };
        let resolved = resolution.is_resolved(&column.name);
        if !resolved {
            defaulted.push(column.name.clone());
        }
        if let Some(default) = default_for(field_type) {
            for row in &mut frame.rows {
                if row[idx].is_none() {
                    row[idx] = Some(default.clone());
                }
            }
        }
    }

    if resolution.is_resolved(FULL_NAME) {
        return defaulted;
    }
    if let (Some(target), Some(first), Some(last)) = (
        frame.column_index(FULL_NAME),
        frame.column_index(FIRST_NAME),
        frame.column_index(LAST_NAME),
    ) {
        for row in &mut frame.rows {
            row[target] = synthesize_full_name(row[first].as_ref(), row[last].as_ref());
        }
    }
    defaulted
}
