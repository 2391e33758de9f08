//! Grouped roll-up of a canonical frame.
//!
//! Count and money columns are summed. Every other column keeps the first
//! non-null value seen in the group, which is lossy for fields that vary
//! within a group. Derived columns must be recomputed by the caller.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{info, warn};

use crate::{
    data::{ComparableValue, Value},
    frame::{CanonicalFrame, CanonicalRow},
};

/// Group keys that carry at least one non-null value. Keys missing from the
/// frame or null on every row are dropped.
pub fn effective_keys(frame: &CanonicalFrame, group_keys: &[String]) -> Vec<usize> {
    group_keys
        .iter()
        .unique()
        .filter_map(|key| {
            let Some(idx) = frame.column_index(key) else {
                warn!("Group key '{key}' is not a frame column; ignoring");
                return None;
            };
            if frame.column_values(idx).all(|value| value.is_none()) {
                info!("Group key '{key}' is null on every row; dropping it from the grouping");
                None
            } else {
                Some(idx)
            }
        })
        .collect()
}

pub fn aggregate(frame: &CanonicalFrame, group_keys: &[String]) -> CanonicalFrame {
    let keys = effective_keys(frame, group_keys);
    let additive = frame
        .columns
        .iter()
        .map(|column| column.field_type.is_some_and(|t| t.is_additive()))
        .collect::<Vec<_>>();

    let mut positions: BTreeMap<Vec<ComparableValue>, usize> = BTreeMap::new();
    let mut groups: Vec<CanonicalRow> = Vec::new();
    for row in &frame.rows {
        let key = keys
            .iter()
            .map(|idx| ComparableValue(row[*idx].clone()))
            .collect::<Vec<_>>();
        match positions.get(&key) {
            Some(&position) => merge_into(&mut groups[position], row, &additive),
            None => {
                positions.insert(key, groups.len());
                groups.push(row.clone());
            }
        }
    }

    info!(
        "Aggregated {} row(s) into {} group(s) over {} key(s)",
        frame.rows.len(),
        groups.len(),
        keys.len()
    );
    CanonicalFrame {
        columns: frame.columns.clone(),
        rows: groups,
    }
}

fn merge_into(target: &mut CanonicalRow, row: &CanonicalRow, additive: &[bool]) {
    for (idx, cell) in row.iter().enumerate() {
        if additive[idx] {
            target[idx] = add(target[idx].take(), cell.as_ref());
        } else if target[idx].is_none() {
            target[idx] = cell.clone();
        }
    }
}

fn add(total: Option<Value>, value: Option<&Value>) -> Option<Value> {
    match (total, value) {
        (total, None) => total,
        (None, Some(value)) => Some(value.clone()),
        (Some(Value::Integer(a)), Some(Value::Integer(b))) => Some(match a.checked_add(*b) {
            Some(sum) => Value::Integer(sum),
            None => Value::Float(a as f64 + *b as f64),
        }),
        (Some(total), Some(value)) => match (total.as_f64(), value.as_f64()) {
            (Some(a), Some(b)) => Some(Value::Float(a + b)),
            _ => Some(total),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::canonical::AD_SPEND;

    fn frame_with(rows: &[(&str, Option<&str>, f64, i64)]) -> CanonicalFrame {
        let mut frame = CanonicalFrame::empty(&AD_SPEND);
        frame.push_null_rows(rows.len());
        let date = frame.column_index("date").unwrap();
        let campaign = frame.column_index("campaign_id").unwrap();
        let spend = frame.column_index("spend").unwrap();
        let clicks = frame.column_index("clicks").unwrap();
        for (row, (day, campaign_id, amount, count)) in frame.rows.iter_mut().zip(rows) {
            row[0] = Some(Value::String("google_ads".into()));
            row[date] = Some(Value::Date(NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap()));
            row[campaign] = campaign_id.map(|id| Value::String(id.to_string()));
            row[spend] = Some(Value::Float(*amount));
            row[clicks] = Some(Value::Integer(*count));
        }
        frame
    }

    fn keys() -> Vec<String> {
        ["date", "platform", "campaign_id"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn sums_additive_fields_per_group() {
        let frame = frame_with(&[
            ("2024-01-01", Some("c1"), 10.0, 1),
            ("2024-01-01", Some("c1"), 15.0, 2),
            ("2024-01-02", Some("c1"), 1.0, 3),
        ]);
        let rolled = aggregate(&frame, &keys());
        assert_eq!(rolled.len(), 2);
        assert_eq!(rolled.value(0, "spend"), Some(&Value::Float(25.0)));
        assert_eq!(rolled.value(0, "clicks"), Some(&Value::Integer(3)));
        assert_eq!(rolled.value(1, "spend"), Some(&Value::Float(1.0)));
    }

    #[test]
    fn all_null_keys_are_dropped_and_partial_nulls_bucket_together() {
        let frame = frame_with(&[
            ("2024-01-01", None, 1.0, 1),
            ("2024-01-01", None, 2.0, 1),
        ]);
        assert_eq!(effective_keys(&frame, &keys()).len(), 2);
        assert_eq!(aggregate(&frame, &keys()).len(), 1);

        let frame = frame_with(&[
            ("2024-01-01", Some("c1"), 1.0, 1),
            ("2024-01-01", None, 2.0, 1),
            ("2024-01-01", None, 4.0, 1),
        ]);
        let rolled = aggregate(&frame, &keys());
        assert_eq!(rolled.len(), 2);
        assert_eq!(rolled.value(1, "campaign_id"), None);
        assert_eq!(rolled.value(1, "spend"), Some(&Value::Float(6.0)));
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let frame = frame_with(&[
            ("2024-01-03", Some("b"), 1.0, 1),
            ("2024-01-01", Some("a"), 1.0, 1),
            ("2024-01-03", Some("b"), 1.0, 1),
        ]);
        let rolled = aggregate(&frame, &keys());
        assert_eq!(rolled.value(0, "campaign_id"), Some(&Value::String("b".into())));
        assert_eq!(rolled.value(1, "campaign_id"), Some(&Value::String("a".into())));
    }
}
