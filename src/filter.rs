//! Post-filter predicates.
//!
//! All predicates are conjunctive and run over the fully derived frame. A
//! null cell fails every predicate except `!=`.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::info;

use crate::{
    canonical::{CanonicalSchema, FieldType},
    config::FilterConfig,
    data::{Value, parse_naive_date, parse_naive_datetime},
    error::ConfigError,
    frame::CanonicalFrame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub operator: ComparisonOperator,
    pub raw_value: String,
}

pub fn parse_filters(filters: &[String]) -> Result<Vec<FilterCondition>, ConfigError> {
    filters.iter().map(|f| parse_filter(f)).collect()
}

pub fn parse_filter(filter: &str) -> Result<FilterCondition, ConfigError> {
    let trimmed = filter.trim();
    let invalid = || ConfigError::InvalidLiteral {
        what: "filter expression",
        value: filter.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let lowered = trimmed.to_ascii_lowercase();
    for (needle, op) in [
        (" contains ", ComparisonOperator::Contains),
        (" startswith ", ComparisonOperator::StartsWith),
        (" endswith ", ComparisonOperator::EndsWith),
    ] {
        if let Some(idx) = lowered.find(needle) {
            let (left, right_with_space) = trimmed.split_at(idx);
            let right = right_with_space[needle.len()..].trim();
            return condition(left, op, right).ok_or_else(invalid);
        }
    }

    for (needle, op) in [
        ("!=", ComparisonOperator::NotEq),
        (">=", ComparisonOperator::Ge),
        ("<=", ComparisonOperator::Le),
        ("=", ComparisonOperator::Eq),
        (">", ComparisonOperator::Gt),
        ("<", ComparisonOperator::Lt),
    ] {
        if let Some(idx) = trimmed.find(needle) {
            let right = trimmed[idx + needle.len()..].trim();
            return condition(&trimmed[..idx], op, right).ok_or_else(invalid);
        }
    }

    Err(invalid())
}

fn condition(left: &str, operator: ComparisonOperator, right: &str) -> Option<FilterCondition> {
    let column = left.trim();
    if column.is_empty() {
        return None;
    }
    Some(FilterCondition {
        column: column.to_string(),
        operator,
        raw_value: unquote(right).to_string(),
    })
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
        {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parses a comparison literal for a typed column. Expression columns have
/// no declared type and are compared against the cell's own variant.
fn typed_literal(
    field_type: Option<FieldType>,
    raw: &str,
) -> Result<Option<Value>, ConfigError> {
    let invalid = |what| ConfigError::InvalidLiteral {
        what,
        value: raw.to_string(),
    };
    Ok(match field_type {
        None => None,
        Some(FieldType::Count | FieldType::Money | FieldType::Numeric) => Some(Value::Float(
            raw.trim().parse::<f64>().map_err(|_| invalid("number"))?,
        )),
        Some(FieldType::Date) => Some(Value::Date(
            parse_naive_date(raw).map_err(|_| invalid("date"))?,
        )),
        Some(FieldType::DateTime) => Some(Value::DateTime(
            parse_naive_datetime(raw).map_err(|_| invalid("datetime"))?,
        )),
        Some(FieldType::Identifier | FieldType::Text) => Some(Value::String(raw.to_string())),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    StatusIn {
        field: String,
        allowed: Vec<String>,
    },
    OwnerEquals {
        field: String,
        owner: String,
    },
    DateRange {
        field: String,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Compare {
        condition: FilterCondition,
        literal: Option<Value>,
    },
}

impl Predicate {
    pub fn field(&self) -> &str {
        match self {
            Predicate::StatusIn { field, .. }
            | Predicate::OwnerEquals { field, .. }
            | Predicate::DateRange { field, .. } => field,
            Predicate::Compare { condition, .. } => &condition.column,
        }
    }

    pub fn matches(&self, cell: Option<&Value>) -> bool {
        match (self, cell) {
            (Predicate::Compare { condition, literal }, cell) => {
                compare(condition, literal.as_ref(), cell)
            }
            (_, None) => false,
            (Predicate::StatusIn { allowed, .. }, Some(value)) => {
                let status = value.as_display().trim().to_lowercase();
                allowed.contains(&status)
            }
            (Predicate::OwnerEquals { owner, .. }, Some(value)) => {
                value.as_display().trim() == owner.as_str()
            }
            (Predicate::DateRange { start, end, .. }, Some(value)) => match value.as_date() {
                Some(date) => {
                    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
                }
                None => false,
            },
        }
    }
}

fn compare(condition: &FilterCondition, literal: Option<&Value>, cell: Option<&Value>) -> bool {
    use ComparisonOperator::*;
    let Some(value) = cell else {
        return condition.operator == NotEq;
    };
    match condition.operator {
        Contains | StartsWith | EndsWith => {
            let text = value.as_display();
            let needle = condition.raw_value.as_str();
            match condition.operator {
                Contains => text.contains(needle),
                StartsWith => text.starts_with(needle),
                _ => text.ends_with(needle),
            }
        }
        Eq | NotEq | Gt | Ge | Lt | Le => {
            let dynamic;
            let rhs = match literal {
                Some(literal) => literal,
                None => {
                    dynamic = dynamic_literal(value, &condition.raw_value);
                    &dynamic
                }
            };
            let ordering = value.cmp(rhs);
            match condition.operator {
                Eq => ordering == Ordering::Equal,
                NotEq => ordering != Ordering::Equal,
                Gt => ordering == Ordering::Greater,
                Ge => ordering != Ordering::Less,
                Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            }
        }
    }
}

fn dynamic_literal(cell: &Value, raw: &str) -> Value {
    let parsed = match cell {
        Value::Integer(_) | Value::Float(_) => raw.trim().parse::<f64>().ok().map(Value::Float),
        Value::Date(_) => parse_naive_date(raw).ok().map(Value::Date),
        Value::DateTime(_) => parse_naive_datetime(raw).ok().map(Value::DateTime),
        Value::String(_) => None,
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Validated predicates for one standardizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPlan {
    predicates: Vec<Predicate>,
}

impl FilterPlan {
    /// `extra_columns` are expression columns appended after the schema's own.
    pub fn build(
        config: &FilterConfig,
        schema: &CanonicalSchema,
        extra_columns: &[String],
    ) -> Result<Self, ConfigError> {
        let mut predicates = Vec::new();
        let field_type = |name: &str| -> Result<Option<FieldType>, ConfigError> {
            if let Some(field) = schema.field(name) {
                return Ok(Some(field.field_type));
            }
            if let Some(metric) = schema.derived.iter().find(|m| m.name() == name) {
                return Ok(Some(metric.output_type()));
            }
            if name == crate::canonical::PLATFORM_FIELD {
                return Ok(Some(FieldType::Text));
            }
            if extra_columns.iter().any(|column| column == name) {
                return Ok(None);
            }
            Err(ConfigError::UnknownFilterField {
                field: name.to_string(),
            })
        };

        if !config.status.is_empty() {
            let field = schema.status_field.ok_or_else(|| ConfigError::UnknownFilterField {
                field: "status".into(),
            })?;
            predicates.push(Predicate::StatusIn {
                field: field.to_string(),
                allowed: config
                    .status
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .collect(),
            });
        }

        if let Some(owner) = &config.owner {
            let field = schema.owner_field.ok_or_else(|| ConfigError::UnknownFilterField {
                field: "owner".into(),
            })?;
            predicates.push(Predicate::OwnerEquals {
                field: field.to_string(),
                owner: owner.trim().to_string(),
            });
        }

        if config.start_date.is_some() || config.end_date.is_some() {
            let field = match config.date_field.as_deref().or(schema.date_field) {
                Some(field) => field,
                None => {
                    return Err(ConfigError::UnknownFilterField {
                        field: "date".into(),
                    });
                }
            };
            match field_type(field)? {
                Some(kind) if kind.is_temporal() => {}
                _ => {
                    return Err(ConfigError::InvalidLiteral {
                        what: "date field",
                        value: field.to_string(),
                    });
                }
            }
            let parse = |raw: &Option<String>| -> Result<Option<NaiveDate>, ConfigError> {
                raw.as_deref()
                    .map(|value| {
                        parse_naive_date(value).map_err(|_| ConfigError::InvalidLiteral {
                            what: "date",
                            value: value.to_string(),
                        })
                    })
                    .transpose()
            };
            predicates.push(Predicate::DateRange {
                field: field.to_string(),
                start: parse(&config.start_date)?,
                end: parse(&config.end_date)?,
            });
        }

        for condition in parse_filters(&config.conditions)? {
            let literal = match condition.operator {
                ComparisonOperator::Contains
                | ComparisonOperator::StartsWith
                | ComparisonOperator::EndsWith => {
                    field_type(&condition.column)?;
                    None
                }
                _ => typed_literal(field_type(&condition.column)?, &condition.raw_value)?,
            };
            predicates.push(Predicate::Compare { condition, literal });
        }

        Ok(Self { predicates })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Keeps the rows that satisfy every predicate. Returns the number dropped.
    pub fn apply(&self, frame: &mut CanonicalFrame) -> usize {
        if self.predicates.is_empty() {
            return 0;
        }
        let indexed = self
            .predicates
            .iter()
            .map(|predicate| (frame.column_index(predicate.field()), predicate))
            .collect::<Vec<_>>();
        let before = frame.rows.len();
        frame.rows.retain(|row| {
            indexed.iter().all(|(idx, predicate)| {
                predicate.matches(idx.and_then(|idx| row[idx].as_ref()))
            })
        });
        let dropped = before - frame.rows.len();
        info!(
            "Filters kept {} of {} row(s) ({} predicate(s))",
            frame.rows.len(),
            before,
            self.predicates.len()
        );
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{AD_SPEND, SUPPORT_TICKETS};

    #[test]
    fn parse_filter_supports_operators_and_quotes() {
        let parsed = parse_filter("campaign_name contains 'Brand'").unwrap();
        assert_eq!(parsed.operator, ComparisonOperator::Contains);
        assert_eq!(parsed.raw_value, "Brand");
        let parsed = parse_filter("spend >= 10").unwrap();
        assert_eq!(parsed.column, "spend");
        assert_eq!(parsed.operator, ComparisonOperator::Ge);
        assert_eq!(parsed.raw_value, "10");
        assert!(parse_filter("   ").is_err());
        assert!(parse_filter("= 3").is_err());
        assert!(parse_filter("spend").is_err());
    }

    #[test]
    fn null_cells_only_pass_not_equal() {
        for (filter, expected) in [("spend != 1", true), ("spend = 1", false), ("spend < 1", false)] {
            let condition = parse_filter(filter).unwrap();
            let predicate = Predicate::Compare {
                literal: typed_literal(Some(FieldType::Money), &condition.raw_value).unwrap(),
                condition,
            };
            assert_eq!(predicate.matches(None), expected, "{filter}");
        }
    }

    #[test]
    fn numeric_comparisons_mix_integers_and_floats() {
        let condition = parse_filter("clicks = 5").unwrap();
        let predicate = Predicate::Compare {
            literal: typed_literal(Some(FieldType::Count), &condition.raw_value).unwrap(),
            condition,
        };
        assert!(predicate.matches(Some(&Value::Integer(5))));
        assert!(!predicate.matches(Some(&Value::Integer(6))));
    }

    #[test]
    fn status_is_case_insensitive_and_trimmed() {
        let config = FilterConfig {
            status: vec![" Solved ".into()],
            ..FilterConfig::default()
        };
        let plan = FilterPlan::build(&config, &SUPPORT_TICKETS, &[]).unwrap();
        let predicate = &plan.predicates()[0];
        assert!(predicate.matches(Some(&Value::String("SOLVED ".into()))));
        assert!(!predicate.matches(Some(&Value::String("open".into()))));
        assert!(!predicate.matches(None));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let config = FilterConfig {
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            ..FilterConfig::default()
        };
        let plan = FilterPlan::build(&config, &SUPPORT_TICKETS, &[]).unwrap();
        let predicate = &plan.predicates()[0];
        assert_eq!(predicate.field(), "created_date");
        let at = |s: &str| Value::DateTime(parse_naive_datetime(s).unwrap());
        assert!(predicate.matches(Some(&at("2024-01-31 23:59:59"))));
        assert!(predicate.matches(Some(&at("2024-01-01 00:00:00"))));
        assert!(!predicate.matches(Some(&at("2024-02-01 00:00:00"))));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let unknown = FilterConfig {
            conditions: vec!["nope > 1".into()],
            ..FilterConfig::default()
        };
        assert_eq!(
            FilterPlan::build(&unknown, &AD_SPEND, &[]),
            Err(ConfigError::UnknownFilterField {
                field: "nope".into()
            })
        );
        let owner = FilterConfig {
            owner: Some("u1".into()),
            ..FilterConfig::default()
        };
        assert!(FilterPlan::build(&owner, &AD_SPEND, &[]).is_err());
        let bad_date = FilterConfig {
            start_date: Some("someday".into()),
            ..FilterConfig::default()
        };
        assert!(matches!(
            FilterPlan::build(&bad_date, &AD_SPEND, &[]),
            Err(ConfigError::InvalidLiteral { what: "date", .. })
        ));
        let bad_number = FilterConfig {
            conditions: vec!["spend > lots".into()],
            ..FilterConfig::default()
        };
        assert!(FilterPlan::build(&bad_number, &AD_SPEND, &[]).is_err());
    }

    #[test]
    fn expression_columns_compare_dynamically() {
        let config = FilterConfig {
            conditions: vec!["margin > 2".into()],
            ..FilterConfig::default()
        };
        let plan = FilterPlan::build(&config, &AD_SPEND, &["margin".to_string()]).unwrap();
        let predicate = &plan.predicates()[0];
        assert!(predicate.matches(Some(&Value::Float(2.5))));
        assert!(!predicate.matches(Some(&Value::Integer(2))));
    }
}
