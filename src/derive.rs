use std::collections::HashSet;

use chrono::NaiveDateTime;
use evalexpr::{Node, Value as EvalValue, build_operator_tree};
use log::debug;

use crate::{
    canonical::{CanonicalSchema, DerivedMetric},
    data::Value,
    error::ConfigError,
    expr,
    frame::{CanonicalFrame, ColumnOrigin},
};

/// `numerator / denominator * multiplier`, or 0 when the denominator is
/// missing or not positive.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>, multiplier: f64) -> f64 {
    match denominator {
        Some(denominator) if denominator > 0.0 => {
            numerator.unwrap_or(0.0) / denominator * multiplier
        }
        _ => 0.0,
    }
}

pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

fn lookup<'a>(frame: &CanonicalFrame, row: &'a [Option<Value>], name: &str) -> Option<&'a Value> {
    frame.column_index(name).and_then(|idx| row[idx].as_ref())
}

pub fn compute_metric(
    metric: &DerivedMetric,
    frame: &CanonicalFrame,
    row: &[Option<Value>],
) -> Option<Value> {
    match metric {
        DerivedMetric::Ratio {
            numerator,
            denominator,
            multiplier,
            ..
        } => Some(Value::Float(safe_ratio(
            lookup(frame, row, numerator).and_then(Value::as_f64),
            lookup(frame, row, denominator).and_then(Value::as_f64),
            *multiplier,
        ))),
        DerivedMetric::HoursBetween { start, end, .. } => {
            let start = lookup(frame, row, start)?.as_datetime()?;
            let end = lookup(frame, row, end)?.as_datetime()?;
            Some(Value::Float(hours_between(start, end)))
        }
        DerivedMetric::DaysBetween { start, end, .. } => {
            let start = lookup(frame, row, start)?.as_date()?;
            let end = lookup(frame, row, end)?.as_date()?;
            Some(Value::Float((end - start).num_days() as f64))
        }
        DerivedMetric::DateOf { source, .. } => {
            lookup(frame, row, source)?.as_date().map(Value::Date)
        }
    }
}

/// Computes every built-in metric of the schema on every row, overwriting
/// previous values.
pub fn apply_metrics(frame: &mut CanonicalFrame, schema: &CanonicalSchema) {
    for metric in schema.derived {
        let Some(target) = frame.column_index(metric.name()) else {
            continue;
        };
        let values = frame
            .rows
            .iter()
            .map(|row| compute_metric(metric, frame, row))
            .collect::<Vec<_>>();
        for (row, value) in frame.rows.iter_mut().zip(values) {
            row[target] = value;
        }
        debug!("Computed '{}' = {}", metric.name(), metric.describe());
    }
}

/// A user-defined `name=expression` column.
#[derive(Debug, Clone)]
pub struct DerivedColumn {
    pub name: String,
    pub expression: String,
    tree: Node,
}

impl DerivedColumn {
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let mut parts = spec.splitn(2, '=');
        let name = parts
            .next()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::InvalidDerive {
                name: spec.trim().to_string(),
                reason: "missing a name".into(),
            })?;
        let expression = parts
            .next()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::InvalidDerive {
                name: name.to_string(),
                reason: "missing an expression".into(),
            })?;
        Self::new(name, expression)
    }

    pub fn new(name: &str, expression: &str) -> Result<Self, ConfigError> {
        if !is_identifier(name) {
            return Err(ConfigError::InvalidDerive {
                name: name.to_string(),
                reason: "name must be a snake_case identifier".into(),
            });
        }
        let tree: Node = build_operator_tree(expression).map_err(|err| ConfigError::InvalidDerive {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
        Ok(DerivedColumn {
            name: name.to_string(),
            expression: expression.to_string(),
            tree,
        })
    }

    /// Variables the expression reads.
    pub fn inputs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tree
            .iter_variable_identifiers()
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Checks that the name is free and every input exists in `available`.
    pub fn validate(&self, available: &[String]) -> Result<(), ConfigError> {
        if available.iter().any(|column| column == &self.name) {
            return Err(ConfigError::DuplicateColumn {
                name: self.name.clone(),
            });
        }
        if let Some(missing) = self
            .inputs()
            .into_iter()
            .find(|input| !available.contains(input))
        {
            return Err(ConfigError::InvalidDerive {
                name: self.name.clone(),
                reason: format!("unknown field '{missing}'"),
            });
        }
        Ok(())
    }

    /// Evaluates against one row; any evaluation error yields null.
    pub fn evaluate(&self, frame: &CanonicalFrame, row: &[Option<Value>]) -> Option<Value> {
        let context = match expr::build_context(&frame.columns, row) {
            Ok(context) => context,
            Err(err) => {
                debug!("Skipping '{}': {err:#}", self.name);
                return None;
            }
        };
        match self.tree.eval_with_context(&context) {
            Ok(result) => from_eval(result),
            Err(err) => {
                debug!("'{}' evaluated to null: {err}", self.name);
                None
            }
        }
    }
}

fn from_eval(result: EvalValue) -> Option<Value> {
    match result {
        EvalValue::String(s) => Some(Value::String(s)),
        EvalValue::Int(i) => Some(Value::Integer(i)),
        EvalValue::Float(f) if f.is_finite() => Some(Value::Float(f)),
        EvalValue::Float(_) => None,
        EvalValue::Boolean(b) => Some(Value::String(b.to_string())),
        EvalValue::Tuple(values) => Some(Value::String(
            values
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("|"),
        )),
        EvalValue::Empty => None,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn parse_derived_columns(specs: &[String]) -> Result<Vec<DerivedColumn>, ConfigError> {
    specs
        .iter()
        .map(|spec| DerivedColumn::parse(spec))
        .collect()
}

/// Appends one column per derive, evaluated in order so later derives can
/// read earlier ones. Existing expression values are recomputed in place.
pub fn apply_expressions(frame: &mut CanonicalFrame, derives: &[DerivedColumn]) {
    for derive in derives {
        let target = match frame.column_index(&derive.name) {
            Some(idx) if frame.columns[idx].origin == ColumnOrigin::Expression => idx,
            Some(_) => continue,
            None => {
                frame.push_expression_column(&derive.name);
                frame.columns.len() - 1
            }
        };
        let values = frame
            .rows
            .iter()
            .map(|row| derive.evaluate(frame, row))
            .collect::<Vec<_>>();
        for (row, value) in frame.rows.iter_mut().zip(values) {
            row[target] = value;
        }
    }
}
