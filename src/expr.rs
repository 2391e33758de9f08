//! Evaluation context for derive expressions.
//!
//! Canonical fields are bound by name. Nulls are left unbound, so an
//! expression that touches a null field fails for that row only.

use anyhow::{Context, Result};
use evalexpr::{
    ContextWithMutableFunctions, ContextWithMutableVariables, Function, HashMapContext,
    Value as EvalValue,
};

use crate::{
    data::{Value, parse_naive_date, parse_naive_datetime, value_to_evalexpr},
    derive,
    frame::FrameColumn,
};

fn register_temporal_functions(context: &mut HashMapContext) -> Result<()> {
    context
        .set_function(
            "date_diff_days".into(),
            Function::new(|arguments| {
                let args = expect_args(arguments, 2, "date_diff_days")?;
                let end = parse_date_arg(&args[0])?;
                let start = parse_date_arg(&args[1])?;
                Ok(EvalValue::Int((end - start).num_days()))
            }),
        )
        .map_err(anyhow::Error::from)?;

    context
        .set_function(
            "hours_between".into(),
            Function::new(|arguments| {
                let args = expect_args(arguments, 2, "hours_between")?;
                let start = parse_datetime_arg(&args[0])?;
                let end = parse_datetime_arg(&args[1])?;
                Ok(EvalValue::Float(derive::hours_between(start, end)))
            }),
        )
        .map_err(anyhow::Error::from)?;

    Ok(())
}

fn expect_args(
    arguments: &EvalValue,
    expected: usize,
    name: &str,
) -> Result<Vec<EvalValue>, evalexpr::EvalexprError> {
    match arguments {
        EvalValue::Tuple(values) => {
            if values.len() != expected {
                return Err(evalexpr::EvalexprError::wrong_function_argument_amount(
                    values.len(),
                    expected,
                ));
            }
            Ok(values.clone())
        }
        _ => Err(eval_error(&format!(
            "{name} expects {expected} arguments provided as a tuple"
        ))),
    }
}

fn eval_error(message: &str) -> evalexpr::EvalexprError {
    evalexpr::EvalexprError::CustomMessage(message.to_string())
}

fn parse_date_arg(value: &EvalValue) -> Result<chrono::NaiveDate, evalexpr::EvalexprError> {
    let raw = expect_string(value, "date")?;
    parse_naive_date(raw)
        .or_else(|_| parse_naive_datetime(raw).map(|dt| dt.date()))
        .map_err(|err| eval_error(&err.to_string()))
}

fn parse_datetime_arg(value: &EvalValue) -> Result<chrono::NaiveDateTime, evalexpr::EvalexprError> {
    let raw = expect_string(value, "datetime")?;
    parse_naive_datetime(raw).map_err(|err| eval_error(&err.to_string()))
}

fn expect_string<'a>(value: &'a EvalValue, name: &str) -> Result<&'a str, evalexpr::EvalexprError> {
    if let EvalValue::String(s) = value {
        Ok(s)
    } else {
        Err(eval_error(&format!("Expected string for {name}")))
    }
}

/// Builds the context for one canonical row.
pub fn build_context(columns: &[FrameColumn], row: &[Option<Value>]) -> Result<HashMapContext> {
    let mut context = HashMapContext::new();
    register_temporal_functions(&mut context)?;
    for (column, cell) in columns.iter().zip(row) {
        if let Some(value) = cell {
            context
                .set_value(column.name.clone(), value_to_evalexpr(value))
                .with_context(|| format!("Binding column '{}'", column.name))?;
        }
    }
    Ok(context)
}
