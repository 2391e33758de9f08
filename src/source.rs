//! Source tables handed over by a table provider.
//!
//! Rows are JSON-like maps. Nested objects from JSON exports are kept under
//! their own key and also flattened into dotted keys (`metrics.clicks`), so a
//! mapping table can name either form.

use std::{collections::HashSet, io::Read};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use heck::ToSnakeCase;
use log::debug;
use serde_json::{Map, Value as JsonValue};

use crate::io_utils;

pub type Row = Map<String, JsonValue>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl SourceTable {
    /// Builds a table from declared headers plus rows. Keys found only in rows
    /// are appended to the header list in order of first appearance.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let mut seen = HashSet::new();
        let mut merged = Vec::with_capacity(headers.len());
        for header in headers {
            if seen.insert(header.clone()) {
                merged.push(header);
            }
        }
        for row in &rows {
            for key in row.keys() {
                if !seen.contains(key) {
                    seen.insert(key.clone());
                    merged.push(key.clone());
                }
            }
        }
        Self {
            headers: merged,
            rows,
        }
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self::new(Vec::new(), rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column set used by the resolver.
    pub fn column_set(&self) -> HashSet<&str> {
        self.headers.iter().map(String::as_str).collect()
    }

    /// Rewrites every header to snake_case. When two headers collapse onto the
    /// same name the first one keeps it and the later column is dropped.
    pub fn normalize_headers(self) -> Self {
        let renamed = self
            .headers
            .iter()
            .map(|header| (header.clone(), header.to_snake_case()))
            .collect::<Vec<_>>();
        let mut kept = HashSet::new();
        let mut headers = Vec::with_capacity(renamed.len());
        let mut mapping = Vec::with_capacity(renamed.len());
        for (original, snake) in renamed {
            if kept.insert(snake.clone()) {
                headers.push(snake.clone());
                mapping.push((original, snake));
            } else {
                debug!("Dropping column '{original}': '{snake}' already taken");
            }
        }
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                let mut normalized = Map::new();
                for (original, snake) in &mapping {
                    if let Some(value) = row.remove(original) {
                        normalized.insert(snake.clone(), value);
                    }
                }
                normalized
            })
            .collect();
        Self { headers, rows }
    }

    /// Reads a delimited file. Every cell arrives as a string; empty cells are
    /// left as empty strings and treated as nulls by the coercer.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader(reader, delimiter, true);
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        let mut rows = Vec::new();
        let mut record = csv::ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .context("Reading CSV record")?
        {
            let cells = io_utils::decode_record(&record, encoding)?;
            let mut row = Map::new();
            for (header, cell) in headers.iter().zip(cells) {
                if !row.contains_key(header) {
                    row.insert(header.clone(), JsonValue::String(cell));
                }
            }
            rows.push(row);
        }
        Ok(Self::new(headers, rows))
    }

    /// Accepts a JSON array of objects, a single object, or an object with a
    /// `data`, `results` or `records` array (common API envelope shapes).
    pub fn from_json_str(text: &str) -> Result<Self> {
        let parsed: JsonValue = serde_json::from_str(text).context("Parsing JSON input")?;
        let records = match parsed {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut object) => {
                match ["data", "results", "records"]
                    .into_iter()
                    .find(|key| matches!(object.get(*key), Some(JsonValue::Array(_))))
                {
                    Some(key) => match object.remove(key) {
                        Some(JsonValue::Array(items)) => items,
                        _ => Vec::new(),
                    },
                    None => vec![JsonValue::Object(object)],
                }
            }
            other => return Err(anyhow!("Expected a JSON array or object, found {other}")),
        };
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| match record {
                JsonValue::Object(object) => Ok(flatten_object(object)),
                other => Err(anyhow!("Record {} is not a JSON object: {other}", idx + 1)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rows(rows))
    }

    /// One JSON object per line; blank lines are skipped.
    pub fn from_ndjson_str(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let parsed: JsonValue = serde_json::from_str(trimmed)
                .with_context(|| format!("Parsing NDJSON line {}", idx + 1))?;
            match parsed {
                JsonValue::Object(object) => rows.push(flatten_object(object)),
                other => return Err(anyhow!("Line {} is not a JSON object: {other}", idx + 1)),
            }
        }
        Ok(Self::from_rows(rows))
    }
}

/// Flattens nested objects into dotted keys while keeping each nested object
/// under its own key too.
pub fn flatten_object(object: Map<String, JsonValue>) -> Row {
    let mut flat = Map::new();
    flatten_into(&mut flat, None, object);
    flat
}

fn flatten_into(flat: &mut Row, prefix: Option<&str>, object: Map<String, JsonValue>) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        if let JsonValue::Object(children) = &value {
            flatten_into(flat, Some(&name), children.clone());
        }
        flat.entry(name).or_insert(value);
    }
}
