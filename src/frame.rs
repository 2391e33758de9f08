//! Canonical frames.
//!
//! A frame always carries the full canonical column list, even with zero
//! rows. Cells are `Option<Value>`; `None` is null.

use std::io::Write;

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

use crate::{
    canonical::{CanonicalSchema, FieldType, PLATFORM_FIELD},
    data::Value,
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    Platform,
    Mapped,
    Derived,
    /// User-defined derive expression.
    Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    /// `None` for expression columns, whose type depends on the result.
    pub field_type: Option<FieldType>,
    pub origin: ColumnOrigin,
}

pub type CanonicalRow = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFrame {
    pub columns: Vec<FrameColumn>,
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalFrame {
    /// Empty frame with `platform`, mapped and derived columns of the schema.
    pub fn empty(schema: &CanonicalSchema) -> Self {
        let mut columns = Vec::with_capacity(schema.fields.len() + schema.derived.len() + 1);
        columns.push(FrameColumn {
            name: PLATFORM_FIELD.to_string(),
            field_type: Some(FieldType::Text),
            origin: ColumnOrigin::Platform,
        });
        columns.extend(schema.fields.iter().map(|field| FrameColumn {
            name: field.name.to_string(),
            field_type: Some(field.field_type),
            origin: ColumnOrigin::Mapped,
        }));
        columns.extend(schema.derived.iter().map(|metric| FrameColumn {
            name: metric.name().to_string(),
            field_type: Some(metric.output_type()),
            origin: ColumnOrigin::Derived,
        }));
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_expression_column(&mut self, name: &str) {
        self.columns.push(FrameColumn {
            name: name.to_string(),
            field_type: None,
            origin: ColumnOrigin::Expression,
        });
        for row in &mut self.rows {
            row.push(None);
        }
    }

    /// Appends `count` rows with every cell null.
    pub fn push_null_rows(&mut self, count: usize) {
        let width = self.columns.len();
        self.rows
            .extend(std::iter::repeat_with(|| vec![None; width]).take(count));
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&FrameColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by column name.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(Option::as_ref))
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut writer = io_utils::csv_writer(writer, delimiter);
        writer
            .write_record(self.columns.iter().map(|c| c.name.as_str()))
            .context("Writing CSV headers")?;
        for row in self.display_rows() {
            writer.write_record(&row).context("Writing CSV row")?;
        }
        writer.flush().context("Flushing CSV output")?;
        Ok(())
    }

    pub fn to_csv_string(&self, delimiter: u8) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, delimiter)?;
        String::from_utf8(buffer).context("CSV output is not valid UTF-8")
    }

    /// Rows as JSON objects whose keys follow the column order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|row| Record {
            columns: &self.columns,
            row,
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        let records = self.records().collect::<Vec<_>>();
        serde_json::to_string_pretty(&records).context("Serializing canonical rows")
    }

    pub fn to_ndjson_string(&self) -> Result<String> {
        let mut output = String::new();
        for record in self.records() {
            output.push_str(&serde_json::to_string(&record).context("Serializing canonical row")?);
            output.push('\n');
        }
        Ok(output)
    }

    /// SHA-256 of the comma-separated rendering, hex encoded.
    pub fn content_hash(&self) -> Result<String> {
        let rendered = self.to_csv_string(io_utils::DEFAULT_CSV_DELIMITER)?;
        let digest = Sha256::digest(rendered.as_bytes());
        Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}

/// One frame row borrowed for serialization.
pub struct Record<'a> {
    columns: &'a [FrameColumn],
    row: &'a [Option<Value>],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.row) {
            let value = cell.as_ref().map(Value::to_json).unwrap_or(JsonValue::Null);
            map.serialize_entry(&column.name, &value)?;
        }
        map.end()
    }
}
