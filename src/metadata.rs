//! Run metadata and the sinks that receive it.

use std::{
    collections::{BTreeMap, HashSet},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    canonical::FieldType,
    frame::{CanonicalFrame, ColumnOrigin},
    platform::{Platform, ResourceType, StandardizerKind},
};

/// Descriptive statistics for one standardizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub asset: String,
    pub group_name: Option<String>,
    pub platform: Platform,
    pub resource: ResourceType,
    pub kind: StandardizerKind,
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_filtered: usize,
    /// Group count when aggregation ran.
    pub rows_aggregated_into: Option<usize>,
    /// Canonical field → source column.
    pub resolved_fields: BTreeMap<String, String>,
    pub defaulted_fields: Vec<String>,
    pub derived_fields: Vec<String>,
    pub null_counts: BTreeMap<String, usize>,
    pub unique_counts: BTreeMap<String, usize>,
    pub sums: BTreeMap<String, f64>,
    pub content_hash: String,
}

/// Row counts gathered by the engine while it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub before: usize,
    pub filtered: usize,
    pub aggregated_into: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct RunIdentity<'a> {
    pub asset: &'a str,
    pub group_name: Option<&'a str>,
    pub platform: Platform,
    pub resource: ResourceType,
}

impl RunMetadata {
    pub fn collect(
        identity: RunIdentity<'_>,
        frame: &CanonicalFrame,
        counts: RowCounts,
        resolved_fields: BTreeMap<String, String>,
        defaulted_fields: Vec<String>,
    ) -> Result<Self> {
        let mut null_counts = BTreeMap::new();
        let mut unique_counts = BTreeMap::new();
        let mut sums = BTreeMap::new();
        for (idx, column) in frame.columns.iter().enumerate() {
            let nulls = frame.column_values(idx).filter(|v| v.is_none()).count();
            null_counts.insert(column.name.clone(), nulls);
            match column.field_type {
                Some(FieldType::Identifier) => {
                    let distinct = frame
                        .column_values(idx)
                        .flatten()
                        .map(|value| value.as_display())
                        .collect::<HashSet<_>>();
                    unique_counts.insert(column.name.clone(), distinct.len());
                }
                Some(field_type) if field_type.is_additive() => {
                    let total = frame
                        .column_values(idx)
                        .flatten()
                        .filter_map(|value| value.as_f64())
                        .sum::<f64>();
                    sums.insert(column.name.clone(), total);
                }
                _ => {}
            }
        }
        let derived_fields = frame
            .columns
            .iter()
            .filter(|c| matches!(c.origin, ColumnOrigin::Derived | ColumnOrigin::Expression))
            .map(|c| c.name.clone())
            .collect();
        Ok(Self {
            asset: identity.asset.to_string(),
            group_name: identity.group_name.map(str::to_string),
            platform: identity.platform,
            resource: identity.resource,
            kind: identity.platform.kind(),
            rows_before: counts.before,
            rows_after: frame.len(),
            rows_filtered: counts.filtered,
            rows_aggregated_into: counts.aggregated_into,
            resolved_fields,
            defaulted_fields,
            derived_fields,
            null_counts,
            unique_counts,
            sums,
            content_hash: frame.content_hash()?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating metadata file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing metadata JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening metadata file {path:?}"))?;
        let reader = BufReader::new(file);
        let metadata = serde_json::from_reader(reader).context("Parsing metadata JSON")?;
        Ok(metadata)
    }
}

/// Receives the metadata of each run, in place of the host's asset catalog.
pub trait MetadataSink {
    fn record(&mut self, asset: &str, metadata: &RunMetadata) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct CollectingSink {
    pub records: Vec<(String, RunMetadata)>,
}

impl MetadataSink for CollectingSink {
    fn record(&mut self, asset: &str, metadata: &RunMetadata) -> Result<()> {
        self.records.push((asset.to_string(), metadata.clone()));
        Ok(())
    }
}

#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSink for JsonFileSink {
    fn record(&mut self, asset: &str, metadata: &RunMetadata) -> Result<()> {
        metadata
            .save(&self.path)
            .with_context(|| format!("Recording metadata for '{asset}'"))?;
        info!("Metadata for '{asset}' written to {:?}", self.path);
        Ok(())
    }
}

/// Logs a one-line summary at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl MetadataSink for LogSink {
    fn record(&mut self, asset: &str, metadata: &RunMetadata) -> Result<()> {
        info!(
            "{asset}: {} -> {} row(s), {} resolved, {} defaulted, hash {}",
            metadata.rows_before,
            metadata.rows_after,
            metadata.resolved_fields.len(),
            metadata.defaulted_fields.len(),
            &metadata.content_hash[..12.min(metadata.content_hash.len())]
        );
        Ok(())
    }
}
