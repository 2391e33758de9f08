//! The standardization engine.
//!
//! Stages run over the whole table, strictly in order: resolve, coerce,
//! default, derive, filter, aggregate. Configuration problems surface from
//! [`Standardizer::new`] before any row is read.

use std::{borrow::Cow, collections::BTreeMap, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};

use crate::{
    aggregate,
    canonical::{CanonicalSchema, PLATFORM_FIELD},
    cli::StandardizeArgs,
    coerce,
    config::StandardizerConfig,
    data::Value,
    defaults,
    derive::{self, DerivedColumn},
    error::ConfigError,
    filter::FilterPlan,
    frame::CanonicalFrame,
    io_utils::{self, DataFormat},
    mapping::MappingTable,
    metadata::{JsonFileSink, LogSink, MetadataSink, RowCounts, RunIdentity, RunMetadata},
    provider::{FileProvider, TableProvider},
    resolve,
    source::SourceTable,
    table,
};

#[derive(Debug, Clone)]
pub struct StandardizeOutput {
    pub frame: CanonicalFrame,
    pub metadata: RunMetadata,
}

/// One validated standardizer instance.
#[derive(Debug, Clone)]
pub struct Standardizer {
    mapping: MappingTable,
    overrides: BTreeMap<String, String>,
    derives: Vec<DerivedColumn>,
    filters: FilterPlan,
    group_by: Option<Vec<String>>,
    normalize_headers: bool,
    upstream: String,
    asset: String,
    group_name: Option<String>,
}

impl Standardizer {
    pub fn new(config: &StandardizerConfig) -> Result<Self, ConfigError> {
        let platform = config.platform.ok_or(ConfigError::MissingSetting("platform"))?;
        let resource = config.resource.ok_or(ConfigError::MissingSetting("resource"))?;
        let mapping = MappingTable::lookup(platform, resource)?;
        let schema = mapping.schema;

        for field in config.field_overrides.keys() {
            if schema.field(field).is_none() {
                return Err(ConfigError::UnknownOverrideField {
                    field: field.clone(),
                });
            }
        }

        let mut available = schema
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let derives = derive::parse_derived_columns(&config.derive)?;
        for derive in &derives {
            derive.validate(&available)?;
            available.push(derive.name.clone());
        }
        let expression_names = derives
            .iter()
            .map(|d| d.name.clone())
            .collect::<Vec<_>>();

        let filters = FilterPlan::build(&config.filters, schema, &expression_names)?;

        let group_by = if config.aggregate.enabled {
            let keys: Vec<String> = if config.aggregate.group_by.is_empty() {
                schema
                    .default_group_by
                    .iter()
                    .map(|key| key.to_string())
                    .collect()
            } else {
                config.aggregate.group_by.clone()
            };
            if let Some(unknown) = keys.iter().find(|key| !available.contains(key)) {
                return Err(ConfigError::UnknownGroupKey {
                    field: unknown.clone(),
                });
            }
            Some(keys)
        } else {
            None
        };

        let asset = config
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{platform}_{resource}"));
        debug!(
            "Configured '{asset}': {} override(s), {} derive(s), {} predicate(s), aggregate {:?}",
            config.field_overrides.len(),
            derives.len(),
            filters.predicates().len(),
            group_by
        );
        Ok(Self {
            mapping,
            overrides: config.field_overrides.clone(),
            derives,
            filters,
            group_by,
            normalize_headers: config.normalize_headers,
            upstream: config.upstream().to_string(),
            asset,
            group_name: config.group_name.clone(),
        })
    }

    pub fn mapping(&self) -> &MappingTable {
        &self.mapping
    }

    pub fn schema(&self) -> &'static CanonicalSchema {
        self.mapping.schema
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Runs every stage over `source`.
    pub fn standardize(&self, source: &SourceTable) -> Result<StandardizeOutput> {
        let source = if self.normalize_headers {
            Cow::Owned(source.clone().normalize_headers())
        } else {
            Cow::Borrowed(source)
        };
        let schema = self.schema();
        let platform = self.mapping.platform;

        let resolution = resolve::resolve_table(&self.mapping, &source, &self.overrides);
        info!(
            "{platform}/{}: resolved {} of {} field(s) from {} source column(s)",
            self.mapping.resource,
            schema.fields.len() - resolution.unresolved().len(),
            schema.fields.len(),
            source.headers().len()
        );

        let mut frame = self.coerce_frame(&source, &resolution);
        let defaulted = defaults::fill_defaults(&mut frame, &resolution);
        if !defaulted.is_empty() {
            debug!("Defaulted field(s): {}", defaulted.join(", "));
        }

        self.derive(&mut frame);

        let rows_before = frame.len();
        let rows_filtered = self.filters.apply(&mut frame);

        let mut aggregated_into = None;
        if let Some(keys) = &self.group_by {
            frame = aggregate::aggregate(&frame, keys);
            self.derive(&mut frame);
            aggregated_into = Some(frame.len());
        }

        let metadata = RunMetadata::collect(
            RunIdentity {
                asset: &self.asset,
                group_name: self.group_name.as_deref(),
                platform,
                resource: self.mapping.resource,
            },
            &frame,
            RowCounts {
                before: rows_before,
                filtered: rows_filtered,
                aggregated_into,
            },
            resolution.source_map(),
            defaulted,
        )?;
        info!(
            "'{}': {} row(s) in, {} row(s) out",
            self.asset,
            rows_before,
            frame.len()
        );
        Ok(StandardizeOutput { frame, metadata })
    }

    /// Fetches the upstream table, standardizes it and records metadata.
    pub fn run(
        &self,
        provider: &dyn TableProvider,
        sink: &mut dyn MetadataSink,
    ) -> Result<CanonicalFrame> {
        let source = provider
            .table(&self.upstream)?
            .ok_or_else(|| ConfigError::MissingUpstream {
                name: self.upstream.clone(),
            })?;
        let output = self.standardize(&source)?;
        sink.record(&self.asset, &output.metadata)?;
        Ok(output.frame)
    }

    fn coerce_frame(&self, source: &SourceTable, resolution: &resolve::Resolution) -> CanonicalFrame {
        let mut frame = CanonicalFrame::empty(self.schema());
        frame.push_null_rows(source.len());
        let platform = Value::String(self.mapping.platform.as_str().to_string());
        if let Some(idx) = frame.column_index(PLATFORM_FIELD) {
            for row in &mut frame.rows {
                row[idx] = Some(platform.clone());
            }
        }
        for field in self.schema().fields {
            let Some(resolved) = resolution.column_for(field.name) else {
                continue;
            };
            let Some(idx) = frame.column_index(field.name) else {
                continue;
            };
            let (values, rejected) = coerce::coerce_column(
                source.rows(),
                &resolved.column,
                field.field_type,
                resolved.transform,
            );
            if rejected > 0 {
                if rejected == source.len() {
                    warn!(
                        "Column '{}' could not be read as {} for '{}'; all values are null",
                        resolved.column, field.field_type, field.name
                    );
                } else {
                    debug!(
                        "{rejected} cell(s) of '{}' could not be read as {}",
                        resolved.column, field.field_type
                    );
                }
            }
            for (row, value) in frame.rows.iter_mut().zip(values) {
                row[idx] = value;
            }
        }
        frame
    }

    fn derive(&self, frame: &mut CanonicalFrame) {
        derive::apply_metrics(frame, self.schema());
        derive::apply_expressions(frame, &self.derives);
    }
}

/// Builds a configuration from an optional YAML file overlaid with flags.
pub fn config_from_args(args: &StandardizeArgs) -> Result<StandardizerConfig> {
    let mut config = match &args.config {
        Some(path) => StandardizerConfig::load(path)?,
        None => StandardizerConfig::default(),
    };
    if args.platform.is_some() {
        config.platform = args.platform;
    }
    if args.resource.is_some() {
        config.resource = args.resource;
    }
    if let Some(upstream) = &args.upstream {
        config.upstream = Some(upstream.clone());
    }
    if let Some(name) = &args.output_name {
        config.output_name = Some(name.clone());
    }
    if let Some(name) = &args.group_name {
        config.group_name = Some(name.clone());
    }
    for spec in &args.overrides {
        let (field, column) = spec
            .split_once('=')
            .map(|(f, c)| (f.trim(), c.trim()))
            .filter(|(f, c)| !f.is_empty() && !c.is_empty())
            .ok_or_else(|| anyhow!("Override '{spec}' must be field=column"))?;
        config
            .field_overrides
            .insert(field.to_string(), column.to_string());
    }
    config.filters.status.extend(
        args.statuses
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    );
    if let Some(owner) = &args.owner {
        config.filters.owner = Some(owner.clone());
    }
    if let Some(field) = &args.date_field {
        config.filters.date_field = Some(field.clone());
    }
    if let Some(start) = &args.start_date {
        config.filters.start_date = Some(start.clone());
    }
    if let Some(end) = &args.end_date {
        config.filters.end_date = Some(end.clone());
    }
    config.filters.conditions.extend(args.filters.iter().cloned());
    config.derive.extend(args.derives.iter().cloned());
    if args.aggregate {
        config.aggregate.enabled = true;
    }
    if !args.group_by.is_empty() {
        config.aggregate.group_by = args
            .group_by
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if args.normalize_headers {
        config.normalize_headers = true;
    }
    Ok(config)
}

pub fn execute(args: &StandardizeArgs) -> Result<()> {
    let config = config_from_args(args)?;
    let standardizer = Standardizer::new(&config)?;
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    let writing_to_stdout = output_path.is_none_or(io_utils::is_dash);
    if args.table && !writing_to_stdout {
        bail!("--table only applies when writing to stdout");
    }

    let provider = FileProvider::from_specs(&args.inputs, standardizer.upstream(), args.delimiter)?
        .with_encoding(input_encoding);
    info!(
        "Standardizing '{}' as {}/{} -> {}",
        standardizer.upstream(),
        standardizer.mapping().platform,
        standardizer.mapping().resource,
        output_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into())
    );

    let mut json_sink;
    let mut log_sink = LogSink;
    let sink: &mut dyn MetadataSink = match &args.metadata {
        Some(path) => {
            json_sink = JsonFileSink::new(path);
            &mut json_sink
        }
        None => &mut log_sink,
    };
    let frame = standardizer
        .run(&provider, sink)
        .with_context(|| format!("Standardizing '{}'", standardizer.asset()))?;

    if args.table && writing_to_stdout {
        table::print_clipped(&frame.headers(), &frame.display_rows(), table::MAX_CELL_WIDTH);
        return Ok(());
    }
    write_frame(&frame, output_path, args.output_delimiter, output_encoding)
}

fn write_frame(
    frame: &CanonicalFrame,
    path: Option<&Path>,
    delimiter: Option<u8>,
    encoding: &'static encoding_rs::Encoding,
) -> Result<()> {
    let format = path
        .filter(|p| !io_utils::is_dash(p))
        .map(DataFormat::from_path)
        .unwrap_or(DataFormat::Csv);
    let rendered = match format {
        DataFormat::Csv => {
            frame.to_csv_string(io_utils::resolve_output_delimiter(path, delimiter))?
        }
        DataFormat::Json => {
            let mut text = frame.to_json_string()?;
            text.push('\n');
            text
        }
        DataFormat::Ndjson => frame.to_ndjson_string()?,
    };
    io_utils::write_output(path, &rendered, encoding)
}
