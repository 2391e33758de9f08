//! Table providers supply the upstream tables a standardizer reads.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    io_utils::{self, DataFormat},
    retry::{RetryPolicy, Sleeper, ThreadSleeper, classify_io_result},
    source::SourceTable,
};

pub trait TableProvider {
    /// The named table, or `None` when the provider does not have it.
    fn table(&self, name: &str) -> Result<Option<SourceTable>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    tables: BTreeMap<String, SourceTable>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, table: SourceTable) -> Self {
        self.insert(name, table);
        self
    }

    pub fn insert(&mut self, name: &str, table: SourceTable) {
        self.tables.insert(name.to_string(), table);
    }
}

impl TableProvider for InMemoryProvider {
    fn table(&self, name: &str) -> Result<Option<SourceTable>> {
        Ok(self.tables.get(name).cloned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    pub path: PathBuf,
    pub format: DataFormat,
    pub delimiter: u8,
}

/// Maps table names to files. Reads go through the retry policy.
pub struct FileProvider {
    sources: BTreeMap<String, FileSource>,
    encoding: &'static Encoding,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl FileProvider {
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
            encoding: UTF_8,
            retry: RetryPolicy::default(),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy, sleeper: Box<dyn Sleeper>) -> Self {
        self.retry = retry;
        self.sleeper = sleeper;
        self
    }

    pub fn add(&mut self, name: &str, path: &Path, delimiter: Option<u8>) -> Result<()> {
        if self.sources.contains_key(name) {
            bail!("Table '{name}' was given more than once");
        }
        let source = FileSource {
            path: path.to_path_buf(),
            format: DataFormat::from_path(path),
            delimiter: io_utils::resolve_input_delimiter(path, delimiter),
        };
        debug!("Table '{name}' -> {source:?}");
        self.sources.insert(name.to_string(), source);
        Ok(())
    }

    /// Registers `name=path` specs; a bare path is registered under `default_name`.
    pub fn from_specs(specs: &[String], default_name: &str, delimiter: Option<u8>) -> Result<Self> {
        let mut provider = Self::new();
        for spec in specs {
            let (name, path) = parse_input_spec(spec, default_name)?;
            provider.add(&name, &path, delimiter)?;
        }
        Ok(provider)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if io_utils::is_dash(path) {
            let mut bytes = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("Reading stdin")?;
            return Ok(bytes);
        }
        self.retry
            .run(self.sleeper.as_ref(), |attempt| {
                debug!("Reading {path:?} (attempt {attempt})");
                classify_io_result(fs::read(path))
            })
            .with_context(|| format!("Reading input file {path:?}"))
    }
}

impl Default for FileProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TableProvider for FileProvider {
    fn table(&self, name: &str) -> Result<Option<SourceTable>> {
        let Some(source) = self.sources.get(name) else {
            return Ok(None);
        };
        let bytes = self.read_bytes(&source.path)?;
        let table = match source.format {
            DataFormat::Csv => SourceTable::from_csv_reader(bytes.as_slice(), source.delimiter, self.encoding),
            DataFormat::Json => SourceTable::from_json_str(&io_utils::decode_bytes(&bytes, self.encoding)?),
            DataFormat::Ndjson => {
                SourceTable::from_ndjson_str(&io_utils::decode_bytes(&bytes, self.encoding)?)
            }
        }
        .with_context(|| format!("Loading table '{name}' from {:?}", source.path))?;
        info!(
            "Loaded table '{name}' from {:?}: {} row(s), {} column(s)",
            source.path,
            table.len(),
            table.headers().len()
        );
        Ok(Some(table))
    }
}

pub fn parse_input_spec(spec: &str, default_name: &str) -> Result<(String, PathBuf)> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        bail!("Input specification is empty");
    }
    match trimmed.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        Some(_) => Err(anyhow!("Input specification '{spec}' must be name=path")),
        None => Ok((default_name.to_string(), PathBuf::from(trimmed))),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::retry::RetryPolicy;

    #[test]
    fn input_specs_default_to_the_upstream_name() {
        assert_eq!(
            parse_input_spec("data/ads.csv", "source").unwrap(),
            ("source".to_string(), PathBuf::from("data/ads.csv"))
        );
        assert_eq!(
            parse_input_spec("tickets=t.json", "source").unwrap(),
            ("tickets".to_string(), PathBuf::from("t.json"))
        );
        assert!(parse_input_spec("=t.json", "source").is_err());
    }

    #[test]
    fn file_provider_reads_csv_and_json() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("ads.csv");
        fs::write(&csv_path, "campaign_id,clicks\nc1,3\n").unwrap();
        let json_path = dir.path().join("tickets.json");
        fs::write(&json_path, r#"[{"id": 1, "via": {"channel": "email"}}]"#).unwrap();

        let mut provider = FileProvider::new().with_retry(RetryPolicy::no_retry(), Box::new(ThreadSleeper));
        provider.add("ads", &csv_path, None).unwrap();
        provider.add("tickets", &json_path, None).unwrap();
        assert!(provider.add("ads", &csv_path, None).is_err());

        let ads = provider.table("ads").unwrap().unwrap();
        assert_eq!(ads.rows()[0]["clicks"], json!("3"));
        let tickets = provider.table("tickets").unwrap().unwrap();
        assert_eq!(tickets.rows()[0]["via.channel"], json!("email"));
        assert!(provider.table("missing").unwrap().is_none());
    }

    #[test]
    fn missing_files_fail_without_retrying_forever() {
        let dir = tempdir().unwrap();
        let mut provider = FileProvider::new();
        provider
            .add("source", &dir.path().join("absent.csv"), None)
            .unwrap();
        assert!(provider.table("source").is_err());
    }

    #[test]
    fn in_memory_provider_returns_clones() {
        let provider = InMemoryProvider::new().with_table("source", SourceTable::default());
        assert!(provider.table("source").unwrap().is_some());
        assert!(provider.table("other").unwrap().is_none());
    }
}
