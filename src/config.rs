//! Standardizer configuration.
//!
//! One configuration describes one standardizer instance. It is usually read
//! from YAML and then overlaid with command-line flags.

use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::platform::{Platform, ResourceType};

pub const DEFAULT_UPSTREAM: &str = "source";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardizerConfig {
    pub platform: Option<Platform>,
    pub resource: Option<ResourceType>,
    /// Name of the table the provider is asked for.
    pub upstream: Option<String>,
    /// Asset name recorded with the metadata. Defaults to `<platform>_<resource>`.
    pub output_name: Option<String>,
    pub group_name: Option<String>,
    /// Canonical field → source column, tried before the mapping table.
    pub field_overrides: BTreeMap<String, String>,
    pub filters: FilterConfig,
    /// `name=expression` columns appended after the built-in metrics.
    pub derive: Vec<String>,
    pub aggregate: AggregateConfig,
    /// Rewrite source headers to snake_case before resolution.
    pub normalize_headers: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Keep rows whose status is one of these (case-insensitive).
    pub status: Vec<String>,
    pub owner: Option<String>,
    /// Date or datetime field for the range filter; the schema's primary date otherwise.
    pub date_field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// `field op value` conditions, e.g. `spend > 10`.
    pub conditions: Vec<String>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.owner.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.conditions.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregateConfig {
    pub enabled: bool,
    /// Grouping keys; the schema's default keys when empty.
    pub group_by: Vec<String>,
}

impl StandardizerConfig {
    pub fn new(platform: Platform, resource: ResourceType) -> Self {
        Self {
            platform: Some(platform),
            resource: Some(resource),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Parsing standardizer configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .with_context(|| format!("Reading config file {path:?}"))?;
        Self::from_yaml_str(&buf).with_context(|| format!("Loading {path:?}"))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing standardizer configuration")
    }

    pub fn upstream(&self) -> &str {
        self.upstream.as_deref().unwrap_or(DEFAULT_UPSTREAM)
    }
}
