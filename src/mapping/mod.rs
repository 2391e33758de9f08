//! Mapping tables.
//!
//! A mapping table lists, for each canonical field, the source columns that
//! may carry it in priority order. Tables are static and selected by a match
//! on the `(Platform, ResourceType)` pair; a pair without a table is a
//! configuration error.

macro_rules! col {
    ($column:literal) => {
        $crate::mapping::Candidate {
            column: $column,
            transform: None,
        }
    };
    ($column:literal, $transform:expr) => {
        $crate::mapping::Candidate {
            column: $column,
            transform: Some($transform),
        }
    };
}

macro_rules! fields {
    ($($field:literal => [$($candidate:expr),+ $(,)?]),+ $(,)?) => {
        &[$($crate::mapping::FieldMapping {
            field: $field,
            candidates: &[$($candidate),+],
        }),+]
    };
}

mod ad_spend;
mod crm;
mod ecommerce;
mod events;
mod support;

use std::fmt;

use crate::{
    canonical::{self, CanonicalSchema},
    error::ConfigError,
    platform::{Platform, ResourceType, StandardizerKind},
};

/// Per-candidate adjustment applied while coercing the picked column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Integer micros of the account currency (Google Ads `cost_micros`).
    MicrosToUnits,
    /// Minor currency units.
    CentsToUnits,
    /// Unix timestamp in seconds.
    EpochSeconds,
    /// Unix timestamp in milliseconds.
    EpochMillis,
    /// Vendor code to canonical label. Unknown codes pass through unchanged.
    Lookup(&'static [(&'static str, &'static str)]),
}

impl fmt::Display for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueTransform::MicrosToUnits => f.write_str("micros"),
            ValueTransform::CentsToUnits => f.write_str("cents"),
            ValueTransform::EpochSeconds => f.write_str("epoch_s"),
            ValueTransform::EpochMillis => f.write_str("epoch_ms"),
            ValueTransform::Lookup(entries) => write!(f, "lookup[{}]", entries.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub column: &'static str,
    pub transform: Option<ValueTransform>,
}

impl Candidate {
    pub fn describe(&self) -> String {
        match &self.transform {
            Some(transform) => format!("{} ({transform})", self.column),
            None => self.column.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field: &'static str,
    pub candidates: &'static [Candidate],
}

#[derive(Debug, Clone, Copy)]
pub struct MappingTable {
    pub platform: Platform,
    pub resource: ResourceType,
    pub schema: &'static CanonicalSchema,
    pub fields: &'static [FieldMapping],
}

impl MappingTable {
    pub fn lookup(platform: Platform, resource: ResourceType) -> Result<Self, ConfigError> {
        let fields = match platform.kind() {
            StandardizerKind::AdSpend => ad_spend::fields(platform, resource),
            StandardizerKind::Crm => crm::fields(platform, resource),
            StandardizerKind::Ecommerce => ecommerce::fields(platform, resource),
            StandardizerKind::Events => events::fields(platform, resource),
            StandardizerKind::Support => support::fields(platform, resource),
        };
        let schema = canonical::canonical_schema(platform.kind(), resource);
        match (fields, schema) {
            (Some(fields), Some(schema)) => Ok(Self {
                platform,
                resource,
                schema,
                fields,
            }),
            _ => Err(ConfigError::UnsupportedCombination { platform, resource }),
        }
    }

    /// Candidates for a canonical field; empty when the platform never exports it.
    pub fn candidates(&self, field: &str) -> &'static [Candidate] {
        self.fields
            .iter()
            .find(|mapping| mapping.field == field)
            .map(|mapping| mapping.candidates)
            .unwrap_or(&[])
    }

    pub fn kind(&self) -> StandardizerKind {
        self.platform.kind()
    }
}

/// Every `(platform, resource)` pair that has a mapping table.
pub fn supported_pairs() -> Vec<(Platform, ResourceType)> {
    Platform::ALL
        .into_iter()
        .flat_map(|platform| {
            ResourceType::ALL
                .into_iter()
                .filter(move |resource| MappingTable::lookup(platform, *resource).is_ok())
                .map(move |resource| (platform, resource))
        })
        .collect()
}
