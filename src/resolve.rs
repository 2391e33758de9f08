//! Field resolution.
//!
//! For each canonical field the resolver picks at most one source column:
//! a configured override when the source has it, otherwise the first
//! candidate present in the source. Nothing found means the default filler
//! takes over.

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};

use crate::{
    mapping::{Candidate, MappingTable, ValueTransform},
    source::SourceTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub column: String,
    pub transform: Option<ValueTransform>,
    pub via_override: bool,
}

/// First-match-wins resolution of one canonical field.
///
/// An override that names a column missing from the source is ignored. When
/// the override column is also one of the candidates, that candidate's value
/// transform still applies.
pub fn resolve(
    field: &str,
    candidates: &[Candidate],
    source_columns: &HashSet<&str>,
    override_column: Option<&str>,
) -> Option<ResolvedColumn> {
    if let Some(column) = override_column {
        if source_columns.contains(column) {
            let transform = candidates
                .iter()
                .find(|candidate| candidate.column == column)
                .and_then(|candidate| candidate.transform);
            return Some(ResolvedColumn {
                column: column.to_string(),
                transform,
                via_override: true,
            });
        }
        warn!("Override for '{field}' names column '{column}' which is not in the source; ignoring");
    }
    candidates
        .iter()
        .find(|candidate| source_columns.contains(candidate.column))
        .map(|candidate| ResolvedColumn {
            column: candidate.column.to_string(),
            transform: candidate.transform,
            via_override: false,
        })
}

/// Resolution of every canonical field of a mapping table, in schema order.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    entries: Vec<(&'static str, Option<ResolvedColumn>)>,
}

impl Resolution {
    pub fn column_for(&self, field: &str) -> Option<&ResolvedColumn> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, resolved)| resolved.as_ref())
    }

    pub fn is_resolved(&self, field: &str) -> bool {
        self.column_for(field).is_some()
    }

    pub fn unresolved(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, resolved)| resolved.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Canonical field → source column, for resolved fields only.
    pub fn source_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(name, resolved)| {
                resolved
                    .as_ref()
                    .map(|r| (name.to_string(), r.column.clone()))
            })
            .collect()
    }
}

pub fn resolve_table(
    table: &MappingTable,
    source: &SourceTable,
    overrides: &BTreeMap<String, String>,
) -> Resolution {
    let columns = source.column_set();
    let entries = table
        .schema
        .fields
        .iter()
        .map(|field| {
            let resolved = resolve(
                field.name,
                table.candidates(field.name),
                &columns,
                overrides.get(field.name).map(String::as_str),
            );
            match &resolved {
                Some(r) => debug!(
                    "{}: '{}' <- '{}'{}",
                    table.platform,
                    field.name,
                    r.column,
                    if r.via_override { " (override)" } else { "" }
                ),
                None => debug!("{}: '{}' unresolved", table.platform, field.name),
            }
            (field.name, resolved)
        })
        .collect();
    Resolution { entries }
}
