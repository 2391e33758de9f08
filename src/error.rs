//! Configuration errors.
//!
//! Every variant is raised while a standardizer is being set up, before any
//! source row is touched. Per-cell coercion problems are never errors; they
//! become nulls.

use thiserror::Error;

use crate::platform::{Platform, ResourceType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No mapping table exists for the pair.
    #[error("platform '{platform}' does not support resource type '{resource}'")]
    UnsupportedCombination {
        platform: Platform,
        resource: ResourceType,
    },

    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),

    #[error("unknown resource type '{0}'")]
    UnknownResource(String),

    /// A required setting was neither in the config file nor on the command line.
    #[error("{0} must be configured")]
    MissingSetting(&'static str),

    #[error("field override targets unknown canonical field '{field}'")]
    UnknownOverrideField { field: String },

    #[error("filter references unknown field '{field}'")]
    UnknownFilterField { field: String },

    #[error("group key '{field}' is not a canonical field")]
    UnknownGroupKey { field: String },

    #[error("derived column '{name}' is invalid: {reason}")]
    InvalidDerive { name: String, reason: String },

    #[error("column '{name}' is defined more than once")]
    DuplicateColumn { name: String },

    /// The host did not supply the upstream table this instance reads.
    #[error("upstream table '{name}' was not provided")]
    MissingUpstream { name: String },

    #[error("invalid {what} '{value}'")]
    InvalidLiteral { what: &'static str, value: String },
}
