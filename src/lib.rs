pub mod aggregate;
pub mod canonical;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod data;
pub mod defaults;
pub mod derive;
pub mod error;
pub mod expr;
pub mod filter;
pub mod frame;
pub mod io_utils;
pub mod mapping;
pub mod mappings_cmd;
pub mod metadata;
pub mod platform;
pub mod provider;
pub mod resolve;
pub mod retry;
pub mod source;
pub mod standardize;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::StandardizerConfig,
    error::ConfigError,
    frame::CanonicalFrame,
    metadata::{MetadataSink, RunMetadata},
    provider::TableProvider,
    source::SourceTable,
    standardize::{StandardizeOutput, Standardizer},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("schema_standardizer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Standardize(args) => standardize::execute(&args),
        Commands::Mappings(args) => mappings_cmd::execute(&args),
        Commands::Platforms => mappings_cmd::execute_platforms(),
    }
}
