use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::platform::{Platform, ResourceType};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Standardize vendor exports into canonical schemas",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve, coerce, derive, filter and optionally aggregate one source table
    Standardize(StandardizeArgs),
    /// Show the mapping table for a platform and resource type
    Mappings(MappingsArgs),
    /// List every supported platform and resource type pair
    Platforms,
}

#[derive(Debug, Args)]
pub struct StandardizeArgs {
    /// Input table as `path` or `name=path` (.csv, .tsv, .json, .ndjson, or '-' for stdin)
    #[arg(short = 'i', long = "input", action = clap::ArgAction::Append, required = true)]
    pub inputs: Vec<String>,
    /// YAML configuration file; flags below override its values
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Source platform
    #[arg(short, long, value_enum)]
    pub platform: Option<Platform>,
    /// Resource type exported by the platform
    #[arg(short, long, value_enum)]
    pub resource: Option<ResourceType>,
    /// Name of the upstream table to standardize (defaults to `source`)
    #[arg(long)]
    pub upstream: Option<String>,
    /// Asset name recorded in the metadata
    #[arg(long = "output-name")]
    pub output_name: Option<String>,
    /// Group name recorded in the metadata
    #[arg(long = "group-name")]
    pub group_name: Option<String>,
    /// Field override `canonical_field=source_column` (repeatable)
    #[arg(long = "override", action = clap::ArgAction::Append)]
    pub overrides: Vec<String>,
    /// Keep rows whose status is one of these values (repeatable, comma-separated allowed)
    #[arg(long = "status", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub statuses: Vec<String>,
    /// Keep rows owned by this user ID
    #[arg(long)]
    pub owner: Option<String>,
    /// Date or datetime field used by --start-date/--end-date
    #[arg(long = "date-field")]
    pub date_field: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD)
    #[arg(long = "start-date")]
    pub start_date: Option<String>,
    /// Inclusive upper bound (YYYY-MM-DD)
    #[arg(long = "end-date")]
    pub end_date: Option<String>,
    /// Filter condition such as `spend > 10` (repeatable)
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
    /// Derived column `name=expression` (repeatable)
    #[arg(long = "derive", action = clap::ArgAction::Append)]
    pub derives: Vec<String>,
    /// Roll rows up by the group keys
    #[arg(long)]
    pub aggregate: bool,
    /// Group key for --aggregate (repeatable, comma-separated allowed)
    #[arg(long = "group-by", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub group_by: Vec<String>,
    /// Rewrite source headers to snake_case before resolution
    #[arg(long = "normalize-headers")]
    pub normalize_headers: bool,
    /// Output file (.csv, .tsv, .json, .ndjson); stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Write run metadata as JSON to this path
    #[arg(short = 'm', long)]
    pub metadata: Option<PathBuf>,
    /// Render stdout output as an aligned table
    #[arg(long)]
    pub table: bool,
    /// CSV delimiter character for inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter for CSV output (defaults to the output extension or comma)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Character encoding for output (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct MappingsArgs {
    /// Source platform
    #[arg(short, long, value_enum)]
    pub platform: Platform,
    /// Resource type exported by the platform
    #[arg(short, long, value_enum)]
    pub resource: ResourceType,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn standardize_flags_parse() {
        let cli = Cli::try_parse_from([
            "schema-standardizer",
            "standardize",
            "-i",
            "ads.csv",
            "-p",
            "google_ads",
            "-r",
            "campaigns",
            "--status",
            "open,pending",
            "--group-by",
            "date",
            "--group-by",
            "campaign_id",
            "--delimiter",
            "tab",
        ])
        .unwrap();
        let Commands::Standardize(args) = cli.command else {
            panic!("expected standardize");
        };
        assert_eq!(args.platform, Some(Platform::GoogleAds));
        assert_eq!(args.statuses, vec!["open", "pending"]);
        assert_eq!(args.group_by, vec!["date", "campaign_id"]);
        assert_eq!(args.delimiter, Some(b'\t'));
    }

    #[test]
    fn parse_delimiter_rejects_multi_character_values() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
