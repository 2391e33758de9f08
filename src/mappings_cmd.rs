use anyhow::Result;
use itertools::Itertools;

use crate::{
    canonical::PLATFORM_FIELD,
    cli::MappingsArgs,
    mapping::{self, MappingTable},
    platform::Platform,
    table,
};

pub fn execute(args: &MappingsArgs) -> Result<()> {
    let mapping = MappingTable::lookup(args.platform, args.resource)?;
    let headers = ["field", "type", "candidates"].map(String::from).to_vec();
    table::print_table(&headers, &mapping_rows(&mapping));
    Ok(())
}

/// One row per output column, in output order. Candidates are listed in
/// resolution priority.
pub fn mapping_rows(mapping: &MappingTable) -> Vec<Vec<String>> {
    let schema = mapping.schema;
    let mut rows = vec![vec![
        PLATFORM_FIELD.to_string(),
        "text".to_string(),
        format!("(constant '{}')", mapping.platform),
    ]];
    for field in schema.fields {
        let candidates = mapping.candidates(field.name);
        let described = if candidates.is_empty() {
            "(default)".to_string()
        } else {
            candidates.iter().map(|c| c.describe()).join(" > ")
        };
        rows.push(vec![
            field.name.to_string(),
            field.field_type.to_string(),
            described,
        ]);
    }
    for metric in schema.derived {
        rows.push(vec![
            metric.name().to_string(),
            metric.output_type().to_string(),
            format!("= {}", metric.describe()),
        ]);
    }
    rows
}

pub fn execute_platforms() -> Result<()> {
    let headers = ["platform", "kind", "resources"].map(String::from).to_vec();
    table::print_table(&headers, &platform_rows());
    Ok(())
}

pub fn platform_rows() -> Vec<Vec<String>> {
    let pairs = mapping::supported_pairs();
    Platform::ALL
        .iter()
        .map(|platform| {
            let resources = pairs
                .iter()
                .filter(|(p, _)| p == platform)
                .map(|(_, resource)| resource.as_str())
                .join(", ");
            vec![
                platform.to_string(),
                platform.kind().to_string(),
                resources,
            ]
        })
        .collect()
}
