use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use regex::Regex;
use resource_reader::{ReaderConfig, ResourceType, RimFile};
use serde::Serialize;

use crate::cli::parse_resource_type;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Only show resources of this type (extension or numeric code)
    #[arg(long = "type")]
    pub resource_type: Option<String>,

    /// Only show resources whose name matches this regular expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// One directory row as printed by `list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub index: usize,
    pub name: String,
    pub type_code: u16,
    pub extension: Option<String>,
    pub offset: u32,
    pub size: u32,
}

pub fn execute(args: &ListArgs, config: &ReaderConfig, out: &mut dyn Write) -> Result<()> {
    let rim = RimFile::open_with_config(args.archive.as_path(), config)
        .with_context(|| format!("Failed to open archive {}", args.archive.display()))?;

    let resource_type = args
        .resource_type
        .as_deref()
        .map(parse_resource_type)
        .transpose()?;
    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter expression")?;

    let entries = collect_entries(&rim, resource_type, filter.as_ref());
    log::info!(
        "{}: {} of {} resources shown",
        args.archive.display(),
        entries.len(),
        rim.resource_count()
    );

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        for entry in &entries {
            let ext = entry
                .extension
                .clone()
                .unwrap_or_else(|| entry.type_code.to_string());
            writeln!(
                out,
                "{:>5}  {:<16} {:<5} {:>#10x} {:>10}",
                entry.index, entry.name, ext, entry.offset, entry.size
            )?;
        }
    }
    Ok(())
}

/// Directory rows in file order, narrowed by type and name pattern
pub fn collect_entries(
    rim: &RimFile,
    resource_type: Option<ResourceType>,
    filter: Option<&Regex>,
) -> Vec<ListEntry> {
    rim.resources()
        .iter()
        .enumerate()
        .filter(|(_, res)| resource_type.map_or(true, |ty| res.ty == ty))
        .filter(|(_, res)| filter.map_or(true, |re| re.is_match(&res.name)))
        .map(|(index, res)| ListEntry {
            index,
            name: res.name.clone(),
            type_code: res.ty.code(),
            extension: res.ty.extension().map(str::to_string),
            offset: res.offset,
            size: res.size,
        })
        .collect()
}
