use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, warn};
use resource_reader::{ReaderConfig, RimFile};

use crate::cli::{file_name, parse_file_name};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Archive to read
    pub archive: PathBuf,

    /// Resources to extract as NAME.EXT; all resources when omitted
    pub names: Vec<String>,

    /// Directory to write into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Outcome of an extraction run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: Vec<PathBuf>,
    pub missing: Vec<String>,
    /// Resources whose names would resolve outside the output directory
    pub rejected: Vec<String>,
}

pub fn execute(args: &ExtractArgs, config: &ReaderConfig, out: &mut dyn Write) -> Result<()> {
    let summary = extract(args, config)?;
    for path in &summary.written {
        writeln!(out, "{}", path.display())?;
    }
    for name in &summary.missing {
        writeln!(out, "not found: {}", name)?;
    }
    for name in &summary.rejected {
        writeln!(out, "skipped unsafe name: {}", name)?;
    }
    Ok(())
}

pub fn extract(args: &ExtractArgs, config: &ReaderConfig) -> Result<ExtractSummary> {
    let rim = RimFile::open_with_config(args.archive.as_path(), config)
        .with_context(|| format!("Failed to open archive {}", args.archive.display()))?;
    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut summary = ExtractSummary::default();

    if args.names.is_empty() {
        for (idx, res) in rim.resources().iter().enumerate() {
            let name = file_name(&res.name, res.ty);
            if res.name.is_empty() || !is_plain_file_name(&name) {
                warn!("Skipping resource {} with unsafe name {:?}", idx, res.name);
                summary.rejected.push(name);
                continue;
            }
            let data = rim
                .resource_data_at(idx)
                .with_context(|| format!("Failed to read resource {} ({})", idx, res.name))?;
            summary.written.push(write_resource(args, &name, data)?);
        }
        return Ok(summary);
    }

    for requested in &args.names {
        let (name, ty) = parse_file_name(requested)?;
        if name.is_empty() || !is_plain_file_name(&file_name(&name, ty)) {
            warn!("Skipping unsafe name {:?}", requested);
            summary.rejected.push(requested.clone());
            continue;
        }
        match rim.find(&name, ty)? {
            Some(data) => summary
                .written
                .push(write_resource(args, &file_name(&name, ty), data)?),
            None => {
                warn!("{} not found in {}", requested, args.archive.display());
                summary.missing.push(requested.clone());
            }
        }
    }
    Ok(summary)
}

/// Whether `name` is a single normal path component, so joining it onto the
/// output directory cannot leave that directory
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

fn write_resource(args: &ExtractArgs, file_name: &str, data: &[u8]) -> Result<PathBuf> {
    let path = args.output.join(file_name);
    fs::write(&path, data).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(path)
}
