use std::io::{self, Write};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use resource_reader::config::DEFAULT_MAX_RESOURCE_COUNT;
use resource_reader::{ReaderConfig, ResourceType};

use crate::disasm::{self, DisasmArgs};
use crate::extract::{self, ExtractArgs};
use crate::list::{self, ListArgs};

/// Inspect RIM resource archives and compiled NCS scripts
#[derive(Parser, Debug)]
#[command(name = "restool")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Check descriptor bounds only when a payload is read
    #[arg(long, global = true)]
    pub lenient_bounds: bool,

    /// Reject scripts whose declared size differs from the file size
    #[arg(long, global = true)]
    pub strict_size: bool,

    /// Maximum number of resources an archive may declare
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RESOURCE_COUNT)]
    pub max_resources: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the directory of an archive
    List(ListArgs),

    /// Write archive resources to a directory
    Extract(ExtractArgs),

    /// Disassemble a compiled script
    Disasm(DisasmArgs),
}

impl Cli {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::new()
            .with_resource_bounds_validation(!self.lenient_bounds)
            .with_strict_program_size(self.strict_size)
            .with_max_resource_count(self.max_resources)
    }

    /// Default log filter; `RUST_LOG` takes precedence
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Dispatches parsed command lines to the command implementations
pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, cli: Cli) -> Result<()> {
        let config = cli.reader_config();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match &cli.command {
            Commands::List(args) => list::execute(args, &config, &mut out)?,
            Commands::Extract(args) => extract::execute(args, &config, &mut out)?,
            Commands::Disasm(args) => disasm::execute(args, &config, &mut out)?,
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a resource type given as an extension (`ncs`) or a numeric code (`2010`)
pub fn parse_resource_type(text: &str) -> Result<ResourceType> {
    if let Ok(code) = text.parse::<u16>() {
        return Ok(ResourceType::from_code(code));
    }
    ResourceType::from_extension(text).ok_or_else(|| anyhow!("Unknown resource type: {}", text))
}

/// File name used when a resource is written to disk
pub fn file_name(name: &str, ty: ResourceType) -> String {
    match ty.extension() {
        Some(ext) => format!("{}.{}", name, ext),
        None => format!("{}.{}", name, ty.code()),
    }
}

/// Split `name.ext` into a resource name and type
pub fn parse_file_name(text: &str) -> Result<(String, ResourceType)> {
    let (name, ext) = text
        .rsplit_once('.')
        .ok_or_else(|| anyhow!("Expected NAME.EXT, got {}", text))?;
    Ok((name.to_lowercase(), parse_resource_type(ext)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resource_type() {
        assert_eq!(parse_resource_type("ncs").unwrap(), ResourceType::Ncs);
        assert_eq!(parse_resource_type("2DA").unwrap(), ResourceType::TwoDa);
        assert_eq!(parse_resource_type("2010").unwrap(), ResourceType::Ncs);
        assert_eq!(parse_resource_type("4242").unwrap(), ResourceType::Other(4242));
        assert!(parse_resource_type("exe").is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(file_name("k_open_door", ResourceType::Ncs), "k_open_door.ncs");
        assert_eq!(file_name("odd", ResourceType::Other(4242)), "odd.4242");

        let (name, ty) = parse_file_name("K_Open_Door.NCS").unwrap();
        assert_eq!(name, "k_open_door");
        assert_eq!(ty, ResourceType::Ncs);
        assert!(parse_file_name("noextension").is_err());
    }

    #[test]
    fn test_cli_config_mapping() {
        let cli = Cli::parse_from(["restool", "-vv", "--lenient-bounds", "list", "a.rim"]);
        let config = cli.reader_config();
        assert!(!config.validate_resource_bounds);
        assert!(!config.strict_program_size);
        assert_eq!(config.max_resource_count, DEFAULT_MAX_RESOURCE_COUNT);
        assert_eq!(cli.log_filter(), "debug");

        let cli = Cli::parse_from([
            "restool",
            "disasm",
            "script.ncs",
            "--strict-size",
            "--max-resources",
            "10",
        ]);
        let config = cli.reader_config();
        assert!(config.validate_resource_bounds);
        assert!(config.strict_program_size);
        assert_eq!(config.max_resource_count, 10);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
