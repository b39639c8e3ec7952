use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use resource_reader::{NcsFile, ReaderConfig, ResourceType, RimFile, ScriptProgram};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct DisasmArgs {
    /// A compiled script, or an archive when NAME is given
    pub path: PathBuf,

    /// Script to disassemble from the archive at PATH
    pub name: Option<String>,

    /// Print JSON instead of assembly text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct InstructionView {
    pub offset: usize,
    pub mnemonic: String,
    pub operands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_target: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProgramView {
    pub name: String,
    pub length: u32,
    pub instructions: Vec<InstructionView>,
}

impl From<&ScriptProgram> for ProgramView {
    fn from(program: &ScriptProgram) -> Self {
        Self {
            name: program.name().to_string(),
            length: program.length(),
            instructions: program
                .instructions()
                .iter()
                .map(|ins| InstructionView {
                    offset: ins.offset,
                    mnemonic: ins.mnemonic(),
                    operands: ins.operands.iter().map(|op| op.to_string()).collect(),
                    jump_target: ins.jump_target(),
                })
                .collect(),
        }
    }
}

pub fn execute(args: &DisasmArgs, config: &ReaderConfig, out: &mut dyn Write) -> Result<()> {
    let program = load_program(args, config)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &ProgramView::from(&program))?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "; {} ({} bytes, {} instructions)",
        program.name(),
        program.length(),
        program.len()
    )?;
    for ins in program.instructions() {
        writeln!(out, "{}", ins)?;
    }
    Ok(())
}

pub fn load_program(args: &DisasmArgs, config: &ReaderConfig) -> Result<ScriptProgram> {
    match &args.name {
        Some(name) => {
            let rim = RimFile::open_with_config(args.path.as_path(), config)
                .with_context(|| format!("Failed to open archive {}", args.path.display()))?;
            let Some(data) = rim.find(name, ResourceType::Ncs)? else {
                bail!("Script {} not found in {}", name, args.path.display());
            };
            NcsFile::decode(&name.to_lowercase(), data, config)
                .with_context(|| format!("Failed to decode {}", name))
        }
        None => {
            let name = args
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let ncs = NcsFile::open_with_config(&name, args.path.as_path(), config)
                .with_context(|| format!("Failed to decode {}", args.path.display()))?;
            Ok(ncs.into_program())
        }
    }
}
