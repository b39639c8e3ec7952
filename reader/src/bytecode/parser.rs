use log::{debug, trace, warn};

use crate::bytecode::table::{self, OperandKind};
use crate::bytecode::{Instruction, Operand, ScriptProgram, TypeQualifier};
use crate::config::ReaderConfig;
use crate::cursor::{BinaryCursor, Endianness};
use crate::error::{Error, Result};
use crate::source::ByteSource;

pub const SIGNATURE: &[u8; 8] = b"NCS V1.0";

/// Byte following the signature in every compiled script
pub const PROGRAM_MARKER: u8 = 0x42;

/// Signature, marker and program size; the first instruction starts here
pub const HEADER_SIZE: usize = 13;

/// A compiled script decoded into its instruction sequence
#[derive(Debug, Clone)]
pub struct NcsFile {
    program: ScriptProgram,
}

impl NcsFile {
    /// Open and decode a script with the default configuration
    pub fn open<S: Into<ByteSource>>(name: &str, source: S) -> Result<Self> {
        Self::open_with_config(name, source, &ReaderConfig::default())
    }

    pub fn open_with_config<S: Into<ByteSource>>(
        name: &str,
        source: S,
        config: &ReaderConfig,
    ) -> Result<Self> {
        let data = source.into().into_bytes()?;
        let program = Self::decode(name, &data, config)?;
        Ok(Self { program })
    }

    /// Decode a script held in a borrowed buffer, e.g. a slice of an archive
    pub fn decode(name: &str, data: &[u8], config: &ReaderConfig) -> Result<ScriptProgram> {
        let mut cursor = BinaryCursor::open(data, SIGNATURE, Endianness::Big)?;

        let marker = cursor.read_u8()?;
        if marker != PROGRAM_MARKER {
            return Err(Error::FormatMismatch {
                expected: vec![PROGRAM_MARKER],
                found: vec![marker],
            });
        }

        let length = cursor.read_u32()?;
        if length as usize != data.len() {
            if config.strict_program_size {
                return Err(Error::SizeMismatch {
                    declared: length,
                    actual: data.len(),
                });
            }
            warn!(
                "Script {}: declared size {} differs from buffer length {}",
                name,
                length,
                data.len()
            );
        }

        let mut program = ScriptProgram::new(name, length);
        while !cursor.is_empty() {
            let instruction = Self::read_instruction(&mut cursor)?;
            trace!("{}", instruction);
            program.push(instruction);
        }

        debug!(
            "Decoded script {}: {} instructions, {} bytes",
            name,
            program.len(),
            data.len()
        );
        Ok(program)
    }

    fn read_instruction(cursor: &mut BinaryCursor<'_>) -> Result<Instruction> {
        let offset = cursor.position();
        let opcode = cursor.read_u8()?;
        let qualifier = cursor.read_u8()?;

        let unsupported = || Error::UnsupportedInstruction {
            opcode,
            qualifier,
            offset,
        };
        let spec = table::lookup(opcode, qualifier).ok_or_else(unsupported)?;
        let qualifier = TypeQualifier::from_byte(qualifier).ok_or_else(unsupported)?;

        let mut instruction = Instruction::new(offset, spec.opcode, qualifier);
        for kind in spec.operands {
            instruction.operands.push(Self::read_operand(cursor, *kind)?);
        }
        instruction.next_offset = cursor.position();

        Ok(instruction)
    }

    fn read_operand(cursor: &mut BinaryCursor<'_>, kind: OperandKind) -> Result<Operand> {
        let operand = match kind {
            OperandKind::Int => Operand::Int(cursor.read_i32()?),
            OperandKind::Float => Operand::Float(cursor.read_f32()?),
            OperandKind::String => {
                let len = cursor.read_u16()? as usize;
                let bytes = cursor.read_bytes(len)?;
                Operand::String(String::from_utf8_lossy(bytes).to_string())
            }
            OperandKind::Object => Operand::Object(cursor.read_i32()?),
            OperandKind::StackOffset => Operand::StackOffset(cursor.read_i32()?),
            OperandKind::Size => Operand::Size(cursor.read_u16()?),
            OperandKind::Routine => Operand::Routine(cursor.read_u16()?),
            OperandKind::ArgCount => Operand::ArgCount(cursor.read_u8()?),
            OperandKind::Jump => Operand::Jump(cursor.read_i32()?),
            OperandKind::OffsetNoDestroy => Operand::OffsetNoDestroy(cursor.read_i16()?),
            OperandKind::SizeNoDestroy => Operand::SizeNoDestroy(cursor.read_u16()?),
            OperandKind::BasePointerSize => Operand::BasePointerSize(cursor.read_u32()?),
            OperandKind::StackPointerSize => Operand::StackPointerSize(cursor.read_u32()?),
        };
        Ok(operand)
    }

    /// The decoded program
    pub fn program(&self) -> &ScriptProgram {
        &self.program
    }

    pub fn into_program(self) -> ScriptProgram {
        self.program
    }
}
