use std::fmt;

use crate::bytecode::{OpCode, TypeQualifier};

/// A typed operand value decoded from the instruction stream
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i32),
    Float(f32),
    String(String),
    Object(i32),
    StackOffset(i32),
    Size(u16),
    Routine(u16),
    ArgCount(u8),
    Jump(i32),
    OffsetNoDestroy(i16),
    SizeNoDestroy(u16),
    BasePointerSize(u32),
    StackPointerSize(u32),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(v) | Operand::Object(v) | Operand::StackOffset(v) | Operand::Jump(v) => {
                write!(f, "{}", v)
            }
            Operand::Float(v) => write!(f, "{:?}", v),
            Operand::String(s) => write!(f, "{:?}", s),
            Operand::Size(v) | Operand::Routine(v) | Operand::SizeNoDestroy(v) => write!(f, "{}", v),
            Operand::ArgCount(v) => write!(f, "{}", v),
            Operand::OffsetNoDestroy(v) => write!(f, "{}", v),
            Operand::BasePointerSize(v) | Operand::StackPointerSize(v) => write!(f, "{}", v),
        }
    }
}

/// Represents a single decoded instruction with its operands
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Byte offset of the opcode within the script file
    pub offset: usize,
    pub opcode: OpCode,
    pub qualifier: TypeQualifier,
    pub operands: Vec<Operand>,
    /// Byte offset of the following instruction
    pub next_offset: usize,
}

impl Instruction {
    pub fn new(offset: usize, opcode: OpCode, qualifier: TypeQualifier) -> Self {
        Self {
            offset,
            opcode,
            qualifier,
            operands: Vec::new(),
            next_offset: offset + 2,
        }
    }

    pub fn with_operand(mut self, operand: Operand) -> Self {
        self.operands.push(operand);
        self
    }

    /// Encoded size in bytes, opcode and qualifier included
    pub fn size(&self) -> usize {
        self.next_offset - self.offset
    }

    /// Full mnemonic including the type suffix, e.g. `CONSTI`
    pub fn mnemonic(&self) -> String {
        format!("{}{}", self.opcode.mnemonic(), self.qualifier.suffix())
    }

    /// Absolute target of a jump instruction.
    ///
    /// `None` for non-jumps and for targets that would land before the file start.
    pub fn jump_target(&self) -> Option<usize> {
        if !self.opcode.is_jump() {
            return None;
        }
        match self.operands.first() {
            Some(Operand::Jump(delta)) => {
                let target = self.offset as i64 + *delta as i64;
                usize::try_from(target).ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x} {}", self.offset, self.mnemonic())?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}
