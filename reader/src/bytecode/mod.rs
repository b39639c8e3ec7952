mod instruction;
mod opcode;
mod parser;
pub mod table;

pub use instruction::{Instruction, Operand};
pub use opcode::{OpCode, TypeQualifier};
pub use parser::{NcsFile, HEADER_SIZE, PROGRAM_MARKER, SIGNATURE as NCS_SIGNATURE};

use rustc_hash::FxHashMap;

/// A decoded compiled script, ready to hand to an execution engine
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptProgram {
    name: String,
    length: u32,
    instructions: Vec<Instruction>,
    index_by_offset: FxHashMap<usize, usize>,
}

impl ScriptProgram {
    pub fn new(name: &str, length: u32) -> Self {
        Self {
            name: name.to_string(),
            length,
            instructions: Vec::new(),
            index_by_offset: FxHashMap::default(),
        }
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.index_by_offset
            .insert(instruction.offset, self.instructions.len());
        self.instructions.push(instruction);
    }

    /// Name of the resource the program was decoded from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program size declared in the file header
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Instructions in stream order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Position in `instructions()` of the instruction starting at `offset`
    pub fn index_of(&self, offset: usize) -> Option<usize> {
        self.index_by_offset.get(&offset).copied()
    }

    /// The instruction starting exactly at `offset`
    pub fn instruction_at(&self, offset: usize) -> Option<&Instruction> {
        self.index_of(offset).map(|idx| &self.instructions[idx])
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
