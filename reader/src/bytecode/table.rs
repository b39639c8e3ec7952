//! Operand layouts for every supported (opcode, qualifier) pair.
//!
//! Instructions carry no length prefix, so a pair missing from this table
//! cannot be skipped and must fail the decode.

use crate::bytecode::OpCode;

/// One field of an instruction's operand payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Signed 32-bit integer constant
    Int,
    /// 32-bit float constant
    Float,
    /// u16 length followed by that many bytes
    String,
    /// 32-bit object id constant
    Object,
    /// Signed 32-bit stack offset
    StackOffset,
    /// u16 byte count
    Size,
    /// u16 engine routine number
    Routine,
    /// u8 argument count
    ArgCount,
    /// Signed 32-bit offset relative to the instruction start
    Jump,
    /// Signed 16-bit offset of the part of a structure to keep
    OffsetNoDestroy,
    /// u16 size of the part of a structure to keep
    SizeNoDestroy,
    /// u32 bytes of base pointer state to save
    BasePointerSize,
    /// u32 bytes of stack state to save
    StackPointerSize,
}

impl OperandKind {
    /// Encoded width in bytes; `None` for the length-prefixed string
    pub fn width(&self) -> Option<usize> {
        match self {
            OperandKind::String => None,
            OperandKind::ArgCount => Some(1),
            OperandKind::Size
            | OperandKind::Routine
            | OperandKind::OffsetNoDestroy
            | OperandKind::SizeNoDestroy => Some(2),
            OperandKind::Int
            | OperandKind::Float
            | OperandKind::Object
            | OperandKind::StackOffset
            | OperandKind::Jump
            | OperandKind::BasePointerSize
            | OperandKind::StackPointerSize => Some(4),
        }
    }
}

/// Layout of one opcode over an inclusive range of qualifier bytes
#[derive(Debug, Clone, Copy)]
pub struct InstructionSpec {
    pub opcode: OpCode,
    pub first_qualifier: u8,
    pub last_qualifier: u8,
    pub operands: &'static [OperandKind],
}

impl InstructionSpec {
    pub fn matches(&self, opcode: u8, qualifier: u8) -> bool {
        self.opcode.to_byte() == opcode
            && (self.first_qualifier..=self.last_qualifier).contains(&qualifier)
    }

    /// Fixed operand width, or `None` when the layout contains a string
    pub fn operand_width(&self) -> Option<usize> {
        self.operands.iter().map(|kind| kind.width()).sum()
    }
}

const fn one(opcode: OpCode, qualifier: u8, operands: &'static [OperandKind]) -> InstructionSpec {
    InstructionSpec {
        opcode,
        first_qualifier: qualifier,
        last_qualifier: qualifier,
        operands,
    }
}

const fn range(
    opcode: OpCode,
    first: u8,
    last: u8,
    operands: &'static [OperandKind],
) -> InstructionSpec {
    InstructionSpec {
        opcode,
        first_qualifier: first,
        last_qualifier: last,
        operands,
    }
}

const NONE: &[OperandKind] = &[];
const STACK_COPY: &[OperandKind] = &[OperandKind::StackOffset, OperandKind::Size];
const STACK_ADJUST: &[OperandKind] = &[OperandKind::StackOffset];
const JUMP: &[OperandKind] = &[OperandKind::Jump];

const UNARY: u8 = 0x01;
const INT: u8 = 0x03;
const FLOAT: u8 = 0x04;
const STRING: u8 = 0x05;
const OBJECT: u8 = 0x06;
const INT_INT: u8 = 0x20;
const FLOAT_FLOAT: u8 = 0x21;
const OBJECT_OBJECT: u8 = 0x22;
const STRING_STRING: u8 = 0x23;
const STRUCT_STRUCT: u8 = 0x24;
const INT_FLOAT: u8 = 0x25;
const FLOAT_INT: u8 = 0x26;
const VECTOR_VECTOR: u8 = 0x3A;
const VECTOR_FLOAT: u8 = 0x3B;
const FLOAT_VECTOR: u8 = 0x3C;

/// Every instruction form the decoder understands
pub static INSTRUCTION_TABLE: &[InstructionSpec] = &[
    one(OpCode::CpDownSp, UNARY, STACK_COPY),
    range(OpCode::RsAdd, INT, OBJECT, NONE),
    range(OpCode::RsAdd, 0x10, 0x19, NONE),
    one(OpCode::CpTopSp, UNARY, STACK_COPY),
    one(OpCode::Const, INT, &[OperandKind::Int]),
    one(OpCode::Const, FLOAT, &[OperandKind::Float]),
    one(OpCode::Const, STRING, &[OperandKind::String]),
    one(OpCode::Const, OBJECT, &[OperandKind::Object]),
    one(OpCode::Action, 0x00, &[OperandKind::Routine, OperandKind::ArgCount]),
    one(OpCode::LogAnd, INT_INT, NONE),
    one(OpCode::LogOr, INT_INT, NONE),
    one(OpCode::IncOr, INT_INT, NONE),
    one(OpCode::ExcOr, INT_INT, NONE),
    one(OpCode::BoolAnd, INT_INT, NONE),
    range(OpCode::Equal, INT_INT, STRING_STRING, NONE),
    one(OpCode::Equal, STRUCT_STRUCT, &[OperandKind::Size]),
    range(OpCode::Equal, 0x30, 0x39, NONE),
    range(OpCode::NEqual, INT_INT, STRING_STRING, NONE),
    one(OpCode::NEqual, STRUCT_STRUCT, &[OperandKind::Size]),
    range(OpCode::NEqual, 0x30, 0x39, NONE),
    range(OpCode::Geq, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Gt, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Lt, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Leq, INT_INT, FLOAT_FLOAT, NONE),
    one(OpCode::ShLeft, INT_INT, NONE),
    one(OpCode::ShRight, INT_INT, NONE),
    one(OpCode::UShRight, INT_INT, NONE),
    range(OpCode::Add, INT_INT, FLOAT_FLOAT, NONE),
    one(OpCode::Add, STRING_STRING, NONE),
    range(OpCode::Add, INT_FLOAT, FLOAT_INT, NONE),
    one(OpCode::Add, VECTOR_VECTOR, NONE),
    range(OpCode::Sub, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Sub, INT_FLOAT, FLOAT_INT, NONE),
    one(OpCode::Sub, VECTOR_VECTOR, NONE),
    range(OpCode::Mul, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Mul, INT_FLOAT, FLOAT_INT, NONE),
    range(OpCode::Mul, VECTOR_FLOAT, FLOAT_VECTOR, NONE),
    range(OpCode::Div, INT_INT, FLOAT_FLOAT, NONE),
    range(OpCode::Div, INT_FLOAT, FLOAT_INT, NONE),
    one(OpCode::Div, VECTOR_FLOAT, NONE),
    one(OpCode::Mod, INT_INT, NONE),
    one(OpCode::Neg, INT, NONE),
    one(OpCode::Neg, FLOAT, NONE),
    one(OpCode::Comp, INT, NONE),
    one(OpCode::MovSp, 0x00, STACK_ADJUST),
    one(OpCode::Jmp, 0x00, JUMP),
    one(OpCode::Jsr, 0x00, JUMP),
    one(OpCode::Jz, 0x00, JUMP),
    one(OpCode::Retn, 0x00, NONE),
    one(
        OpCode::Destruct,
        UNARY,
        &[
            OperandKind::Size,
            OperandKind::OffsetNoDestroy,
            OperandKind::SizeNoDestroy,
        ],
    ),
    one(OpCode::Not, INT, NONE),
    one(OpCode::DecISp, INT, STACK_ADJUST),
    one(OpCode::IncISp, INT, STACK_ADJUST),
    one(OpCode::Jnz, 0x00, JUMP),
    one(OpCode::CpDownBp, UNARY, STACK_COPY),
    one(OpCode::CpTopBp, UNARY, STACK_COPY),
    one(OpCode::DecIBp, INT, STACK_ADJUST),
    one(OpCode::IncIBp, INT, STACK_ADJUST),
    one(OpCode::SaveBp, 0x00, NONE),
    one(OpCode::RestoreBp, 0x00, NONE),
    one(
        OpCode::StoreState,
        0x10,
        &[OperandKind::BasePointerSize, OperandKind::StackPointerSize],
    ),
    one(OpCode::Nop, 0x00, NONE),
];

/// Find the layout for a raw opcode/qualifier pair
pub fn lookup(opcode: u8, qualifier: u8) -> Option<&'static InstructionSpec> {
    INSTRUCTION_TABLE
        .iter()
        .find(|spec| spec.matches(opcode, qualifier))
}
