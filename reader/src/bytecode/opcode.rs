/// Opcodes of the compiled script instruction set

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Stack copies
    CpDownSp = 0x01,     // Copy top of stack down into an earlier slot
    RsAdd = 0x02,        // Reserve a typed slot on the stack
    CpTopSp = 0x03,      // Copy an earlier slot to the top of the stack

    // Constants and engine calls
    Const = 0x04,        // Push a typed constant
    Action = 0x05,       // Call an engine routine

    // Logical and bitwise operations
    LogAnd = 0x06,
    LogOr = 0x07,
    IncOr = 0x08,
    ExcOr = 0x09,
    BoolAnd = 0x0A,

    // Comparison operations
    Equal = 0x0B,
    NEqual = 0x0C,
    Geq = 0x0D,
    Gt = 0x0E,
    Lt = 0x0F,
    Leq = 0x10,

    // Shifts
    ShLeft = 0x11,
    ShRight = 0x12,
    UShRight = 0x13,

    // Arithmetic operations
    Add = 0x14,
    Sub = 0x15,
    Mul = 0x16,
    Div = 0x17,
    Mod = 0x18,
    Neg = 0x19,
    Comp = 0x1A,         // Ones' complement

    // Stack pointer and control flow
    MovSp = 0x1B,        // Pop bytes off the stack
    Jmp = 0x1D,
    Jsr = 0x1E,          // Jump to subroutine
    Jz = 0x1F,           // Jump if top of stack is zero
    Retn = 0x20,
    Destruct = 0x21,     // Remove part of a structure from the stack
    Not = 0x22,
    DecISp = 0x23,       // Decrement integer relative to stack pointer
    IncISp = 0x24,       // Increment integer relative to stack pointer
    Jnz = 0x25,          // Jump if top of stack is non-zero

    // Base pointer operations
    CpDownBp = 0x26,
    CpTopBp = 0x27,
    DecIBp = 0x28,
    IncIBp = 0x29,
    SaveBp = 0x2A,
    RestoreBp = 0x2B,

    // Deferred actions
    StoreState = 0x2C,
    Nop = 0x2D,
}

const CP_DOWN_SP: u8 = OpCode::CpDownSp as u8;
const RS_ADD: u8 = OpCode::RsAdd as u8;
const CP_TOP_SP: u8 = OpCode::CpTopSp as u8;

const CONST: u8 = OpCode::Const as u8;
const ACTION: u8 = OpCode::Action as u8;

const LOG_AND: u8 = OpCode::LogAnd as u8;
const LOG_OR: u8 = OpCode::LogOr as u8;
const INC_OR: u8 = OpCode::IncOr as u8;
const EXC_OR: u8 = OpCode::ExcOr as u8;
const BOOL_AND: u8 = OpCode::BoolAnd as u8;

const EQUAL: u8 = OpCode::Equal as u8;
const N_EQUAL: u8 = OpCode::NEqual as u8;
const GEQ: u8 = OpCode::Geq as u8;
const GT: u8 = OpCode::Gt as u8;
const LT: u8 = OpCode::Lt as u8;
const LEQ: u8 = OpCode::Leq as u8;

const SH_LEFT: u8 = OpCode::ShLeft as u8;
const SH_RIGHT: u8 = OpCode::ShRight as u8;
const USH_RIGHT: u8 = OpCode::UShRight as u8;

const ADD: u8 = OpCode::Add as u8;
const SUB: u8 = OpCode::Sub as u8;
const MUL: u8 = OpCode::Mul as u8;
const DIV: u8 = OpCode::Div as u8;
const MOD: u8 = OpCode::Mod as u8;
const NEG: u8 = OpCode::Neg as u8;
const COMP: u8 = OpCode::Comp as u8;

const MOV_SP: u8 = OpCode::MovSp as u8;
const JMP: u8 = OpCode::Jmp as u8;
const JSR: u8 = OpCode::Jsr as u8;
const JZ: u8 = OpCode::Jz as u8;
const RETN: u8 = OpCode::Retn as u8;
const DESTRUCT: u8 = OpCode::Destruct as u8;
const NOT: u8 = OpCode::Not as u8;
const DEC_I_SP: u8 = OpCode::DecISp as u8;
const INC_I_SP: u8 = OpCode::IncISp as u8;
const JNZ: u8 = OpCode::Jnz as u8;

const CP_DOWN_BP: u8 = OpCode::CpDownBp as u8;
const CP_TOP_BP: u8 = OpCode::CpTopBp as u8;
const DEC_I_BP: u8 = OpCode::DecIBp as u8;
const INC_I_BP: u8 = OpCode::IncIBp as u8;
const SAVE_BP: u8 = OpCode::SaveBp as u8;
const RESTORE_BP: u8 = OpCode::RestoreBp as u8;

const STORE_STATE: u8 = OpCode::StoreState as u8;
const NOP: u8 = OpCode::Nop as u8;

impl OpCode {
    /// Convert a byte to an opcode
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CP_DOWN_SP => Some(OpCode::CpDownSp),
            RS_ADD => Some(OpCode::RsAdd),
            CP_TOP_SP => Some(OpCode::CpTopSp),

            CONST => Some(OpCode::Const),
            ACTION => Some(OpCode::Action),

            LOG_AND => Some(OpCode::LogAnd),
            LOG_OR => Some(OpCode::LogOr),
            INC_OR => Some(OpCode::IncOr),
            EXC_OR => Some(OpCode::ExcOr),
            BOOL_AND => Some(OpCode::BoolAnd),

            EQUAL => Some(OpCode::Equal),
            N_EQUAL => Some(OpCode::NEqual),
            GEQ => Some(OpCode::Geq),
            GT => Some(OpCode::Gt),
            LT => Some(OpCode::Lt),
            LEQ => Some(OpCode::Leq),

            SH_LEFT => Some(OpCode::ShLeft),
            SH_RIGHT => Some(OpCode::ShRight),
            USH_RIGHT => Some(OpCode::UShRight),

            ADD => Some(OpCode::Add),
            SUB => Some(OpCode::Sub),
            MUL => Some(OpCode::Mul),
            DIV => Some(OpCode::Div),
            MOD => Some(OpCode::Mod),
            NEG => Some(OpCode::Neg),
            COMP => Some(OpCode::Comp),

            MOV_SP => Some(OpCode::MovSp),
            JMP => Some(OpCode::Jmp),
            JSR => Some(OpCode::Jsr),
            JZ => Some(OpCode::Jz),
            RETN => Some(OpCode::Retn),
            DESTRUCT => Some(OpCode::Destruct),
            NOT => Some(OpCode::Not),
            DEC_I_SP => Some(OpCode::DecISp),
            INC_I_SP => Some(OpCode::IncISp),
            JNZ => Some(OpCode::Jnz),

            CP_DOWN_BP => Some(OpCode::CpDownBp),
            CP_TOP_BP => Some(OpCode::CpTopBp),
            DEC_I_BP => Some(OpCode::DecIBp),
            INC_I_BP => Some(OpCode::IncIBp),
            SAVE_BP => Some(OpCode::SaveBp),
            RESTORE_BP => Some(OpCode::RestoreBp),

            STORE_STATE => Some(OpCode::StoreState),
            NOP => Some(OpCode::Nop),

            _ => None,
        }
    }

    /// Convert an opcode to a byte
    pub fn to_byte(&self) -> u8 {
        *self as u8
    }

    /// Assembler name without the type suffix
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::CpDownSp => "CPDOWNSP",
            OpCode::RsAdd => "RSADD",
            OpCode::CpTopSp => "CPTOPSP",
            OpCode::Const => "CONST",
            OpCode::Action => "ACTION",
            OpCode::LogAnd => "LOGAND",
            OpCode::LogOr => "LOGOR",
            OpCode::IncOr => "INCOR",
            OpCode::ExcOr => "EXCOR",
            OpCode::BoolAnd => "BOOLAND",
            OpCode::Equal => "EQUAL",
            OpCode::NEqual => "NEQUAL",
            OpCode::Geq => "GEQ",
            OpCode::Gt => "GT",
            OpCode::Lt => "LT",
            OpCode::Leq => "LEQ",
            OpCode::ShLeft => "SHLEFT",
            OpCode::ShRight => "SHRIGHT",
            OpCode::UShRight => "USHRIGHT",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Neg => "NEG",
            OpCode::Comp => "COMP",
            OpCode::MovSp => "MOVSP",
            OpCode::Jmp => "JMP",
            OpCode::Jsr => "JSR",
            OpCode::Jz => "JZ",
            OpCode::Retn => "RETN",
            OpCode::Destruct => "DESTRUCT",
            OpCode::Not => "NOT",
            OpCode::DecISp => "DECISP",
            OpCode::IncISp => "INCISP",
            OpCode::Jnz => "JNZ",
            OpCode::CpDownBp => "CPDOWNBP",
            OpCode::CpTopBp => "CPTOPBP",
            OpCode::DecIBp => "DECIBP",
            OpCode::IncIBp => "INCIBP",
            OpCode::SaveBp => "SAVEBP",
            OpCode::RestoreBp => "RESTOREBP",
            OpCode::StoreState => "STORE_STATE",
            OpCode::Nop => "NOP",
        }
    }

    /// Whether the single operand is a jump offset relative to the instruction
    pub fn is_jump(&self) -> bool {
        matches!(self, OpCode::Jmp | OpCode::Jsr | OpCode::Jz | OpCode::Jnz)
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        opcode.to_byte()
    }
}

/// Second byte of every instruction: the operand types the opcode works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeQualifier {
    None,
    Unary,
    Int,
    Float,
    String,
    Object,
    /// Engine structure type 0-9 (effect, event, location, talent, ...)
    Engine(u8),
    IntInt,
    FloatFloat,
    ObjectObject,
    StringString,
    StructStruct,
    IntFloat,
    FloatInt,
    EngineEngine(u8),
    VectorVector,
    VectorFloat,
    FloatVector,
}

impl TypeQualifier {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(TypeQualifier::None),
            0x01 => Some(TypeQualifier::Unary),
            0x03 => Some(TypeQualifier::Int),
            0x04 => Some(TypeQualifier::Float),
            0x05 => Some(TypeQualifier::String),
            0x06 => Some(TypeQualifier::Object),
            0x10..=0x19 => Some(TypeQualifier::Engine(byte - 0x10)),
            0x20 => Some(TypeQualifier::IntInt),
            0x21 => Some(TypeQualifier::FloatFloat),
            0x22 => Some(TypeQualifier::ObjectObject),
            0x23 => Some(TypeQualifier::StringString),
            0x24 => Some(TypeQualifier::StructStruct),
            0x25 => Some(TypeQualifier::IntFloat),
            0x26 => Some(TypeQualifier::FloatInt),
            0x30..=0x39 => Some(TypeQualifier::EngineEngine(byte - 0x30)),
            0x3A => Some(TypeQualifier::VectorVector),
            0x3B => Some(TypeQualifier::VectorFloat),
            0x3C => Some(TypeQualifier::FloatVector),
            _ => None,
        }
    }

    /// Encoded qualifier byte; `None` for an engine index outside 0-9
    pub fn to_byte(&self) -> Option<u8> {
        let byte = match self {
            TypeQualifier::None => 0x00,
            TypeQualifier::Unary => 0x01,
            TypeQualifier::Int => 0x03,
            TypeQualifier::Float => 0x04,
            TypeQualifier::String => 0x05,
            TypeQualifier::Object => 0x06,
            TypeQualifier::Engine(n) if *n <= 9 => 0x10 + n,
            TypeQualifier::IntInt => 0x20,
            TypeQualifier::FloatFloat => 0x21,
            TypeQualifier::ObjectObject => 0x22,
            TypeQualifier::StringString => 0x23,
            TypeQualifier::StructStruct => 0x24,
            TypeQualifier::IntFloat => 0x25,
            TypeQualifier::FloatInt => 0x26,
            TypeQualifier::EngineEngine(n) if *n <= 9 => 0x30 + n,
            TypeQualifier::VectorVector => 0x3A,
            TypeQualifier::VectorFloat => 0x3B,
            TypeQualifier::FloatVector => 0x3C,
            TypeQualifier::Engine(_) | TypeQualifier::EngineEngine(_) => return None,
        };
        Some(byte)
    }

    /// Suffix appended to the opcode mnemonic, e.g. `II` in `ADDII`
    pub fn suffix(&self) -> String {
        match self {
            TypeQualifier::None | TypeQualifier::Unary => String::new(),
            TypeQualifier::Int => "I".to_string(),
            TypeQualifier::Float => "F".to_string(),
            TypeQualifier::String => "S".to_string(),
            TypeQualifier::Object => "O".to_string(),
            TypeQualifier::Engine(n) => format!("E{}", n),
            TypeQualifier::IntInt => "II".to_string(),
            TypeQualifier::FloatFloat => "FF".to_string(),
            TypeQualifier::ObjectObject => "OO".to_string(),
            TypeQualifier::StringString => "SS".to_string(),
            TypeQualifier::StructStruct => "TT".to_string(),
            TypeQualifier::IntFloat => "IF".to_string(),
            TypeQualifier::FloatInt => "FI".to_string(),
            TypeQualifier::EngineEngine(n) => format!("E{}E{}", n, n),
            TypeQualifier::VectorVector => "VV".to_string(),
            TypeQualifier::VectorFloat => "VF".to_string(),
            TypeQualifier::FloatVector => "FV".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_byte_conversion() {
        assert_eq!(OpCode::CpDownSp.to_byte(), 0x01);
        assert_eq!(OpCode::Const.to_byte(), 0x04);
        assert_eq!(OpCode::Action.to_byte(), 0x05);
        assert_eq!(OpCode::MovSp.to_byte(), 0x1B);
        assert_eq!(OpCode::Jmp.to_byte(), 0x1D);
        assert_eq!(OpCode::Retn.to_byte(), 0x20);
        assert_eq!(OpCode::StoreState.to_byte(), 0x2C);
        assert_eq!(OpCode::Nop.to_byte(), 0x2D);
    }

    #[test]
    fn test_byte_to_opcode_conversion() {
        assert_eq!(OpCode::from_byte(0x02), Some(OpCode::RsAdd));
        assert_eq!(OpCode::from_byte(0x14), Some(OpCode::Add));
        assert_eq!(OpCode::from_byte(0x25), Some(OpCode::Jnz));

        assert_eq!(OpCode::from_byte(0x00), None);
        assert_eq!(OpCode::from_byte(0x1C), None);
        assert_eq!(OpCode::from_byte(0x2E), None);
        assert_eq!(OpCode::from_byte(0xFF), None);
    }

    #[test]
    fn test_every_defined_byte_round_trips() {
        let mut defined = 0;
        for byte in 0u8..=0xFF {
            if let Some(opcode) = OpCode::from_byte(byte) {
                assert_eq!(opcode.to_byte(), byte);
                let back: u8 = opcode.into();
                assert_eq!(back, byte);
                defined += 1;
            }
        }
        assert_eq!(defined, 44);
    }

    #[test]
    fn test_jump_opcodes() {
        assert!(OpCode::Jmp.is_jump());
        assert!(OpCode::Jsr.is_jump());
        assert!(OpCode::Jz.is_jump());
        assert!(OpCode::Jnz.is_jump());
        assert!(!OpCode::Retn.is_jump());
        assert!(!OpCode::MovSp.is_jump());
    }

    #[test]
    fn test_qualifier_round_trip() {
        for byte in 0u8..=0xFF {
            if let Some(qualifier) = TypeQualifier::from_byte(byte) {
                assert_eq!(qualifier.to_byte(), Some(byte));
            }
        }
        assert_eq!(TypeQualifier::from_byte(0x12), Some(TypeQualifier::Engine(2)));
        assert_eq!(TypeQualifier::from_byte(0x33), Some(TypeQualifier::EngineEngine(3)));
        assert_eq!(TypeQualifier::from_byte(0x02), None);
        assert_eq!(TypeQualifier::from_byte(0x1A), None);
    }

    #[test]
    fn test_engine_index_out_of_range_has_no_byte() {
        assert_eq!(TypeQualifier::Engine(9).to_byte(), Some(0x19));
        assert_eq!(TypeQualifier::Engine(10).to_byte(), None);
        assert_eq!(TypeQualifier::Engine(250).to_byte(), None);
        assert_eq!(TypeQualifier::EngineEngine(9).to_byte(), Some(0x39));
        assert_eq!(TypeQualifier::EngineEngine(0xF0).to_byte(), None);
    }

    #[test]
    fn test_qualifier_suffix() {
        assert_eq!(TypeQualifier::None.suffix(), "");
        assert_eq!(TypeQualifier::IntInt.suffix(), "II");
        assert_eq!(TypeQualifier::StructStruct.suffix(), "TT");
        assert_eq!(TypeQualifier::Engine(1).suffix(), "E1");
        assert_eq!(TypeQualifier::EngineEngine(0).suffix(), "E0E0");
    }
}
