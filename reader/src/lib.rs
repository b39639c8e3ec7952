// Readers for RIM resource archives and compiled NCS scripts

pub mod archive;
pub mod bytecode;
pub mod config;
pub mod cursor;
pub mod error;
pub mod resource;
pub mod source;

pub use archive::{Resource, RimFile};
pub use bytecode::{Instruction, NcsFile, OpCode, Operand, ScriptProgram, TypeQualifier};
pub use config::ReaderConfig;
pub use cursor::{BinaryCursor, Endianness};
pub use error::{Error, Result};
pub use resource::{ResourceProvider, ResourceType};
pub use source::ByteSource;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
