use std::io;
use thiserror::Error;

/// Errors raised while opening or decoding a resource file
#[derive(Error, Debug)]
pub enum Error {
    #[error("Format mismatch: expected signature {expected:?}, found {found:?}")]
    FormatMismatch { expected: Vec<u8>, found: Vec<u8> },

    #[error("Truncated data at offset {offset:#x}: need {need} bytes, have {have}")]
    TruncatedData {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("Offset {offset:#x} out of range for buffer of {len} bytes")]
    OutOfRange { offset: usize, len: usize },

    #[error("Resource index out of range: {index} (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Unsupported instruction {opcode:#04x}/{qualifier:#04x} at offset {offset:#x}")]
    UnsupportedInstruction {
        opcode: u8,
        qualifier: u8,
        offset: usize,
    },

    #[error("Resource count {count} exceeds limit {limit}")]
    ResourceLimitExceeded { count: u32, limit: u32 },

    #[error("Declared program size {declared} does not match buffer length {actual}")]
    SizeMismatch { declared: u32, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, Error>;
