//! Byte sources a reader can be opened from

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Where the raw bytes of an archive or script come from
#[derive(Debug, Clone)]
pub enum ByteSource {
    Memory(Vec<u8>),
    File(PathBuf),
}

impl ByteSource {
    /// Materialize the source into an owned buffer
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ByteSource::Memory(bytes) => Ok(bytes),
            ByteSource::File(path) => {
                let bytes = fs::read(&path)?;
                log::debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
        }
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSource::Memory(bytes)
    }
}

impl From<&[u8]> for ByteSource {
    fn from(bytes: &[u8]) -> Self {
        ByteSource::Memory(bytes.to_vec())
    }
}

impl From<PathBuf> for ByteSource {
    fn from(path: PathBuf) -> Self {
        ByteSource::File(path)
    }
}

impl From<&Path> for ByteSource {
    fn from(path: &Path) -> Self {
        ByteSource::File(path.to_path_buf())
    }
}
