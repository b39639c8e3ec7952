use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Byte order of multi-byte fields in a file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Bounds-checked read cursor over a borrowed byte buffer.
///
/// The position always stays within `[0, len]`. A read that would run past
/// the end fails with `TruncatedData` and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    pos: usize,
    endianness: Endianness,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            pos: 0,
            endianness,
        }
    }

    /// Create a cursor and consume the leading signature.
    ///
    /// Fails with `FormatMismatch` when the first `signature.len()` bytes differ,
    /// including when the buffer is shorter than the signature.
    pub fn open(data: &'a [u8], signature: &[u8], endianness: Endianness) -> Result<Self> {
        let found = &data[..signature.len().min(data.len())];
        if found != signature {
            return Err(Error::FormatMismatch {
                expected: signature.to_vec(),
                found: found.to_vec(),
            });
        }
        Ok(Self {
            data,
            pos: signature.len(),
            endianness,
        })
    }

    /// Current byte position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Reposition to an absolute offset; `len()` itself is a valid position
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::OutOfRange {
                offset,
                len: self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Skip reserved bytes without interpreting them
    pub fn ignore(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read `n` raw bytes without copying
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read `count` elements of `elem_size` bytes each as one contiguous slice
    pub fn read_array(&mut self, count: usize, elem_size: usize) -> Result<&'a [u8]> {
        let total = count.checked_mul(elem_size).ok_or(Error::TruncatedData {
            offset: self.pos,
            need: usize::MAX,
            have: self.remaining(),
        })?;
        self.take(total)
    }

    /// Read `count` bytes at an absolute offset, restoring the position afterwards
    pub fn read_array_at(&mut self, offset: usize, count: usize) -> Result<&'a [u8]> {
        let saved = self.pos;
        self.seek(offset)?;
        let result = self.take(count);
        self.pos = saved;
        result
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_u16(bytes),
            Endianness::Big => BigEndian::read_u16(bytes),
        })
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_i16(bytes),
            Endianness::Big => BigEndian::read_i16(bytes),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        })
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_i32(bytes),
            Endianness::Big => BigEndian::read_i32(bytes),
        })
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_f32(bytes),
            Endianness::Big => BigEndian::read_f32(bytes),
        })
    }

    /// Read a fixed-width string field.
    ///
    /// The field is cut at the first NUL byte, then trailing spaces are trimmed.
    /// Bytes that are not valid UTF-8 decode to U+FFFD, so such names cannot be
    /// matched by their raw bytes afterwards.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.take(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let text = String::from_utf8_lossy(&bytes[..end]);
        Ok(text.trim_end_matches(' ').to_string())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::TruncatedData {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}
