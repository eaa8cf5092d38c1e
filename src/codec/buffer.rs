//! Word-oriented byte reader and padding helpers

use alloy_primitives::U256;

use crate::error::{AbiError, Result};

/// Size of one ABI word
pub const WORD: usize = 32;

/// Largest offset or length accepted from a payload (pointers are u32 values padded to a word)
const MAX_OFFSET: u64 = u32::MAX as u64;

/// Cursor over one encoded region; pointers read from it are relative to the region start
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take `len` bytes and advance
    pub fn read(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(AbiError::decode(format!(
                "unexpected end of buffer: need {} bytes at offset {}, have {}",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_word(&mut self) -> Result<&'a [u8]> {
        self.read(WORD)
    }

    /// Read a word holding an offset or a length
    pub fn read_usize(&mut self) -> Result<usize> {
        let value = U256::from_be_slice(self.read_word()?);
        if value > U256::from(MAX_OFFSET) {
            return Err(AbiError::decode(format!("offset/length {} too large", value)));
        }
        Ok(value.to::<u64>() as usize)
    }

    /// New region starting at the current position
    pub fn region(&self) -> Reader<'a> {
        Reader::new(&self.data[self.pos..])
    }

    /// New region starting `offset` bytes after this region's start
    pub fn jump(&self, offset: usize) -> Result<Reader<'a>> {
        if offset > self.data.len() {
            return Err(AbiError::decode(format!(
                "pointer {} outside of {}-byte region",
                offset,
                self.data.len()
            )));
        }
        Ok(Reader::new(&self.data[offset..]))
    }
}

/// Big-endian word holding an offset or a length
pub(crate) fn usize_word(value: usize) -> [u8; WORD] {
    U256::from(value).to_be_bytes::<WORD>()
}

/// Bytes needed to pad `len` up to a word boundary
pub(crate) fn padding(len: usize) -> usize {
    (WORD - len % WORD) % WORD
}

/// Append `bytes` right-padded with zeros to a word boundary
pub(crate) fn push_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    out.resize(out.len() + padding(bytes.len()), 0);
}
