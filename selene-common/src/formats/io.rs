//! Primitive readers and writers shared by all formats.

use std::io::Write;

use crate::FormatError;

/// Write a slice of floats as consecutive little-endian `f32` values.
pub fn write_f32s<W: Write>(w: &mut W, values: &[f32]) -> Result<(), FormatError> {
    for value in values {
        w.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Write a length-prefixed ASCII string.
///
/// Non-ASCII characters are dropped before the length is taken, so the count
/// always matches the bytes that follow. An empty string is written as a
/// lone zero count, which readers treat as "absent".
pub fn write_string<W: Write>(w: &mut W, s: &str) -> Result<(), FormatError> {
    let ascii: Vec<u8> = s.chars().filter(char::is_ascii).map(|c| c as u8).collect();
    let len = u16::try_from(ascii.len()).map_err(|_| FormatError::StringTooLong {
        len: ascii.len(),
    })?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(&ascii)?;
    Ok(())
}

/// Little-endian cursor over a byte slice.
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current position from the start of the data
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(FormatError::UnexpectedEof {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, FormatError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read `N` consecutive `f32` values
    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N], FormatError> {
        let mut out = [0.0f32; N];
        for value in out.iter_mut() {
            *value = self.read_f32()?;
        }
        Ok(out)
    }

    /// Read `N` consecutive `u32` values
    pub fn read_u32_array<const N: usize>(&mut self) -> Result<[u32; N], FormatError> {
        let mut out = [0u32; N];
        for value in out.iter_mut() {
            *value = self.read_u32()?;
        }
        Ok(out)
    }

    /// Read a `u16` length-prefixed ASCII string
    pub fn read_string(&mut self) -> Result<String, FormatError> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Fail if any bytes are left unread
    pub fn finish(self, format: &'static str) -> Result<(), FormatError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(FormatError::TrailingBytes { format, count }),
        }
    }
}
