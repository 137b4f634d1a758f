//! Little-endian byte sink with width-checked length fields.

use vesper_core::ContainerError;

type Result<T> = std::result::Result<T, ContainerError>;

/// `value` as a `u16` field, or `FieldOverflow`.
pub fn checked_u16(field: &'static str, value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| ContainerError::FieldOverflow { field, value })
}

/// `value` as a `u32` field, or `FieldOverflow`.
pub fn checked_u32(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| ContainerError::FieldOverflow { field, value })
}

/// Growable output buffer. Every multi-byte value is written little-endian.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a count or length into a `u16` field.
    pub fn len_u16(&mut self, field: &'static str, value: usize) -> Result<()> {
        self.u16(checked_u16(field, value)?);
        Ok(())
    }

    /// Write a count or length into a `u32` field.
    pub fn len_u32(&mut self, field: &'static str, value: usize) -> Result<()> {
        self.u32(checked_u32(field, value)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
