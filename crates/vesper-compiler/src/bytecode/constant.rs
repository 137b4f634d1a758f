//! Constant pool for compiled blocks.
//!
//! The pool stores literal values referenced by bytecode. Storage is a
//! self-describing tagged byte stream, the exact bytes the container writes:
//!
//! ```text
//! Int    : 0x01, i64 (LE)
//! Float  : 0x02, f64 (LE)
//! UInt   : 0x03, u64 (LE)
//! String : 0x04, len: u32 (LE), bytes[len], 0x00
//! ```
//!
//! An entry is addressed by its *ordinal*, the 0-based insertion index. The
//! ordinal is a logical handle, not a byte position: a side table built at
//! insertion maps each ordinal to the offset of its tag byte, and every read
//! goes through that table.
//!
//! The pool is append-only and never deduplicates. Inserting an equal value
//! twice yields two ordinals.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Unsigned 64-bit integer.
    UInt(u64),
    /// ASCII string without interior NUL.
    Str(String),
}

impl Constant {
    /// Tag byte this constant is stored under.
    pub fn tag(&self) -> ConstantTag {
        match self {
            Constant::Int(_) => ConstantTag::Int,
            Constant::Float(_) => ConstantTag::Float,
            Constant::UInt(_) => ConstantTag::UInt,
            Constant::Str(_) => ConstantTag::Str,
        }
    }
}

/// Tag byte that opens every pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ConstantTag {
    Int = 0x01,
    Float = 0x02,
    UInt = 0x03,
    Str = 0x04,
}

/// Why a value could not be stored or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstantError {
    #[error("string constant contains non-ASCII byte {byte:#04x}")]
    NonAscii { byte: u8 },

    #[error("string constant contains an interior NUL")]
    InteriorNul,

    #[error("constant pool exceeds u32 addressing")]
    Overflow,

    #[error("truncated constant at offset {offset}")]
    Truncated { offset: usize },

    #[error("invalid constant tag {tag:#04x} at offset {offset}")]
    InvalidTag { offset: usize, tag: u8 },

    #[error("string constant at offset {offset} is not NUL-terminated")]
    UnterminatedString { offset: usize },
}

/// Smallest encoded entry: an empty string (tag, length, NUL).
const MIN_ENTRY_LEN: usize = 6;

/// Block-level constant pool.
///
/// Shared by every function generated into one block. Functions are
/// generated one after another, each holding the only `&mut` borrow while
/// it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    /// Tagged entries, back to back.
    bytes: Vec<u8>,
    /// Ordinal -> offset of the entry's tag byte.
    offsets: Vec<usize>,
}

impl ConstantPool {
    /// Create a new empty constant pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constant, returning its ordinal.
    pub fn add(&mut self, constant: &Constant) -> Result<u32, ConstantError> {
        if let Constant::Str(s) = constant {
            validate_string(s)?;
        }
        let ordinal = u32::try_from(self.offsets.len()).map_err(|_| ConstantError::Overflow)?;

        let offset = self.bytes.len();
        self.bytes.push(constant.tag().into());
        match constant {
            Constant::Int(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Constant::Float(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Constant::UInt(v) => self.bytes.extend_from_slice(&v.to_le_bytes()),
            Constant::Str(s) => {
                let len = u32::try_from(s.len()).map_err(|_| ConstantError::Overflow)?;
                self.bytes.extend_from_slice(&len.to_le_bytes());
                self.bytes.extend_from_slice(s.as_bytes());
                self.bytes.push(0);
            }
        }
        self.offsets.push(offset);
        Ok(ordinal)
    }

    /// Add an integer constant.
    pub fn add_int(&mut self, value: i64) -> Result<u32, ConstantError> {
        self.add(&Constant::Int(value))
    }

    /// Add an unsigned integer constant.
    pub fn add_uint(&mut self, value: u64) -> Result<u32, ConstantError> {
        self.add(&Constant::UInt(value))
    }

    /// Add a 64-bit float constant.
    pub fn add_f64(&mut self, value: f64) -> Result<u32, ConstantError> {
        self.add(&Constant::Float(value))
    }

    /// Add an ASCII string constant.
    pub fn add_string(&mut self, value: &str) -> Result<u32, ConstantError> {
        self.add(&Constant::Str(value.to_string()))
    }

    /// Get constant by ordinal.
    pub fn get(&self, ordinal: u32) -> Option<Constant> {
        let offset = self.offset_of(ordinal)?;
        decode_entry(&self.bytes, offset).ok().map(|(c, _)| c)
    }

    /// Byte offset of the entry with the given ordinal.
    pub fn offset_of(&self, ordinal: u32) -> Option<usize> {
        self.offsets.get(ordinal as usize).copied()
    }

    /// Tagged byte stream (for serialization).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate constants in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Constant> + '_ {
        (0..self.offsets.len()).filter_map(|i| self.get(i as u32))
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Rebuild a pool from `count` tagged entries at the start of `bytes`.
    ///
    /// Returns the pool and the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8], count: usize) -> Result<(Self, usize), ConstantError> {
        let mut offsets = Vec::with_capacity(count.min(bytes.len() / MIN_ENTRY_LEN));
        let mut cursor = 0;
        for _ in 0..count {
            offsets.push(cursor);
            let (_, next) = decode_entry(bytes, cursor)?;
            cursor = next;
        }
        let pool = Self {
            bytes: bytes[..cursor].to_vec(),
            offsets,
        };
        Ok((pool, cursor))
    }
}

fn validate_string(s: &str) -> Result<(), ConstantError> {
    for &byte in s.as_bytes() {
        if byte == 0 {
            return Err(ConstantError::InteriorNul);
        }
        if !byte.is_ascii() {
            return Err(ConstantError::NonAscii { byte });
        }
    }
    Ok(())
}

/// Decode the entry whose tag byte is at `offset`.
///
/// Returns the constant and the offset just past the entry.
fn decode_entry(bytes: &[u8], offset: usize) -> Result<(Constant, usize), ConstantError> {
    let tag_byte = *bytes
        .get(offset)
        .ok_or(ConstantError::Truncated { offset })?;
    let tag = ConstantTag::try_from(tag_byte).map_err(|_| ConstantError::InvalidTag {
        offset,
        tag: tag_byte,
    })?;
    let payload = offset + 1;

    match tag {
        ConstantTag::Int => Ok((Constant::Int(i64::from_le_bytes(take8(bytes, payload)?)), payload + 8)),
        ConstantTag::Float => Ok((
            Constant::Float(f64::from_le_bytes(take8(bytes, payload)?)),
            payload + 8,
        )),
        ConstantTag::UInt => Ok((Constant::UInt(u64::from_le_bytes(take8(bytes, payload)?)), payload + 8)),
        ConstantTag::Str => {
            let len_bytes = bytes
                .get(payload..payload + 4)
                .ok_or(ConstantError::Truncated { offset: payload })?;
            let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]])
                as usize;
            let start = payload + 4;
            let text = bytes
                .get(start..start + len)
                .ok_or(ConstantError::Truncated { offset: start })?;
            match bytes.get(start + len) {
                Some(0) => {}
                Some(_) => return Err(ConstantError::UnterminatedString { offset }),
                None => return Err(ConstantError::Truncated { offset: start + len }),
            }
            if let Some(&byte) = text.iter().find(|b| !b.is_ascii()) {
                return Err(ConstantError::NonAscii { byte });
            }
            let text = String::from_utf8_lossy(text).into_owned();
            Ok((Constant::Str(text), start + len + 1))
        }
    }
}

fn take8(bytes: &[u8], offset: usize) -> Result<[u8; 8], ConstantError> {
    bytes
        .get(offset..offset + 8)
        .and_then(|s| s.try_into().ok())
        .ok_or(ConstantError::Truncated { offset })
}
