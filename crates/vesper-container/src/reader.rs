//! Conformant reader for both container variants.
//!
//! Parses what the writers produce into plain images for inspection and
//! round-trip checks. Nothing is resolved or executed.

use vesper_compiler::bytecode::{ConstantError, ConstantPool};
use vesper_compiler::{Reference, ReferenceKind, Version};
use vesper_core::ContainerError;

use crate::function::{FunctionImage, read_function};
use crate::{EXECUTABLE_MAGIC, LIBRARY_MAGIC, LITTLE_ENDIAN};

type Result<T> = std::result::Result<T, ContainerError>;

// ============================================================================
// Cursor
// ============================================================================

/// Forward-only cursor over a container buffer.
pub(crate) struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn bytes(&mut self, needed: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(needed)
            .filter(|&end| end <= self.buf.len())
            .ok_or(ContainerError::Truncated {
                offset: self.pos,
                needed,
            })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub(crate) fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    pub(crate) fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub(crate) fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    /// A `count`-prefixed tagged-bytes table.
    pub(crate) fn pool(&mut self) -> Result<ConstantPool> {
        let count = self.u32()? as usize;
        let start = self.pos;
        let (pool, consumed) =
            ConstantPool::from_bytes(&self.buf[start..], count).map_err(|err| match err {
                ConstantError::Truncated { offset } => ContainerError::Truncated {
                    offset: start + offset,
                    needed: 1,
                },
                ConstantError::InvalidTag { offset, tag } => ContainerError::InvalidTag {
                    offset: start + offset,
                    tag,
                },
                ConstantError::UnterminatedString { offset } => {
                    ContainerError::MalformedConstant {
                        offset: start + offset,
                        message: err.to_string(),
                    }
                }
                other => ContainerError::MalformedConstant {
                    offset: start,
                    message: other.to_string(),
                },
            })?;
        self.pos += consumed;
        Ok(pool)
    }

    fn magic(&mut self, expected: &'static [u8], label: &'static str) -> Result<()> {
        let found = self
            .bytes(expected.len())
            .map_err(|_| ContainerError::BadMagic { expected: label })?;
        if found != expected {
            return Err(ContainerError::BadMagic { expected: label });
        }
        Ok(())
    }

    fn endianness(&mut self) -> Result<()> {
        match self.u8()? {
            LITTLE_ENDIAN => Ok(()),
            other => Err(ContainerError::UnsupportedEndianness(other)),
        }
    }
}

// ============================================================================
// Library
// ============================================================================

/// A parsed library container.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryImage {
    pub version: Version,
    /// Module name table.
    pub names: ConstantPool,
    /// Function references, external names resolved through `names`.
    pub references: Vec<Reference>,
    pub blocks: Vec<BlockImage>,
}

impl LibraryImage {
    /// Name stored at `index` of the module name table.
    pub fn name(&self, index: u32) -> Option<String> {
        string_at(&self.names, index)
    }

    /// Module name, always entry 0.
    pub fn module_name(&self) -> Option<String> {
        self.name(0)
    }
}

/// One block of a library container.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockImage {
    pub name_index: u32,
    pub constants: ConstantPool,
    pub functions: Vec<FunctionImage>,
}

/// Parse a library container.
pub fn read_library(bytes: &[u8]) -> Result<LibraryImage> {
    let mut r = ByteReader::new(bytes);
    r.magic(LIBRARY_MAGIC, "VESPERMODULE")?;
    r.endianness()?;
    let version = Version::new(r.u16()?, r.u16()?, r.u16()?, r.u16()?);
    let names = r.pool()?;

    // dependency and type tables are reserved and always empty
    let _dep_count = r.u32()?;
    let _type_ref_count = r.u32()?;

    let ref_count = r.u32()?;
    let mut references = Vec::new();
    for _ in 0..ref_count {
        let raw = r.u32()?;
        let kind =
            ReferenceKind::try_from(raw).map_err(|_| ContainerError::InvalidReferenceKind(raw))?;
        let reference = match kind {
            ReferenceKind::Internal => Reference::Internal {
                block: r.u32()?,
                item: r.u32()?,
            },
            ReferenceKind::Native => Reference::Native { index: r.u32()? },
            ReferenceKind::External => {
                let block = r.u32()?;
                let item = r.u32()?;
                Reference::External {
                    block: required_name(&names, block)?,
                    item: required_name(&names, item)?,
                }
            }
        };
        references.push(reference);
    }

    let block_count = r.u32()?;
    let mut blocks = Vec::new();
    for _ in 0..block_count {
        let name_index = r.u32()?;
        let constants = r.pool()?;
        let _type_count = r.u32()?;
        let function_count = r.u32()?;
        let mut functions = Vec::new();
        for _ in 0..function_count {
            functions.push(read_function(&mut r)?);
        }
        blocks.push(BlockImage {
            name_index,
            constants,
            functions,
        });
    }

    Ok(LibraryImage {
        version,
        names,
        references,
        blocks,
    })
}

// ============================================================================
// Executable
// ============================================================================

/// A parsed single-file executable container.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableImage {
    pub major: u8,
    pub minor: u8,
    /// Block constants followed by the appended function and parameter names.
    pub constants: ConstantPool,
    /// The first function is the entry point.
    pub has_implicit_function: bool,
    pub functions: Vec<FunctionImage>,
}

impl ExecutableImage {
    pub fn name(&self, index: u32) -> Option<String> {
        string_at(&self.constants, index)
    }

    pub fn entry(&self) -> Option<&FunctionImage> {
        if self.has_implicit_function {
            self.functions.first()
        } else {
            None
        }
    }
}

/// Parse a single-file executable container.
pub fn read_executable(bytes: &[u8]) -> Result<ExecutableImage> {
    let mut r = ByteReader::new(bytes);
    r.magic(EXECUTABLE_MAGIC, "VESPER")?;
    r.endianness()?;
    let major = r.u8()?;
    let minor = r.u8()?;
    let constants = r.pool()?;
    let has_implicit_function = r.bool()?;
    let function_count = r.u32()?;
    let mut functions = Vec::new();
    for _ in 0..function_count {
        functions.push(read_function(&mut r)?);
    }

    Ok(ExecutableImage {
        major,
        minor,
        constants,
        has_implicit_function,
        functions,
    })
}

fn string_at(pool: &ConstantPool, index: u32) -> Option<String> {
    match pool.get(index)? {
        vesper_compiler::bytecode::Constant::Str(s) => Some(s),
        _ => None,
    }
}

fn required_name(pool: &ConstantPool, index: u32) -> Result<String> {
    string_at(pool, index).ok_or_else(|| ContainerError::MissingName {
        name: format!("#{index}"),
    })
}
