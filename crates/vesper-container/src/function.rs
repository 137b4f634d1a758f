//! Per-function record, shared by the library and executable layouts.
//!
//! ```text
//! name_index: u32
//! arity: u16, params: { name_index: u32 }[arity]
//! max_locals: u16, max_stack: u16
//! code_length: u32, code: byte[code_length]
//! has_lines: u8, lines: i32[code_length] (only when has_lines = 1)
//! ```

use vesper_compiler::Function;
use vesper_core::ContainerError;

use crate::reader::ByteReader;
use crate::writer::ByteWriter;

type Result<T> = std::result::Result<T, ContainerError>;

/// A function record as read back from a container.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionImage {
    pub name_index: u32,
    pub param_indices: Vec<u32>,
    pub max_locals: u16,
    pub max_stack: u16,
    pub code: Vec<u8>,
    /// Present when the writer emitted line info.
    pub lines: Option<Vec<i32>>,
}

impl FunctionImage {
    pub fn arity(&self) -> usize {
        self.param_indices.len()
    }
}

/// Write one function record. `params` are the name indices of its
/// parameters, in order.
pub(crate) fn write_function(
    w: &mut ByteWriter,
    function: &Function,
    name_index: u32,
    params: &[u32],
    emit_lines: bool,
) -> Result<()> {
    debug_assert_eq!(params.len(), function.arity());

    w.u32(name_index);
    w.len_u16("arity", params.len())?;
    for &param in params {
        w.u32(param);
    }
    w.len_u16("max_locals", function.max_locals as usize)?;
    w.len_u16("max_stack", function.max_stack as usize)?;

    let code = function.chunk.code();
    w.len_u32("code_length", code.len())?;
    w.bytes(code);

    w.bool(emit_lines);
    if emit_lines {
        for &line in function.chunk.lines() {
            let line = i32::try_from(line).map_err(|_| ContainerError::FieldOverflow {
                field: "line",
                value: line as usize,
            })?;
            w.i32(line);
        }
    }
    Ok(())
}

pub(crate) fn read_function(r: &mut ByteReader<'_>) -> Result<FunctionImage> {
    let name_index = r.u32()?;
    let arity = r.u16()?;
    let mut param_indices = Vec::with_capacity(arity as usize);
    for _ in 0..arity {
        param_indices.push(r.u32()?);
    }
    let max_locals = r.u16()?;
    let max_stack = r.u16()?;
    let code_len = r.u32()? as usize;
    let code = r.bytes(code_len)?.to_vec();

    let lines = if r.bool()? {
        let mut lines = Vec::with_capacity(code_len.min(r.remaining() / 4));
        for _ in 0..code_len {
            lines.push(r.i32()?);
        }
        Some(lines)
    } else {
        None
    };

    Ok(FunctionImage {
        name_index,
        param_indices,
        max_locals,
        max_stack,
        code,
        lines,
    })
}
