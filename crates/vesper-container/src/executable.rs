//! Single-file executable container: one implicit block, no module tables.
//!
//! Function and parameter names are appended to a copy of the block's pool
//! so the whole file carries a single constant table. The block itself is
//! left untouched.

use rustc_hash::FxHashMap;
use tracing::debug;
use vesper_compiler::bytecode::ConstantPool;
use vesper_compiler::{Block, CompilerOptions};
use vesper_core::ContainerError;

use crate::function::write_function;
use crate::writer::ByteWriter;
use crate::{EXECUTABLE_MAGIC, LITTLE_ENDIAN};

type Result<T> = std::result::Result<T, ContainerError>;

/// Serialize `block` as a single-file executable.
///
/// The entry-point flag is the block's `has_implicit_entry`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn serialize_executable(block: &Block, options: &CompilerOptions) -> Result<Vec<u8>> {
    let mut table = NameAppender::new(&block.constants);
    let mut records = Vec::with_capacity(block.functions.len());
    for function in &block.functions {
        let name = table.index(&function.name)?;
        let params = function
            .params
            .iter()
            .map(|p| table.index(p))
            .collect::<Result<Vec<_>>>()?;
        records.push((function, name, params));
    }
    let constants = table.finish();

    let (major, minor) = options.executable_version;
    let mut w = ByteWriter::new();
    w.bytes(EXECUTABLE_MAGIC);
    w.u8(LITTLE_ENDIAN);
    w.u8(major);
    w.u8(minor);

    w.len_u32("constant_count", constants.len())?;
    w.bytes(constants.bytes());

    w.bool(block.has_implicit_entry);
    w.len_u32("function_count", records.len())?;
    for (function, name, params) in &records {
        write_function(&mut w, function, *name, params, options.emit_line_info)?;
    }

    debug!(
        block = %block.name,
        functions = records.len(),
        constants = constants.len(),
        bytes = w.len(),
        "serialized executable"
    );
    Ok(w.into_bytes())
}

/// Appends each distinct name once to a copy of a block pool.
struct NameAppender {
    pool: ConstantPool,
    appended: FxHashMap<String, u32>,
}

impl NameAppender {
    fn new(constants: &ConstantPool) -> Self {
        Self {
            pool: constants.clone(),
            appended: FxHashMap::default(),
        }
    }

    fn index(&mut self, name: &str) -> Result<u32> {
        if let Some(&index) = self.appended.get(name) {
            return Ok(index);
        }
        let index = self
            .pool
            .add_string(name)
            .map_err(|err| ContainerError::UnencodableName {
                name: name.to_string(),
                message: err.to_string(),
            })?;
        self.appended.insert(name.to_string(), index);
        Ok(index)
    }

    fn finish(self) -> ConstantPool {
        self.pool
    }
}
