//! Library container: a whole module with its name and reference tables.

use tracing::debug;
use vesper_compiler::{CompilerOptions, Module, NameTable, Reference};
use vesper_core::ContainerError;

use crate::function::write_function;
use crate::writer::ByteWriter;
use crate::{LIBRARY_MAGIC, LITTLE_ENDIAN};

type Result<T> = std::result::Result<T, ContainerError>;

/// Serialize `module` into a library container.
///
/// Version and name indices come from the module; `options` only decides
/// whether line arrays are written.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn serialize_library(module: &Module, options: &CompilerOptions) -> Result<Vec<u8>> {
    let names = module.names();
    let mut w = ByteWriter::new();

    w.bytes(LIBRARY_MAGIC);
    w.u8(LITTLE_ENDIAN);
    let version = module.version();
    w.u16(version.major);
    w.u16(version.minor);
    w.u16(version.patch);
    w.u16(version.build);

    w.len_u32("name_count", names.len())?;
    w.bytes(names.pool().bytes());

    w.u32(0); // dep_count
    w.u32(0); // type_ref_count

    let references = module.references();
    w.len_u32("func_ref_count", references.len())?;
    for reference in references {
        w.u32(reference.kind().into());
        match reference {
            Reference::Internal { block, item } => {
                w.u32(*block);
                w.u32(*item);
            }
            Reference::Native { index } => w.u32(*index),
            Reference::External { block, item } => {
                w.u32(name_index(names, block)?);
                w.u32(name_index(names, item)?);
            }
        }
    }

    let blocks = module.blocks();
    w.len_u32("block_count", blocks.len())?;
    for block in blocks {
        w.u32(name_index(names, &block.name)?);
        w.len_u32("string_count", block.constants.len())?;
        w.bytes(block.constants.bytes());
        w.u32(0); // type_count

        w.len_u32("function_count", block.functions.len())?;
        for function in &block.functions {
            let params = function
                .params
                .iter()
                .map(|p| name_index(names, p))
                .collect::<Result<Vec<_>>>()?;
            write_function(
                &mut w,
                function,
                name_index(names, &function.name)?,
                &params,
                options.emit_line_info,
            )?;
        }
    }

    debug!(
        module = module.name(),
        blocks = blocks.len(),
        bytes = w.len(),
        "serialized library"
    );
    Ok(w.into_bytes())
}

fn name_index(names: &NameTable, name: &str) -> Result<u32> {
    names
        .index_of(name)
        .ok_or_else(|| ContainerError::MissingName {
            name: name.to_string(),
        })
}
