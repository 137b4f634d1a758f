//! Vesper
//!
//! Compiler backend for the Vesper stack VM: bound tree in, bytecode
//! containers out.
//!
//! ## Crates
//!
//! - [`ast`]: the bound tree handed over by the front end
//! - [`compiler`]: constant pools, slot allocation, code generation, blocks
//!   and modules
//! - [`container`]: library and executable binary containers
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use vesper::ast::{AstBuilder, BinaryOp, ScalarType};
//! use vesper::{CompilerOptions, Span, build_executable, read_executable};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let at = Span::line(1);
//! let sum = b.binary(b.int(2, at), BinaryOp::Add, b.int(3, at), ScalarType::Int, at);
//! let main = b.function("main", &[], b.block(&[b.print(sum, at), b.ret(None, at)], at), at);
//! let unit = b.unit("script", &[main], true, at);
//!
//! let bytes = build_executable(&unit, &CompilerOptions::default()).unwrap();
//! let image = read_executable(&bytes).unwrap();
//! assert!(image.entry().is_some());
//! ```

use std::path::Path;

use tracing::debug;

pub use vesper_ast as ast;
pub use vesper_compiler as compiler;
pub use vesper_container as container;

pub use vesper_compiler::bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode, disassemble};
pub use vesper_compiler::{Block, CompilerOptions, Function, Module, ModuleBuilder, Reference, Version};
pub use vesper_container::{
    ExecutableImage, LibraryImage, read_executable, read_library, serialize_executable,
    serialize_library, write_to_file,
};
pub use vesper_core::{CompilationError, ContainerError, Span, VesperError};

use vesper_ast::BlockDecl;

type Result<T> = std::result::Result<T, VesperError>;

/// Compile `units` in order into a module named `name` and serialize it as a
/// library container.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn build_library(name: &str, units: &[BlockDecl<'_>], options: &CompilerOptions) -> Result<Vec<u8>> {
    let mut builder = ModuleBuilder::new(name, options);
    for unit in units {
        builder.add_block(unit)?;
    }
    let module = builder.finish()?;
    Ok(serialize_library(&module, options)?)
}

/// Compile one implicit unit and serialize it as a single-file executable.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn build_executable(unit: &BlockDecl<'_>, options: &CompilerOptions) -> Result<Vec<u8>> {
    let block = Block::compile(unit, options)?;
    Ok(serialize_executable(&block, options)?)
}

/// [`build_library`], then write the container to `path`.
pub fn write_library(
    path: impl AsRef<Path>,
    name: &str,
    units: &[BlockDecl<'_>],
    options: &CompilerOptions,
) -> Result<()> {
    let bytes = build_library(name, units, options)?;
    debug!(module = name, bytes = bytes.len(), "library ready");
    write_to_file(path, &bytes)?;
    Ok(())
}

/// [`build_executable`], then write the container to `path`.
pub fn write_executable(
    path: impl AsRef<Path>,
    unit: &BlockDecl<'_>,
    options: &CompilerOptions,
) -> Result<()> {
    let bytes = build_executable(unit, options)?;
    write_to_file(path, &bytes)?;
    Ok(())
}
