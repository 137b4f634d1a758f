//! Vesper Compiler
//!
//! Backend code generation for the Vesper stack VM. Input is a bound tree
//! from [`vesper_ast`]; output is a [`Module`] of compiled [`Block`]s ready for
//! the container writer.
//!
//! ## Pipeline
//!
//! - **Function**: [`FunctionCompiler`] walks one body, allocating slots
//!   through [`LocalScope`] and constants through the block's pool
//! - **Block**: [`Block::compile`] generates every function of a unit into
//!   one shared [`ConstantPool`](bytecode::ConstantPool)
//! - **Module**: [`ModuleBuilder`] orders blocks, resolves the reference
//!   table and builds the name table
//!
//! ## Modules
//!
//! - [`bytecode`]: Bytecode types (OpCode, BytecodeChunk, ConstantPool) and the disassembler
//! - [`emit`]: High-level bytecode emitter
//! - [`expr`]: Expression compiler
//! - [`stmt`]: Statement compiler
//! - [`scope`]: Local slot allocation
//! - [`references`]: Internal, native and external function references
//! - [`module`]: Module assembly and the name table

mod block;
pub mod bytecode;
mod context;
pub mod emit;
pub mod expr;
mod function;
mod function_compiler;
pub mod module;
mod options;
pub mod references;
pub mod scope;
pub mod stmt;

pub use block::Block;
pub use context::CompilationContext;
pub use emit::BytecodeEmitter;
pub use expr::ExprCompiler;
pub use function::Function;
pub use function_compiler::FunctionCompiler;
pub use module::{Module, ModuleBuilder, NameTable};
pub use options::{CompilerOptions, Version};
pub use references::{PendingReference, Reference, ReferenceKind, ReferenceTable, SymbolIndex};
pub use scope::{LocalScope, LocalVar, MAX_LOCALS};
pub use stmt::StmtCompiler;

// Re-export CompilationError from core for convenience
pub use vesper_core::CompilationError;
