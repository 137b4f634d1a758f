//! Bytecode types for the Vesper compiler.
//!
//! This module contains the core bytecode types:
//!
//! - [`OpCode`] - The instruction set for the VM
//! - [`BytecodeChunk`] - Compiled bytecode for a function
//! - [`Constant`] and [`ConstantPool`] - Block-level constant storage
//! - [`disassemble`] - Human-readable listing of a chunk

mod chunk;
mod constant;
mod disasm;
mod opcode;

pub use chunk::BytecodeChunk;
pub use constant::{Constant, ConstantError, ConstantPool, ConstantTag};
pub use disasm::disassemble;
pub use opcode::{OpCode, SHORT_SLOT_MAX};
