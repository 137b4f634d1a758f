//! Bytecode emitter for the Vesper compiler.
//!
//! The [`BytecodeEmitter`] provides a high-level API for generating bytecode:
//! it picks short or long encodings for constants and locals, stamps every
//! byte with the current source line, and tracks the operand-stack depth.
//!
//! # Example
//!
//! ```
//! use vesper_compiler::bytecode::{ConstantPool, OpCode};
//! use vesper_compiler::emit::BytecodeEmitter;
//! use vesper_core::Span;
//!
//! let mut constants = ConstantPool::new();
//! let mut emitter = BytecodeEmitter::new(&mut constants);
//!
//! emitter.set_line(1);
//! emitter.emit_f64(1.0, Span::line(1)).unwrap();
//! emitter.emit_f64(2.0, Span::line(1)).unwrap();
//! emitter.emit(OpCode::AddF);
//! assert_eq!(emitter.max_stack(), 2);
//!
//! let chunk = emitter.finish();
//! chunk.assert_opcodes(&[OpCode::Constant, OpCode::Constant, OpCode::AddF]);
//! ```

use vesper_core::{CompilationError, Span};

use crate::bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode};

type Result<T> = std::result::Result<T, CompilationError>;

/// Emits bytecode instructions.
///
/// Constants go into the block's shared pool. Each `BytecodeEmitter`
/// produces bytecode for a single function.
pub struct BytecodeEmitter<'pool> {
    /// The bytecode chunk being built (per-function)
    chunk: BytecodeChunk,

    /// Block-level constant pool
    constants: &'pool mut ConstantPool,

    /// Current source line for debug info
    current_line: u32,

    /// Operand-stack depth after the last emitted instruction
    stack_depth: u32,

    /// High-water mark of `stack_depth`
    max_stack: u32,
}

impl<'pool> BytecodeEmitter<'pool> {
    /// Create a new bytecode emitter.
    pub fn new(constants: &'pool mut ConstantPool) -> Self {
        Self {
            chunk: BytecodeChunk::new(),
            constants,
            current_line: 1,
            stack_depth: 0,
            max_stack: 0,
        }
    }

    /// Set current source line for debug info.
    ///
    /// All subsequent instructions will be associated with this line number.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    /// Get current source line.
    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    fn track(&mut self, op: OpCode) {
        let depth = self.stack_depth as i64 + op.stack_effect() as i64;
        self.stack_depth = depth.max(0) as u32;
        self.max_stack = self.max_stack.max(self.stack_depth);
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.current_line);
        self.track(op);
    }

    /// Emit opcode with 8-bit operand.
    pub fn emit_byte(&mut self, op: OpCode, byte: u8) {
        self.emit(op);
        self.chunk.write_u8(byte, self.current_line);
    }

    /// Emit opcode with 32-bit operand.
    pub fn emit_u32(&mut self, op: OpCode, value: u32) {
        self.emit(op);
        self.chunk.write_u32(value, self.current_line);
    }

    /// Splice raw bytes into the chunk at `offset`.
    ///
    /// Stack depth is not adjusted; the caller owns the meaning of the bytes.
    pub fn insert_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.chunk.insert_bytes(offset, bytes, self.current_line);
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    /// Add a constant to the pool and emit its load.
    ///
    /// Ordinals below 256 use `Constant`, the rest `ConstantLong`.
    pub fn emit_constant(&mut self, constant: Constant, span: Span) -> Result<()> {
        let ordinal =
            self.constants
                .add(&constant)
                .map_err(|e| CompilationError::InvalidConstant {
                    message: e.to_string(),
                    span,
                })?;
        match u8::try_from(ordinal) {
            Ok(narrow) => self.emit_byte(OpCode::Constant, narrow),
            Err(_) => self.emit_u32(OpCode::ConstantLong, ordinal),
        }
        Ok(())
    }

    /// Emit a signed integer constant.
    pub fn emit_int(&mut self, value: i64, span: Span) -> Result<()> {
        self.emit_constant(Constant::Int(value), span)
    }

    /// Emit an unsigned integer constant.
    pub fn emit_uint(&mut self, value: u64, span: Span) -> Result<()> {
        self.emit_constant(Constant::UInt(value), span)
    }

    /// Emit a 64-bit float constant.
    pub fn emit_f64(&mut self, value: f64, span: Span) -> Result<()> {
        self.emit_constant(Constant::Float(value), span)
    }

    /// Emit an ASCII string constant.
    pub fn emit_string(&mut self, value: &str, span: Span) -> Result<()> {
        self.emit_constant(Constant::Str(value.to_string()), span)
    }

    // ==========================================================================
    // Local Variables
    // ==========================================================================

    /// Emit a load of `slot`.
    ///
    /// Slots 0-4 use the zero-operand forms, 5-255 the byte form.
    pub fn emit_load_local(&mut self, slot: u32, span: Span) -> Result<()> {
        if let Some(op) = OpCode::short_load(slot) {
            self.emit(op);
            return Ok(());
        }
        let narrow = narrow_slot(slot, span)?;
        self.emit_byte(OpCode::LoadLocal, narrow);
        Ok(())
    }

    /// Emit a store to `slot`.
    pub fn emit_store_local(&mut self, slot: u32, span: Span) -> Result<()> {
        if let Some(op) = OpCode::short_store(slot) {
            self.emit(op);
            return Ok(());
        }
        let narrow = narrow_slot(slot, span)?;
        self.emit_byte(OpCode::StoreLocal, narrow);
        Ok(())
    }

    // ==========================================================================
    // Control
    // ==========================================================================

    /// Emit return.
    pub fn emit_return(&mut self) {
        self.emit(OpCode::Return);
    }

    /// Emit the debug print intrinsic.
    pub fn emit_print(&mut self) {
        self.emit(OpCode::Print);
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Get the bytecode emitted so far.
    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }

    /// Get current bytecode offset.
    pub fn current_offset(&self) -> usize {
        self.chunk.current_offset()
    }

    /// Current operand-stack depth.
    pub fn stack_depth(&self) -> u32 {
        self.stack_depth
    }

    /// Deepest operand stack seen so far.
    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }

    /// Finish and return the bytecode chunk.
    pub fn finish(self) -> BytecodeChunk {
        self.chunk
    }
}

// LoadLocalLong/StoreLocalLong are reserved and never emitted.
fn narrow_slot(slot: u32, span: Span) -> Result<u8> {
    u8::try_from(slot).map_err(|_| CompilationError::Unimplemented {
        feature: "local addressing beyond slot 255".to_string(),
        span,
    })
}
