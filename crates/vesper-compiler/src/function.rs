//! Compiled functions.

use crate::bytecode::BytecodeChunk;

/// A frozen, compiled function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name, unique within its block.
    pub name: String,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// High-water mark of simultaneously live slots.
    pub max_locals: u32,
    /// Deepest operand stack the code reaches.
    pub max_stack: u32,
    /// Compiled bytecode.
    pub chunk: BytecodeChunk,
}

impl Function {
    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
