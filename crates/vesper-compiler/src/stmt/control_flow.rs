//! Control-flow statements.
//!
//! `if`, `while` and `loop` have no lowering yet. Branches would be built on
//! [`BytecodeEmitter::insert_bytes`](crate::emit::BytecodeEmitter::insert_bytes),
//! but no jump opcode or operand width exists to target, so each of these
//! reports the construct and stops.

use vesper_ast::{IfStmt, LoopStmt, WhileStmt};
use vesper_core::{CompilationError, Span};

use super::{Result, StmtCompiler};

fn unlowered(construct: &str, span: Span) -> CompilationError {
    CompilationError::Unimplemented {
        feature: format!("control-flow lowering ({construct})"),
        span,
    }
}

impl<'a, 'ctx, 'pool> StmtCompiler<'a, 'ctx, 'pool> {
    pub fn compile_if<'ast>(&mut self, if_stmt: &IfStmt<'ast>) -> Result<()> {
        Err(unlowered("if", if_stmt.span))
    }

    pub fn compile_while<'ast>(&mut self, while_stmt: &WhileStmt<'ast>) -> Result<()> {
        Err(unlowered("while", while_stmt.span))
    }

    pub fn compile_loop<'ast>(&mut self, loop_stmt: &LoopStmt<'ast>) -> Result<()> {
        Err(unlowered("loop", loop_stmt.span))
    }
}
