//! Return statement compilation.
//!
//! Return values are not lowered: every return is a bare `Return`.

use tracing::warn;
use vesper_ast::ReturnStmt;

use super::{Result, StmtCompiler};

impl<'a, 'ctx, 'pool> StmtCompiler<'a, 'ctx, 'pool> {
    /// Compile a return statement.
    pub fn compile_return<'ast>(&mut self, ret: &ReturnStmt<'ast>) -> Result<()> {
        if ret.value.is_some() {
            warn!(span = %ret.span, "return value ignored; emitting bare return");
        }
        self.emitter.emit_return();
        Ok(())
    }
}
