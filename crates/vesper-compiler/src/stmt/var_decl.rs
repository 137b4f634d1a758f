//! Variable declaration compilation.
//!
//! `var x = init;` declares one local. The slot is allocated before the
//! initializer is generated but stays uninitialized until the store, so
//! `var x = x;` is a read-before-init error.

use vesper_ast::VarDeclStmt;
use vesper_core::CompilationError;

use super::{Result, StmtCompiler};

impl<'a, 'ctx, 'pool> StmtCompiler<'a, 'ctx, 'pool> {
    /// Compile a variable declaration statement.
    pub fn compile_var_decl<'ast>(&mut self, decl: &VarDeclStmt<'ast>) -> Result<()> {
        let [var] = decl.vars else {
            return Err(CompilationError::Unimplemented {
                feature: format!(
                    "multi-declarator variable declaration ({} declarators)",
                    decl.vars.len()
                ),
                span: decl.span,
            });
        };

        let slot = self.ctx.declare_local(var.name.name, var.span)?;

        if let Some(init) = var.init {
            self.expr_compiler().compile(init)?;
            self.emitter.emit_store_local(slot, var.span)?;
            self.ctx.mark_local_initialized(slot);
        }

        Ok(())
    }
}
