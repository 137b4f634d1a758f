//! Assignment compilation.
//!
//! Only simple assignment to a local is lowered: `name = value`. The value is
//! generated, stored into the target's slot, and the target becomes
//! initialized.

use vesper_ast::{AssignExpr, Expr};
use vesper_core::CompilationError;

use super::{ExprCompiler, Result};

/// Compile an assignment at statement level. Nothing is left on the stack.
pub fn compile_assign<'ast>(
    compiler: &mut ExprCompiler<'_, '_, '_>,
    assign: &AssignExpr<'ast>,
) -> Result<()> {
    let Expr::Ident(target) = assign.target.unparen() else {
        return Err(CompilationError::InvalidAssignmentTarget { span: assign.span });
    };

    let slot = compiler
        .ctx()
        .resolve_local(target.ident.name, target.span)?;

    compiler.compile(assign.value)?;
    compiler.emitter().emit_store_local(slot, assign.span)?;
    compiler.ctx_mut().mark_local_initialized(slot);

    Ok(())
}
