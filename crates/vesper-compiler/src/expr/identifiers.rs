//! Identifier expression compilation.

use vesper_ast::IdentExpr;

use super::{ExprCompiler, Result};

/// Compile a read of a local variable or parameter.
pub fn compile_ident<'ast>(
    compiler: &mut ExprCompiler<'_, '_, '_>,
    ident: &IdentExpr<'ast>,
) -> Result<()> {
    let slot = compiler
        .ctx()
        .resolve_readable_local(ident.ident.name, ident.span)?;
    compiler.emitter().emit_load_local(slot, ident.span)
}
