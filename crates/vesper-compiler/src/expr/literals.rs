//! Literal expression compilation.
//!
//! Every literal becomes a fresh constant-pool entry loaded by ordinal.

use vesper_ast::LiteralKind;
use vesper_core::Span;

use super::{ExprCompiler, Result};

/// Compile a literal expression.
pub fn compile_literal(
    compiler: &mut ExprCompiler<'_, '_, '_>,
    kind: &LiteralKind<'_>,
    span: Span,
) -> Result<()> {
    let emitter = compiler.emitter();
    match kind {
        LiteralKind::Int(value) => emitter.emit_int(*value, span),
        LiteralKind::UInt(value) => emitter.emit_uint(*value, span),
        LiteralKind::Float(value) => emitter.emit_f64(*value, span),
        LiteralKind::Str(value) => emitter.emit_string(value, span),
    }
}
