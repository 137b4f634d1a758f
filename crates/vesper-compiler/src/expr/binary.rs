//! Binary operator expression compilation.
//!
//! Only `+ - * /` on `int` and `float` operands are lowered. Both operands are
//! always evaluated, left before right, then the operator's opcode is emitted.

use vesper_ast::{BinaryExpr, BinaryOp, ScalarType};
use vesper_core::CompilationError;

use super::{ExprCompiler, Result};
use crate::bytecode::OpCode;

/// Compile a binary expression.
pub fn compile_binary<'ast>(
    compiler: &mut ExprCompiler<'_, '_, '_>,
    expr: &BinaryExpr<'ast>,
) -> Result<()> {
    let checked = compiler.ctx().options().checked_arithmetic;
    let opcode = arithmetic_opcode(expr, checked)?;

    compiler.compile(expr.left)?;
    compiler.compile(expr.right)?;
    compiler.emitter().emit(opcode);

    Ok(())
}

/// Pick the opcode for an arithmetic operator on the bound operand type.
fn arithmetic_opcode(expr: &BinaryExpr<'_>, checked: bool) -> Result<OpCode> {
    if !expr.op.is_arithmetic() {
        return Err(CompilationError::UnimplementedOperator {
            op: expr.op.to_string(),
            span: expr.span,
        });
    }

    let opcode = match (expr.operand_type, checked, expr.op) {
        (ScalarType::Float, _, BinaryOp::Add) => OpCode::AddF,
        (ScalarType::Float, _, BinaryOp::Sub) => OpCode::SubF,
        (ScalarType::Float, _, BinaryOp::Mul) => OpCode::MulF,
        (ScalarType::Float, _, BinaryOp::Div) => OpCode::DivF,

        (ScalarType::Int, false, BinaryOp::Add) => OpCode::AddI,
        (ScalarType::Int, false, BinaryOp::Sub) => OpCode::SubI,
        (ScalarType::Int, false, BinaryOp::Mul) => OpCode::MulI,
        (ScalarType::Int, false, BinaryOp::Div) => OpCode::DivI,

        (ScalarType::Int, true, BinaryOp::Add) => OpCode::AddIChecked,
        (ScalarType::Int, true, BinaryOp::Sub) => OpCode::SubIChecked,
        (ScalarType::Int, true, BinaryOp::Mul) => OpCode::MulIChecked,
        (ScalarType::Int, true, BinaryOp::Div) => OpCode::DivIChecked,

        (ty, _, op) => {
            return Err(CompilationError::Unimplemented {
                feature: format!("'{op}' on {ty} operands"),
                span: expr.span,
            });
        }
    };

    Ok(opcode)
}
