//! Expression compiler.
//!
//! The [`ExprCompiler`] lowers bound expressions to stack code. Every
//! expression leaves exactly one value on the operand stack.
//!
//! Assignment is lowered only at statement level through
//! [`ExprCompiler::compile_assignment`]; the instruction set has no duplicate
//! opcode, so an assignment nested inside a larger expression cannot keep its
//! value on the stack.

mod assignment;
mod binary;
mod identifiers;
mod literals;

use vesper_ast::{AssignExpr, Expr};
use vesper_core::CompilationError;

use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles expressions to bytecode.
pub struct ExprCompiler<'a, 'ctx, 'pool> {
    /// Compilation context with local scope and options
    ctx: &'a mut CompilationContext<'ctx>,
    /// Bytecode emitter
    emitter: &'a mut BytecodeEmitter<'pool>,
}

impl<'a, 'ctx, 'pool> ExprCompiler<'a, 'ctx, 'pool> {
    /// Create a new expression compiler.
    pub fn new(
        ctx: &'a mut CompilationContext<'ctx>,
        emitter: &'a mut BytecodeEmitter<'pool>,
    ) -> Self {
        Self { ctx, emitter }
    }

    /// Compile an expression, leaving its value on the stack.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(&mut self, expr: &Expr<'ast>) -> Result<()> {
        match expr {
            Expr::Literal(lit) => literals::compile_literal(self, &lit.kind, lit.span),
            Expr::Ident(ident) => identifiers::compile_ident(self, ident),
            Expr::Binary(bin) => binary::compile_binary(self, bin),
            Expr::Paren(p) => self.compile(p.expr),
            Expr::Assign(assign) => Err(CompilationError::Unimplemented {
                feature: "assignment used as a value".to_string(),
                span: assign.span,
            }),
        }
    }

    /// Compile `target = value` as a statement.
    pub fn compile_assignment<'ast>(&mut self, assign: &AssignExpr<'ast>) -> Result<()> {
        assignment::compile_assign(self, assign)
    }

    pub fn ctx(&self) -> &CompilationContext<'ctx> {
        self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut CompilationContext<'ctx> {
        self.ctx
    }

    pub fn emitter(&mut self) -> &mut BytecodeEmitter<'pool> {
        self.emitter
    }
}
