//! Statement compiler.
//!
//! The [`StmtCompiler`] lowers bound statements to bytecode, handling:
//! - Local declarations and assignments
//! - Nested blocks with slot reuse on exit
//! - The `print` debug intrinsic
//! - Bare returns
//!
//! Control flow (`if`, `while`, `loop`) is recognized and rejected until a
//! jump encoding exists.

mod block;
mod control_flow;
mod return_stmt;
mod var_decl;

use vesper_ast::{Expr, ExprStmt, PrintStmt, Stmt};
use vesper_core::CompilationError;

use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::expr::ExprCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles statements to bytecode.
pub struct StmtCompiler<'a, 'ctx, 'pool> {
    /// Compilation context with local scope and options
    ctx: &'a mut CompilationContext<'ctx>,
    /// Bytecode emitter
    emitter: &'a mut BytecodeEmitter<'pool>,
}

impl<'a, 'ctx, 'pool> StmtCompiler<'a, 'ctx, 'pool> {
    /// Create a new statement compiler.
    pub fn new(
        ctx: &'a mut CompilationContext<'ctx>,
        emitter: &'a mut BytecodeEmitter<'pool>,
    ) -> Self {
        Self { ctx, emitter }
    }

    /// Compile a statement.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(&mut self, stmt: &Stmt<'ast>) -> Result<()> {
        // Set line number for debug info
        self.emitter.set_line(stmt.span().line);

        match stmt {
            Stmt::Expr(expr_stmt) => self.compile_expr_stmt(expr_stmt),
            Stmt::VarDecl(var_decl) => self.compile_var_decl(var_decl),
            Stmt::Print(print) => self.compile_print(print),
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::Block(block) => self.compile_block(block),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::Loop(loop_stmt) => self.compile_loop(loop_stmt),
        }
    }

    /// Compile an expression statement.
    ///
    /// There is no pop opcode, so only assignment (which consumes its own
    /// value) can stand alone.
    fn compile_expr_stmt<'ast>(&mut self, expr_stmt: &ExprStmt<'ast>) -> Result<()> {
        match expr_stmt.expr.unparen() {
            Expr::Assign(assign) => self.expr_compiler().compile_assignment(assign),
            _ => Err(CompilationError::Unimplemented {
                feature: "expression statement without assignment".to_string(),
                span: expr_stmt.span,
            }),
        }
    }

    /// Compile `print(expr);`.
    fn compile_print<'ast>(&mut self, print: &PrintStmt<'ast>) -> Result<()> {
        self.expr_compiler().compile(print.expr)?;
        self.emitter.emit_print();
        Ok(())
    }

    /// Create an expression compiler using the current context.
    fn expr_compiler(&mut self) -> ExprCompiler<'_, 'ctx, 'pool> {
        ExprCompiler::new(self.ctx, self.emitter)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bytecode::{BytecodeChunk, ConstantPool, OpCode};
    use crate::options::CompilerOptions;
    use bumpalo::Bump;
    use vesper_ast::{AstBuilder, BinaryOp, ScalarType};
    use vesper_core::Span;

    /// Compile statements into a fresh function body.
    pub(crate) fn compile_stmts(
        stmts: &[Stmt<'_>],
        options: &CompilerOptions,
    ) -> Result<(BytecodeChunk, ConstantPool, u32)> {
        let mut ctx = CompilationContext::new(options);
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        {
            let mut compiler = StmtCompiler::new(&mut ctx, &mut emitter);
            for stmt in stmts {
                compiler.compile(stmt)?;
            }
        }
        let chunk = emitter.finish();
        let max_locals = ctx.end_function().max_locals();
        Ok((chunk, constants, max_locals))
    }

    #[test]
    fn var_then_print_golden() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let sum = b.binary(
            b.float(1.0, Span::new(1, 9)),
            BinaryOp::Add,
            b.float(2.0, Span::new(1, 15)),
            ScalarType::Float,
            Span::new(1, 9),
        );
        let stmts = [
            b.var("x", Some(sum), Span::line(1)),
            b.print(b.ident("x", Span::new(2, 7)), Span::line(2)),
        ];

        let (chunk, constants, max_locals) =
            compile_stmts(&stmts, &CompilerOptions::default()).unwrap();

        chunk.assert_opcodes(&[
            OpCode::Constant,
            OpCode::Constant,
            OpCode::AddF,
            OpCode::StoreLocal0,
            OpCode::LoadLocal0,
            OpCode::Print,
        ]);
        assert_eq!(chunk.read_u8(1), Some(0));
        assert_eq!(chunk.read_u8(3), Some(1));
        assert_eq!(constants.len(), 2);
        assert_eq!(max_locals, 1);
        assert_eq!(chunk.lines(), &[1, 1, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn assignment_statement() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [
            b.var("x", None, at),
            b.expr_stmt(b.assign(b.ident("x", at), b.int(3, at), at), at),
            b.print(b.ident("x", at), at),
        ];

        let (chunk, _, _) = compile_stmts(&stmts, &CompilerOptions::default()).unwrap();
        chunk.assert_opcodes(&[
            OpCode::Constant,
            OpCode::StoreLocal0,
            OpCode::LoadLocal0,
            OpCode::Print,
        ]);
    }

    #[test]
    fn assign_to_literal_is_fatal() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::new(4, 1);
        let stmts = [b.expr_stmt(b.assign(b.float(1.0, at), b.float(2.0, at), at), at)];

        assert_eq!(
            compile_stmts(&stmts, &CompilerOptions::default()).unwrap_err(),
            CompilationError::InvalidAssignmentTarget { span: at }
        );
    }

    #[test]
    fn bare_expression_statement_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [b.expr_stmt(b.int(1, at), at)];

        assert!(matches!(
            compile_stmts(&stmts, &CompilerOptions::default()),
            Err(CompilationError::Unimplemented { .. })
        ));
    }

    #[test]
    fn print_reads_require_initialization() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [b.var("x", None, at), b.print(b.ident("x", at), at)];

        assert!(matches!(
            compile_stmts(&stmts, &CompilerOptions::default()),
            Err(CompilationError::UninitializedRead { .. })
        ));
    }
}
