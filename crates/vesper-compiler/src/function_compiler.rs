//! Function compiler for generating bytecode from function bodies.
//!
//! [`FunctionCompiler`] compiles a single function's body to bytecode:
//!
//! - Parameters take the first slots, initialized, at depth 0
//! - Body statements are compiled at depth 0 alongside the parameters
//! - No implicit return is appended
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use vesper_ast::AstBuilder;
//! use vesper_compiler::bytecode::{ConstantPool, OpCode};
//! use vesper_compiler::{CompilationContext, CompilerOptions, FunctionCompiler};
//! use vesper_core::Span;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let at = Span::line(1);
//! let decl = b.function("show", &["value"], b.block(&[b.print(b.ident("value", at), at)], at), at);
//!
//! let options = CompilerOptions::default();
//! let mut ctx = CompilationContext::new(&options);
//! let mut constants = ConstantPool::new();
//!
//! let mut compiler = FunctionCompiler::new(&mut ctx, &mut constants, &decl);
//! compiler.setup_parameters().unwrap();
//! compiler.compile_body().unwrap();
//! let function = compiler.finish();
//!
//! function.chunk.assert_opcodes(&[OpCode::LoadLocal0, OpCode::Print]);
//! assert_eq!(function.max_locals, 1);
//! ```

use tracing::debug;
use vesper_ast::FunctionDecl;
use vesper_core::CompilationError;

use crate::bytecode::ConstantPool;
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::function::Function;
use crate::stmt::StmtCompiler;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles a single function body to bytecode.
pub struct FunctionCompiler<'a, 'ctx, 'pool, 'ast> {
    /// Compilation context for the local scope
    ctx: &'a mut CompilationContext<'ctx>,
    /// Bytecode emitter
    emitter: BytecodeEmitter<'pool>,
    /// Function being compiled
    decl: &'a FunctionDecl<'ast>,
}

impl<'a, 'ctx, 'pool, 'ast> FunctionCompiler<'a, 'ctx, 'pool, 'ast> {
    /// Create a new function compiler.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Compilation context
    /// * `constants` - Constant pool of the enclosing block
    /// * `decl` - The function declaration
    pub fn new(
        ctx: &'a mut CompilationContext<'ctx>,
        constants: &'pool mut ConstantPool,
        decl: &'a FunctionDecl<'ast>,
    ) -> Self {
        Self {
            ctx,
            emitter: BytecodeEmitter::new(constants),
            decl,
        }
    }

    /// Compile `decl` in one go.
    pub fn compile(
        ctx: &'a mut CompilationContext<'ctx>,
        constants: &'pool mut ConstantPool,
        decl: &'a FunctionDecl<'ast>,
    ) -> Result<Function> {
        let mut compiler = Self::new(ctx, constants, decl);
        compiler.setup_parameters()?;
        compiler.compile_body()?;
        Ok(compiler.finish())
    }

    /// Set up local scope with function parameters.
    pub fn setup_parameters(&mut self) -> Result<()> {
        self.ctx.begin_function();

        for param in self.decl.params {
            self.ctx.declare_param(param.name, param.span)?;
        }

        Ok(())
    }

    /// Compile the function body.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_body(&mut self) -> Result<()> {
        let mut stmt_compiler = StmtCompiler::new(self.ctx, &mut self.emitter);

        for stmt in self.decl.body.stmts {
            stmt_compiler.compile(stmt)?;
        }

        Ok(())
    }

    /// Finish compilation and return the frozen function.
    pub fn finish(self) -> Function {
        let locals = self.ctx.end_function();
        let max_stack = self.emitter.max_stack();
        let chunk = self.emitter.finish();

        let function = Function {
            name: self.decl.name.name.to_string(),
            params: self
                .decl
                .params
                .iter()
                .map(|p| p.name.to_string())
                .collect(),
            max_locals: locals.max_locals(),
            max_stack,
            chunk,
        };

        debug!(
            function = %function.name,
            code_len = function.chunk.len(),
            max_locals = function.max_locals,
            max_stack = function.max_stack,
            "compiled function"
        );

        function
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use crate::options::CompilerOptions;
    use bumpalo::Bump;
    use vesper_ast::{AstBuilder, BinaryOp, ScalarType};
    use vesper_core::Span;

    #[test]
    fn params_occupy_first_slots() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        // fn add(a, b) { var c = a + b; print(c); return; }
        let sum = b.binary(b.ident("a", at), BinaryOp::Add, b.ident("b", at), ScalarType::Int, at);
        let body = b.block(
            &[
                b.var("c", Some(sum), at),
                b.print(b.ident("c", at), at),
                b.ret(None, at),
            ],
            at,
        );
        let decl = b.function("add", &["a", "b"], body, at);

        let options = CompilerOptions::default();
        let mut ctx = CompilationContext::new(&options);
        let mut constants = ConstantPool::new();
        let function = FunctionCompiler::compile(&mut ctx, &mut constants, &decl).unwrap();

        function.chunk.assert_opcodes(&[
            OpCode::LoadLocal0,
            OpCode::LoadLocal1,
            OpCode::AddI,
            OpCode::StoreLocal2,
            OpCode::LoadLocal2,
            OpCode::Print,
            OpCode::Return,
        ]);
        assert_eq!(function.name, "add");
        assert_eq!(function.params, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(function.arity(), 2);
        assert_eq!(function.max_locals, 3);
        assert_eq!(function.max_stack, 2);
    }

    #[test]
    fn no_implicit_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.function("noop", &[], b.block(&[], Span::line(1)), Span::line(1));

        let options = CompilerOptions::default();
        let mut ctx = CompilationContext::new(&options);
        let mut constants = ConstantPool::new();
        let function = FunctionCompiler::compile(&mut ctx, &mut constants, &decl).unwrap();

        assert!(function.chunk.is_empty());
        assert_eq!(function.max_locals, 0);
        assert_eq!(function.max_stack, 0);
    }

    #[test]
    fn local_may_not_reuse_parameter_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(2);
        let body = b.block(&[b.var("a", None, at)], at);
        let decl = b.function("f", &["a"], body, Span::line(1));

        let options = CompilerOptions::default();
        let mut ctx = CompilationContext::new(&options);
        let mut constants = ConstantPool::new();

        assert!(matches!(
            FunctionCompiler::compile(&mut ctx, &mut constants, &decl),
            Err(CompilationError::VariableRedeclaration { .. })
        ));
    }

    #[test]
    fn too_many_locals_aborts() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let names: Vec<String> = (0..=crate::scope::MAX_LOCALS).map(|i| format!("v{i}")).collect();
        let stmts: Vec<_> = names.iter().map(|n| b.var(n, None, at)).collect();
        let decl = b.function("huge", &[], b.block(&stmts, at), at);

        let options = CompilerOptions::default();
        let mut ctx = CompilationContext::new(&options);
        let mut constants = ConstantPool::new();

        assert!(matches!(
            FunctionCompiler::compile(&mut ctx, &mut constants, &decl),
            Err(CompilationError::TooManyLocals { limit: 65536, .. })
        ));
    }
}
