//! Block statement compilation.

use vesper_ast::Block;

use super::{Result, StmtCompiler};

impl<'a, 'ctx, 'pool> StmtCompiler<'a, 'ctx, 'pool> {
    /// Compile a block statement.
    ///
    /// Locals declared inside are freed on exit, and their slots are handed
    /// out again by later declarations.
    pub fn compile_block<'ast>(&mut self, block: &Block<'ast>) -> Result<()> {
        self.ctx.push_local_scope();

        for stmt in block.stmts {
            self.compile(stmt)?;
        }

        self.ctx.pop_local_scope();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::OpCode;
    use crate::options::CompilerOptions;
    use crate::stmt::tests::compile_stmts;
    use bumpalo::Bump;
    use vesper_ast::AstBuilder;
    use vesper_core::{CompilationError, Span};

    #[test]
    fn empty_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (chunk, _, _) =
            compile_stmts(&[b.block_stmt(&[], Span::line(1))], &CompilerOptions::default())
                .unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn sibling_blocks_reuse_slots() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [
            b.var("outer", Some(b.int(1, at)), at),
            b.block_stmt(&[b.var("a", Some(b.int(2, at)), at)], at),
            b.block_stmt(&[b.var("b", Some(b.int(3, at)), at)], at),
        ];

        let (chunk, _, max_locals) = compile_stmts(&stmts, &CompilerOptions::default()).unwrap();
        chunk.assert_opcodes(&[
            OpCode::Constant,
            OpCode::StoreLocal0,
            OpCode::Constant,
            OpCode::StoreLocal1,
            OpCode::Constant,
            OpCode::StoreLocal1,
        ]);
        assert_eq!(max_locals, 2);
    }

    #[test]
    fn inner_local_not_visible_after_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [
            b.block_stmt(&[b.var("a", Some(b.int(2, at)), at)], at),
            b.print(b.ident("a", at), at),
        ];

        assert!(matches!(
            compile_stmts(&stmts, &CompilerOptions::default()),
            Err(CompilationError::UnresolvedLocal { .. })
        ));
    }

    #[test]
    fn nested_shadowing_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let stmts = [
            b.var("x", Some(b.int(1, at)), at),
            b.block_stmt(&[b.var("x", Some(b.int(2, at)), at)], at),
        ];

        assert!(matches!(
            compile_stmts(&stmts, &CompilerOptions::default()),
            Err(CompilationError::ShadowingUnsupported { .. })
        ));
    }
}
