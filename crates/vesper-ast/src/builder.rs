//! Arena-backed construction of bound trees.
//!
//! A front end (or a test) allocates every node through one [`AstBuilder`],
//! so the finished tree borrows from a single `Bump`.

use bumpalo::Bump;
use vesper_core::Span;

use crate::*;

/// Allocates bound-tree nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    fn literal(&self, kind: LiteralKind<'ast>, span: Span) -> &'ast Expr<'ast> {
        self.arena.alloc(Expr::Literal(LiteralExpr { kind, span }))
    }

    pub fn int(&self, value: i64, span: Span) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Int(value), span)
    }

    pub fn uint(&self, value: u64, span: Span) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::UInt(value), span)
    }

    pub fn float(&self, value: f64, span: Span) -> &'ast Expr<'ast> {
        self.literal(LiteralKind::Float(value), span)
    }

    pub fn string(&self, value: &str, span: Span) -> &'ast Expr<'ast> {
        let value = self.arena.alloc_str(value);
        self.literal(LiteralKind::Str(value), span)
    }

    pub fn ident(&self, name: &str, span: Span) -> &'ast Expr<'ast> {
        let ident = Ident::new(self.arena.alloc_str(name), span);
        self.arena.alloc(Expr::Ident(IdentExpr { ident, span }))
    }

    pub fn binary(
        &self,
        left: &'ast Expr<'ast>,
        op: BinaryOp,
        right: &'ast Expr<'ast>,
        operand_type: ScalarType,
        span: Span,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(BinaryExpr {
            left,
            op,
            right,
            operand_type,
            span,
        });
        self.arena.alloc(Expr::Binary(node))
    }

    pub fn assign(
        &self,
        target: &'ast Expr<'ast>,
        value: &'ast Expr<'ast>,
        span: Span,
    ) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(AssignExpr {
            target,
            value,
            span,
        });
        self.arena.alloc(Expr::Assign(node))
    }

    pub fn paren(&self, expr: &'ast Expr<'ast>, span: Span) -> &'ast Expr<'ast> {
        let node = self.arena.alloc(ParenExpr { expr, span });
        self.arena.alloc(Expr::Paren(node))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// `var name = init;`
    pub fn var(&self, name: &str, init: Option<&'ast Expr<'ast>>, span: Span) -> Stmt<'ast> {
        self.var_list(&[(name, init)], span)
    }

    /// `var a = .., b = ..;`
    pub fn var_list(&self, decls: &[(&str, Option<&'ast Expr<'ast>>)], span: Span) -> Stmt<'ast> {
        let vars = self
            .arena
            .alloc_slice_fill_iter(decls.iter().map(|&(name, init)| VarDeclarator {
                name: Ident::new(self.arena.alloc_str(name), span),
                init,
                span,
            }));
        Stmt::VarDecl(VarDeclStmt { vars, span })
    }

    pub fn expr_stmt(&self, expr: &'ast Expr<'ast>, span: Span) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt { expr, span })
    }

    pub fn print(&self, expr: &'ast Expr<'ast>, span: Span) -> Stmt<'ast> {
        Stmt::Print(PrintStmt { expr, span })
    }

    pub fn ret(&self, value: Option<&'ast Expr<'ast>>, span: Span) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt { value, span })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>], span: Span) -> Block<'ast> {
        Block {
            stmts: self.arena.alloc_slice_copy(stmts),
            span,
        }
    }

    pub fn block_stmt(&self, stmts: &[Stmt<'ast>], span: Span) -> Stmt<'ast> {
        Stmt::Block(self.block(stmts, span))
    }

    pub fn if_stmt(
        &self,
        condition: &'ast Expr<'ast>,
        then_stmt: Stmt<'ast>,
        else_stmt: Option<Stmt<'ast>>,
        span: Span,
    ) -> Stmt<'ast> {
        let then_stmt = &*self.arena.alloc(then_stmt);
        let else_stmt = else_stmt.map(|s| &*self.arena.alloc(s));
        Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_stmt,
            else_stmt,
            span,
        }))
    }

    pub fn while_stmt(&self, condition: &'ast Expr<'ast>, body: Stmt<'ast>, span: Span) -> Stmt<'ast> {
        let body = &*self.arena.alloc(body);
        Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    pub fn loop_stmt(&self, body: Stmt<'ast>, span: Span) -> Stmt<'ast> {
        let body = &*self.arena.alloc(body);
        Stmt::Loop(self.arena.alloc(LoopStmt { body, span }))
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn function(
        &self,
        name: &str,
        params: &[&str],
        body: Block<'ast>,
        span: Span,
    ) -> FunctionDecl<'ast> {
        let params = self.arena.alloc_slice_fill_iter(
            params
                .iter()
                .map(|p| Ident::new(self.arena.alloc_str(p), span)),
        );
        FunctionDecl {
            name: Ident::new(self.arena.alloc_str(name), span),
            params,
            body,
            span,
        }
    }

    pub fn unit(
        &self,
        name: &str,
        functions: &[FunctionDecl<'ast>],
        has_implicit_entry: bool,
        span: Span,
    ) -> BlockDecl<'ast> {
        BlockDecl {
            name: self.arena.alloc_str(name),
            functions: self.arena.alloc_slice_copy(functions),
            has_implicit_entry,
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);

        let sum = b.binary(b.float(1.0, at), BinaryOp::Add, b.float(2.0, at), ScalarType::Float, at);
        let body = b.block(&[b.var("x", Some(sum), at), b.print(b.ident("x", at), at)], at);
        let func = b.function("main", &["a", "b"], body, at);
        let unit = b.unit("app", &[func], true, at);

        assert_eq!(unit.functions.len(), 1);
        assert_eq!(unit.functions[0].arity(), 2);
        assert_eq!(unit.functions[0].params[1].name, "b");
        assert!(matches!(unit.functions[0].body.stmts[0], Stmt::VarDecl(d) if d.vars.len() == 1));
    }

    #[test]
    fn control_flow_nodes() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::new(4, 2);

        let stmt = b.if_stmt(b.ident("c", at), b.block_stmt(&[], at), Some(b.ret(None, at)), at);
        assert!(matches!(stmt, Stmt::If(s) if s.else_stmt.is_some()));
        assert_eq!(b.loop_stmt(b.block_stmt(&[], at), at).span(), at);
        assert_eq!(b.while_stmt(b.int(1, at), b.ret(None, at), at).span(), at);
    }
}
