//! Statement nodes.
//!
//! The control-flow statements (`if`, `while`, `loop`) are part of the bound
//! tree even though the backend has no lowering for them yet; they let the
//! generator reject them with a precise error instead of failing on an
//! unknown node.

use vesper_core::Span;

use crate::Ident;
use crate::expr::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression statement (expr;)
    Expr(ExprStmt<'ast>),
    /// Local variable declaration
    VarDecl(VarDeclStmt<'ast>),
    /// Debug print intrinsic
    Print(PrintStmt<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Nested block
    Block(Block<'ast>),
    /// If statement
    If(&'ast IfStmt<'ast>),
    /// While loop
    While(&'ast WhileStmt<'ast>),
    /// Unconditional loop
    Loop(&'ast LoopStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::VarDecl(s) => s.span,
            Self::Print(s) => s.span,
            Self::Return(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Loop(s) => s.span,
        }
    }
}

/// An expression evaluated for its effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A local variable declaration.
///
/// `var x = 1;` has one declarator; `var a, b = 2;` has two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclStmt<'ast> {
    /// Declarators in source order
    pub vars: &'ast [VarDeclarator<'ast>],
    /// Source location
    pub span: Span,
}

/// One declared name with its optional initializer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclarator<'ast> {
    /// Declared name
    pub name: Ident<'ast>,
    /// Initializer
    pub init: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// `print(expr);`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintStmt<'ast> {
    /// Printed value
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// `return;` or `return expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Return value, if written
    pub value: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// A braced statement list that opens a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    /// Statements in source order
    pub stmts: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// `if (condition) then_stmt else else_stmt`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Taken branch
    pub then_stmt: &'ast Stmt<'ast>,
    /// Optional else branch
    pub else_stmt: Option<&'ast Stmt<'ast>>,
    /// Source location
    pub span: Span,
}

/// `while (condition) body`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Loop body
    pub body: &'ast Stmt<'ast>,
    /// Source location
    pub span: Span,
}

/// `loop body`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStmt<'ast> {
    /// Loop body
    pub body: &'ast Stmt<'ast>,
    /// Source location
    pub span: Span,
}
