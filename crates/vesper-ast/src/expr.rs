//! Expression nodes.

use vesper_core::Span;

use crate::{BinaryOp, Ident, ScalarType};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Local variable read
    Ident(IdentExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Assignment
    Assign(&'ast AssignExpr<'ast>),
    /// Parenthesized expression
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(p) = expr {
            expr = p.expr;
        }
        expr
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    /// The literal kind
    pub kind: LiteralKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Signed integer literal
    Int(i64),
    /// Unsigned integer literal
    UInt(u64),
    /// Float literal
    Float(f64),
    /// String literal, expected to be ASCII
    Str(&'ast str),
}

impl LiteralKind<'_> {
    /// Type of the value this literal produces.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            LiteralKind::Int(_) => ScalarType::Int,
            LiteralKind::UInt(_) => ScalarType::UInt,
            LiteralKind::Float(_) => ScalarType::Float,
            LiteralKind::Str(_) => ScalarType::Str,
        }
    }
}

/// A read of a local variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    /// The identifier
    pub ident: Ident<'ast>,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Operand type both sides were bound to
    pub operand_type: ScalarType,
    /// Source location
    pub span: Span,
}

/// An assignment `target = value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    /// Assignment target (only a bare identifier is lowered)
    pub target: &'ast Expr<'ast>,
    /// Value being assigned
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    /// Inner expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
