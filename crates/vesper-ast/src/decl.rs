//! Top-level declarations: functions and blocks.

use vesper_core::Span;

use crate::Ident;
use crate::stmt::Block;

/// A function with its parameters and body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    /// Function name, unique within its block
    pub name: Ident<'ast>,
    /// Parameters in declaration order
    pub params: &'ast [Ident<'ast>],
    /// Function body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

impl FunctionDecl<'_> {
    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A named compilation unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockDecl<'ast> {
    /// Block name, unique within its module
    pub name: &'ast str,
    /// Functions in declaration order
    pub functions: &'ast [FunctionDecl<'ast>],
    /// The first function is the unit's entry point
    pub has_implicit_entry: bool,
    /// Source location
    pub span: Span,
}
