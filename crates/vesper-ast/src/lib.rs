//! Bound tree consumed by the Vesper backend.
//!
//! The front end (scanner, parser, binder) is external. It hands the backend
//! an already-resolved tree: names are known to exist, arithmetic operands
//! carry their resolved [`ScalarType`], and ill-formed programs have been
//! rejected with user diagnostics.
//!
//! Nodes borrow from an arena. Recursive links are `&'ast` references, so a
//! whole tree lives exactly as long as the arena it was built in.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use vesper_ast::*;
//! use vesper_core::Span;
//!
//! let arena = Bump::new();
//! let one = arena.alloc(Expr::Literal(LiteralExpr {
//!     kind: LiteralKind::Float(1.0),
//!     span: Span::line(1),
//! }));
//! let stmt = Stmt::Print(PrintStmt { expr: one, span: Span::line(1) });
//! assert_eq!(stmt.span().line, 1);
//! ```

mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

use vesper_core::Span;

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The identifier text.
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}
