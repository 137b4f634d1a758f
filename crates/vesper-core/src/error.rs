//! Error types for the Vesper backend.
//!
//! ## Error Hierarchy
//!
//! ```text
//! VesperError (top-level wrapper)
//! ├── CompilationError - code generation, block and module assembly
//! └── ContainerError   - binary container serialization and reading
//! ```
//!
//! The front end rejects ill-formed programs before they reach the backend,
//! so a [`CompilationError`] always means a compiler defect or a surface the
//! backend does not lower yet. Every message carries the
//! `internal compiler error` prefix to keep it apart from user diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Compilation Errors
// ============================================================================

/// Fatal errors raised while generating code for a function, a block or a
/// module. None of them is recoverable: generation of the enclosing unit
/// stops and nothing is emitted for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// The function declares more simultaneously live locals than slots exist.
    #[error("internal compiler error at {span}: too many locals (limit {limit})")]
    TooManyLocals {
        /// Maximum number of live slots.
        limit: usize,
        /// Declaration that overflowed.
        span: Span,
    },

    /// A local was read or written but is not declared in any active scope.
    #[error("internal compiler error at {span}: unresolved local '{name}'")]
    UnresolvedLocal {
        /// The local name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// A local was read before anything was stored into it.
    #[error("internal compiler error at {span}: local '{name}' read before initialization")]
    UninitializedRead {
        /// The local name.
        name: String,
        /// Where it was read.
        span: Span,
    },

    /// A local was declared twice in the same scope.
    #[error(
        "internal compiler error at {new_span}: local '{name}' redeclared (originally declared at {original_span})"
    )]
    VariableRedeclaration {
        /// The local name.
        name: String,
        /// The first declaration.
        original_span: Span,
        /// The second declaration.
        new_span: Span,
    },

    /// A nested scope declared a name that an enclosing scope still holds.
    #[error(
        "internal compiler error at {span}: local '{name}' shadows an enclosing declaration (shadowing is unsupported)"
    )]
    ShadowingUnsupported {
        /// The local name.
        name: String,
        /// The shadowing declaration.
        span: Span,
    },

    /// The left side of an assignment is not a bare identifier.
    #[error("internal compiler error at {span}: invalid assignment target")]
    InvalidAssignmentTarget {
        /// The assignment.
        span: Span,
    },

    /// The operator is recognized but has no lowering.
    #[error("internal compiler error at {span}: unimplemented operator '{op}'")]
    UnimplementedOperator {
        /// Operator token.
        op: String,
        /// The binary expression.
        span: Span,
    },

    /// A construct the backend does not lower.
    #[error("internal compiler error at {span}: unimplemented: {feature}")]
    Unimplemented {
        /// What is missing.
        feature: String,
        /// Where it was encountered.
        span: Span,
    },

    /// A literal cannot be stored in the constant pool.
    #[error("internal compiler error at {span}: invalid constant: {message}")]
    InvalidConstant {
        /// Why the constant was rejected.
        message: String,
        /// The literal.
        span: Span,
    },

    /// Two functions share a fully-qualified name.
    #[error("internal compiler error: duplicate definition '{name}'")]
    DuplicateDefinition {
        /// Fully-qualified name (`block::item`).
        name: String,
    },

    /// Two blocks share a name within one module.
    #[error("internal compiler error: duplicate block '{name}'")]
    DuplicateBlock {
        /// The block name.
        name: String,
    },

    /// An internal reference names a callee no block defines.
    #[error("internal compiler error: unresolved reference '{name}'")]
    UnresolvedReference {
        /// Fully-qualified name (`block::item`).
        name: String,
    },

    /// A name cannot be stored in the constant-pool encoding.
    #[error("internal compiler error: name '{name}' cannot be encoded: {message}")]
    UnencodableName {
        /// The rejected name.
        name: String,
        /// Why the pool rejected it.
        message: String,
    },

    /// Catch-all for broken backend invariants.
    #[error("internal compiler error: {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },
}

impl CompilationError {
    /// Source location of the failure, when one exists.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompilationError::TooManyLocals { span, .. }
            | CompilationError::UnresolvedLocal { span, .. }
            | CompilationError::UninitializedRead { span, .. }
            | CompilationError::ShadowingUnsupported { span, .. }
            | CompilationError::InvalidAssignmentTarget { span }
            | CompilationError::UnimplementedOperator { span, .. }
            | CompilationError::Unimplemented { span, .. }
            | CompilationError::InvalidConstant { span, .. } => Some(*span),
            CompilationError::VariableRedeclaration { new_span, .. } => Some(*new_span),
            CompilationError::DuplicateDefinition { .. }
            | CompilationError::DuplicateBlock { .. }
            | CompilationError::UnresolvedReference { .. }
            | CompilationError::UnencodableName { .. }
            | CompilationError::Internal { .. } => None,
        }
    }
}

// ============================================================================
// Container Errors
// ============================================================================

/// Errors from writing or reading a binary container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The output file or its directory could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A count or length does not fit the width of its field.
    #[error("{field} value {value} does not fit its container field")]
    FieldOverflow {
        /// Field name as it appears in the layout.
        field: &'static str,
        /// The offending value.
        value: usize,
    },

    /// A name was not interned in the module name table.
    #[error("name '{name}' is missing from the module name table")]
    MissingName {
        /// The missing name.
        name: String,
    },

    /// A name cannot be stored in the constant-pool encoding.
    #[error("name '{name}' cannot be encoded: {message}")]
    UnencodableName {
        /// The rejected name.
        name: String,
        /// Why the pool rejected it.
        message: String,
    },

    /// The input ended before a field was complete.
    #[error("truncated container: need {needed} byte(s) at offset {offset}")]
    Truncated {
        /// Where the read started.
        offset: usize,
        /// How many bytes were requested.
        needed: usize,
    },

    /// The input does not start with the expected magic.
    #[error("bad magic: expected {expected:?}")]
    BadMagic {
        /// The magic the reader looked for.
        expected: &'static str,
    },

    /// The endianness byte is not 0.
    #[error("unsupported endianness marker {0}")]
    UnsupportedEndianness(u8),

    /// A tagged-bytes entry has an unknown tag.
    #[error("invalid constant tag {tag:#04x} at offset {offset}")]
    InvalidTag {
        /// Offset of the tag byte.
        offset: usize,
        /// The tag value.
        tag: u8,
    },

    /// A tagged-bytes entry has a valid tag but a malformed payload.
    #[error("malformed constant at offset {offset}: {message}")]
    MalformedConstant {
        /// Offset of the entry, or of the table when the entry is unknown.
        offset: usize,
        /// What is wrong with it.
        message: String,
    },

    /// A function reference has an unknown kind.
    #[error("invalid reference kind {0}")]
    InvalidReferenceKind(u32),
}

// ============================================================================
// Top-level
// ============================================================================

/// Any failure of the backend pipeline.
#[derive(Debug, Error)]
pub enum VesperError {
    /// Code generation failed.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// Container output failed.
    #[error(transparent)]
    Container(#[from] ContainerError),
}
