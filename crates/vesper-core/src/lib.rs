//! Shared types for the Vesper backend.
//!
//! - [`Span`]: source positions carried through the bound tree
//! - [`error`]: the error hierarchy for code generation and container output

pub mod error;
mod span;

pub use error::{CompilationError, ContainerError, VesperError};
pub use span::Span;
