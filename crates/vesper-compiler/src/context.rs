//! CompilationContext - per-function state shared by the statement and
//! expression compilers.

use vesper_core::{CompilationError, Span};

use crate::options::CompilerOptions;
use crate::scope::LocalScope;

type Result<T> = std::result::Result<T, CompilationError>;

/// Slot allocator plus the options code generation reads.
pub struct CompilationContext<'ctx> {
    locals: LocalScope,
    options: &'ctx CompilerOptions,
}

impl<'ctx> CompilationContext<'ctx> {
    pub fn new(options: &'ctx CompilerOptions) -> Self {
        Self {
            locals: LocalScope::new(),
            options,
        }
    }

    pub fn options(&self) -> &'ctx CompilerOptions {
        self.options
    }

    // ==========================================================================
    // Function lifecycle
    // ==========================================================================

    /// Start a fresh function: drop every local of the previous one.
    pub fn begin_function(&mut self) {
        self.locals = LocalScope::new();
    }

    /// Finish the current function, returning its slot allocator.
    pub fn end_function(&mut self) -> LocalScope {
        std::mem::take(&mut self.locals)
    }

    // ==========================================================================
    // Locals
    // ==========================================================================

    pub fn push_local_scope(&mut self) {
        self.locals.begin_scope();
    }

    pub fn pop_local_scope(&mut self) {
        self.locals.end_scope();
    }

    pub fn declare_param(&mut self, name: &str, span: Span) -> Result<u32> {
        self.locals.declare_param(name, span)
    }

    pub fn declare_local(&mut self, name: &str, span: Span) -> Result<u32> {
        self.locals.declare(name, span)
    }

    /// Slot of a local that is about to be written.
    pub fn resolve_local(&self, name: &str, span: Span) -> Result<u32> {
        self.locals.resolve(name, span)
    }

    /// Slot of a local that is about to be read.
    pub fn resolve_readable_local(&self, name: &str, span: Span) -> Result<u32> {
        self.locals.resolve_initialized(name, span)
    }

    pub fn mark_local_initialized(&mut self, slot: u32) {
        self.locals.mark_initialized(slot);
    }

    pub fn locals(&self) -> &LocalScope {
        &self.locals
    }
}
