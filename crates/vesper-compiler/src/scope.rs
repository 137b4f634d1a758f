//! Local slot allocation for function compilation.
//!
//! `LocalScope` is a scoped arena: live locals sit in an ordered list, each
//! tagged with the depth of the block that declared it, and a local's slot is
//! its index in that list. Leaving a block truncates the list back to the
//! entries still in scope, so the next declaration reuses the lowest freed
//! slot.
//!
//! Shadowing is not supported. A name may be declared only if no active scope
//! already holds it.

use rustc_hash::FxHashMap;
use vesper_core::{CompilationError, Span};

/// Maximum number of simultaneously live slots in one function.
pub const MAX_LOCALS: usize = 1 << 16;

// ============================================================================
// Types
// ============================================================================

/// Information about a local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    /// Variable name
    pub name: String,
    /// Scope depth where declared
    pub depth: u32,
    /// Whether a value has been stored
    pub is_initialized: bool,
    /// Source location of declaration
    pub span: Span,
}

// ============================================================================
// LocalScope
// ============================================================================

/// Slot allocator for the function being compiled.
#[derive(Debug, Default)]
pub struct LocalScope {
    /// Live locals; index == slot
    locals: Vec<LocalVar>,

    /// Live name -> slot
    by_name: FxHashMap<String, u32>,

    /// Current scope depth (0 = function scope)
    scope_depth: u32,

    /// High-water mark of `locals.len()`
    max_locals: u32,
}

impl LocalScope {
    /// Create a new local scope for a function.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a nested block.
    pub fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Leave the current block, freeing every slot it declared.
    pub fn end_scope(&mut self) {
        self.scope_depth = self.scope_depth.saturating_sub(1);

        let live = self
            .locals
            .iter()
            .position(|var| var.depth > self.scope_depth)
            .unwrap_or(self.locals.len());
        for var in self.locals.drain(live..) {
            self.by_name.remove(&var.name);
        }
    }

    /// Get current scope depth.
    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Declare a local in the current block. It starts uninitialized.
    pub fn declare(&mut self, name: &str, span: Span) -> Result<u32, CompilationError> {
        self.push(name, self.scope_depth, false, span)
    }

    /// Declare a function parameter.
    ///
    /// Parameters are at depth 0 and always initialized. They must be
    /// declared before any block is entered.
    pub fn declare_param(&mut self, name: &str, span: Span) -> Result<u32, CompilationError> {
        if self.scope_depth != 0 {
            return Err(CompilationError::Internal {
                message: format!(
                    "parameter '{name}' declared inside a block (depth {})",
                    self.scope_depth
                ),
            });
        }
        self.push(name, 0, true, span)
    }

    fn push(
        &mut self,
        name: &str,
        depth: u32,
        is_initialized: bool,
        span: Span,
    ) -> Result<u32, CompilationError> {
        if let Some(&slot) = self.by_name.get(name) {
            let existing = &self.locals[slot as usize];
            return Err(if existing.depth == depth {
                CompilationError::VariableRedeclaration {
                    name: name.to_string(),
                    original_span: existing.span,
                    new_span: span,
                }
            } else {
                CompilationError::ShadowingUnsupported {
                    name: name.to_string(),
                    span,
                }
            });
        }

        if self.locals.len() >= MAX_LOCALS {
            return Err(CompilationError::TooManyLocals {
                limit: MAX_LOCALS,
                span,
            });
        }

        let slot = self.locals.len() as u32;
        self.locals.push(LocalVar {
            name: name.to_string(),
            depth,
            is_initialized,
            span,
        });
        self.by_name.insert(name.to_string(), slot);
        self.max_locals = self.max_locals.max(slot + 1);

        Ok(slot)
    }

    /// Mark a slot as holding a value.
    pub fn mark_initialized(&mut self, slot: u32) {
        if let Some(var) = self.locals.get_mut(slot as usize) {
            var.is_initialized = true;
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Resolve a name to its slot.
    pub fn resolve(&self, name: &str, span: Span) -> Result<u32, CompilationError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CompilationError::UnresolvedLocal {
                name: name.to_string(),
                span,
            })
    }

    /// Resolve a name for reading; fails if nothing was stored yet.
    pub fn resolve_initialized(&self, name: &str, span: Span) -> Result<u32, CompilationError> {
        let slot = self.resolve(name, span)?;
        if self.locals[slot as usize].is_initialized {
            Ok(slot)
        } else {
            Err(CompilationError::UninitializedRead {
                name: name.to_string(),
                span,
            })
        }
    }

    /// Look up a live local by slot.
    pub fn get(&self, slot: u32) -> Option<&LocalVar> {
        self.locals.get(slot as usize)
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    /// Number of currently live slots.
    pub fn live_count(&self) -> usize {
        self.locals.len()
    }

    /// Largest number of simultaneously live slots so far.
    pub fn max_locals(&self) -> u32 {
        self.max_locals
    }
}

// ============================================================================
// Tests
// ============================================================================
