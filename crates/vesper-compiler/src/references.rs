//! Cross-unit function references.
//!
//! Every call that leaves its own block goes through the module's reference
//! table. A [`Reference`] is one of three kinds:
//!
//! - `Internal` - callee in another block of the same module, addressed by
//!   `(block_index, item_index)`
//! - `Native` - callee supplied by the host runtime, addressed by index
//! - `External` - callee in a module that is not loaded yet, addressed by
//!   `(block_name, item_name)` and resolved by the loader
//!
//! Internal indices only exist once block order is final, so callers register
//! [`PendingReference`]s (internal ones by name) and the table is resolved
//! against a [`SymbolIndex`] after the last block is added.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use rustc_hash::FxHashMap;
use vesper_core::CompilationError;

type Result<T> = std::result::Result<T, CompilationError>;

// ============================================================================
// Resolved references
// ============================================================================

/// Kind discriminant written before each serialized reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum ReferenceKind {
    Internal = 0,
    Native = 1,
    External = 2,
}

/// A resolved function reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Function `item` of block `block` in this module.
    Internal { block: u32, item: u32 },
    /// Host function `index`.
    Native { index: u32 },
    /// Function `item` of block `block` in another module.
    External { block: String, item: String },
}

impl Reference {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Reference::Internal { .. } => ReferenceKind::Internal,
            Reference::Native { .. } => ReferenceKind::Native,
            Reference::External { .. } => ReferenceKind::External,
        }
    }
}

/// A reference registered before block order is final.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingReference {
    /// Function `item` of block `block` in this module, by name.
    Internal { block: String, item: String },
    /// Host function `index`.
    Native { index: u32 },
    /// Function `item` of block `block` in another module.
    External { block: String, item: String },
}

// ============================================================================
// SymbolIndex
// ============================================================================

/// Fully-qualified function name -> `(block_index, item_index)`.
///
/// Build-time only; it is never written to a container.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    symbols: FxHashMap<String, (u32, u32)>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// `block::item`
    pub fn qualified_name(block: &str, item: &str) -> String {
        format!("{block}::{item}")
    }

    /// Register a function's address.
    pub fn define(
        &mut self,
        block: &str,
        item: &str,
        block_index: u32,
        item_index: u32,
    ) -> Result<()> {
        let name = Self::qualified_name(block, item);
        if self.symbols.contains_key(&name) {
            return Err(CompilationError::DuplicateDefinition { name });
        }
        self.symbols.insert(name, (block_index, item_index));
        Ok(())
    }

    pub fn lookup(&self, block: &str, item: &str) -> Option<(u32, u32)> {
        self.symbols
            .get(&Self::qualified_name(block, item))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ============================================================================
// ReferenceTable
// ============================================================================

/// Ordered list of references; a reference's position is its call operand.
///
/// Identical references are never merged.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    pending: Vec<PendingReference>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reference, returning its index.
    pub fn push(&mut self, reference: PendingReference) -> u32 {
        let index = self.pending.len() as u32;
        self.pending.push(reference);
        index
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> &[PendingReference] {
        &self.pending
    }

    /// Turn every pending reference into its final form.
    pub fn resolve(&self, symbols: &SymbolIndex) -> Result<Vec<Reference>> {
        self.pending
            .iter()
            .map(|pending| match pending {
                PendingReference::Internal { block, item } => symbols
                    .lookup(block, item)
                    .map(|(block, item)| Reference::Internal { block, item })
                    .ok_or_else(|| CompilationError::UnresolvedReference {
                        name: SymbolIndex::qualified_name(block, item),
                    }),
                PendingReference::Native { index } => Ok(Reference::Native { index: *index }),
                PendingReference::External { block, item } => Ok(Reference::External {
                    block: block.clone(),
                    item: item.clone(),
                }),
            })
            .collect()
    }
}
