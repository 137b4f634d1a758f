//! Module assembly.
//!
//! [`ModuleBuilder`] collects blocks in order, registers cross-block
//! references, and freezes everything into a [`Module`] ready for the
//! container writer.
//!
//! ```
//! use bumpalo::Bump;
//! use vesper_ast::AstBuilder;
//! use vesper_compiler::{CompilerOptions, ModuleBuilder, Reference};
//! use vesper_core::Span;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let at = Span::line(1);
//! let helper = b.function("helper", &[], b.block(&[b.ret(None, at)], at), at);
//!
//! let mut builder = ModuleBuilder::new("app", &CompilerOptions::default());
//! builder.add_block(&b.unit("util", &[helper], false, at)).unwrap();
//! let call = builder.reference_internal("util", "helper");
//! let module = builder.finish().unwrap();
//!
//! assert_eq!(module.references()[call as usize], Reference::Internal { block: 0, item: 0 });
//! assert_eq!(module.names().index_of("app"), Some(0));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use vesper_ast::BlockDecl;
use vesper_core::CompilationError;

use crate::block::Block;
use crate::bytecode::{Constant, ConstantPool};
use crate::options::{CompilerOptions, Version};
use crate::references::{PendingReference, Reference, ReferenceTable, SymbolIndex};

type Result<T> = std::result::Result<T, CompilationError>;

// ============================================================================
// NameTable
// ============================================================================

/// Module-wide string table, stored in the constant-pool encoding.
///
/// Each distinct name is interned once; its index is its pool ordinal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    pool: ConstantPool,
    index: FxHashMap<String, u32>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, adding it if absent.
    pub fn intern(&mut self, name: &str) -> Result<u32> {
        if let Some(&index) = self.index.get(name) {
            return Ok(index);
        }
        let index = self
            .pool
            .add_string(name)
            .map_err(|e| CompilationError::UnencodableName {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        self.index.insert(name.to_string(), index);
        Ok(index)
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    pub fn get(&self, index: u32) -> Option<String> {
        match self.pool.get(index) {
            Some(Constant::Str(name)) => Some(name),
            _ => None,
        }
    }

    /// Backing pool, as written to a container.
    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

// ============================================================================
// Module
// ============================================================================

/// A frozen module: ordered blocks, resolved references, and the name table
/// that covers every name the container writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: String,
    names: NameTable,
    references: Vec<Reference>,
    blocks: Vec<Block>,
    version: Version,
}

impl Module {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Look up a block by name, with its index.
    pub fn block(&self, name: &str) -> Option<(u32, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .find(|(_, b)| b.name == name)
            .map(|(i, b)| (i as u32, b))
    }
}

// ============================================================================
// ModuleBuilder
// ============================================================================

/// Builds a [`Module`] block by block.
pub struct ModuleBuilder {
    name: String,
    options: CompilerOptions,
    blocks: Vec<Block>,
    symbols: SymbolIndex,
    references: ReferenceTable,
}

impl ModuleBuilder {
    pub fn new(name: &str, options: &CompilerOptions) -> Self {
        Self {
            name: name.to_string(),
            options: options.clone(),
            blocks: Vec::new(),
            symbols: SymbolIndex::new(),
            references: ReferenceTable::new(),
        }
    }

    /// Compile `decl` and append it, returning its block index.
    pub fn add_block(&mut self, decl: &BlockDecl<'_>) -> Result<u32> {
        self.check_block_name(decl.name)?;
        let block = Block::compile(decl, &self.options)?;
        self.add_compiled_block(block)
    }

    /// Append an already compiled block, returning its block index.
    ///
    /// On error nothing is registered, so the builder stays usable.
    pub fn add_compiled_block(&mut self, block: Block) -> Result<u32> {
        self.check_block_name(&block.name)?;

        let mut seen = FxHashSet::default();
        for function in &block.functions {
            if !seen.insert(function.name.as_str()) {
                return Err(CompilationError::DuplicateDefinition {
                    name: SymbolIndex::qualified_name(&block.name, &function.name),
                });
            }
        }

        let block_index = self.blocks.len() as u32;
        for (item_index, function) in block.functions.iter().enumerate() {
            self.symbols
                .define(&block.name, &function.name, block_index, item_index as u32)?;
        }
        self.blocks.push(block);
        Ok(block_index)
    }

    fn check_block_name(&self, name: &str) -> Result<()> {
        if self.blocks.iter().any(|b| b.name == name) {
            return Err(CompilationError::DuplicateBlock {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Reference a function of a block in this module (it may be added later).
    pub fn reference_internal(&mut self, block: &str, item: &str) -> u32 {
        self.references.push(PendingReference::Internal {
            block: block.to_string(),
            item: item.to_string(),
        })
    }

    /// Reference host function `index`.
    pub fn reference_native(&mut self, index: u32) -> u32 {
        self.references.push(PendingReference::Native { index })
    }

    /// Reference a function of another module by name.
    pub fn reference_external(&mut self, block: &str, item: &str) -> u32 {
        self.references.push(PendingReference::External {
            block: block.to_string(),
            item: item.to_string(),
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Resolve references, build the name table, and freeze the module.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finish(self) -> Result<Module> {
        let references = self.references.resolve(&self.symbols)?;

        let mut names = NameTable::new();
        names.intern(&self.name)?;
        for block in &self.blocks {
            names.intern(&block.name)?;
        }
        for function in self.blocks.iter().flat_map(|b| &b.functions) {
            names.intern(&function.name)?;
        }
        for param in self
            .blocks
            .iter()
            .flat_map(|b| &b.functions)
            .flat_map(|f| &f.params)
        {
            names.intern(param)?;
        }
        for reference in &references {
            if let Reference::External { block, item } = reference {
                names.intern(block)?;
                names.intern(item)?;
            }
        }

        debug!(
            module = %self.name,
            blocks = self.blocks.len(),
            references = references.len(),
            names = names.len(),
            "finished module"
        );

        Ok(Module {
            name: self.name,
            names,
            references,
            blocks: self.blocks,
            version: self.options.version,
        })
    }
}
