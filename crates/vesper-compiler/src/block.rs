//! Compiled blocks.
//!
//! A block is a named compilation unit: its functions in declaration order
//! plus the one constant pool they all load from.

use rustc_hash::FxHashSet;
use tracing::debug;
use vesper_ast::BlockDecl;
use vesper_core::CompilationError;

use crate::bytecode::ConstantPool;
use crate::context::CompilationContext;
use crate::function::Function;
use crate::function_compiler::FunctionCompiler;
use crate::options::CompilerOptions;
use crate::references::SymbolIndex;

type Result<T> = std::result::Result<T, CompilationError>;

/// A frozen, compiled block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block name, unique within its module.
    pub name: String,
    /// Constants shared by every function in the block.
    pub constants: ConstantPool,
    /// The first function is the unit's entry point.
    pub has_implicit_entry: bool,
    /// Functions in declaration order.
    pub functions: Vec<Function>,
}

impl Block {
    /// Compile every function of `decl` into a new block.
    ///
    /// Functions are generated one after another into a fresh pool. The first
    /// failure aborts the whole block.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(decl: &BlockDecl<'_>, options: &CompilerOptions) -> Result<Self> {
        let mut constants = ConstantPool::new();
        let mut ctx = CompilationContext::new(options);
        let mut seen = FxHashSet::default();
        let mut functions = Vec::with_capacity(decl.functions.len());

        for func in decl.functions {
            if !seen.insert(func.name.name) {
                return Err(CompilationError::DuplicateDefinition {
                    name: SymbolIndex::qualified_name(decl.name, func.name.name),
                });
            }
            functions.push(FunctionCompiler::compile(&mut ctx, &mut constants, func)?);
        }

        debug!(
            block = decl.name,
            functions = functions.len(),
            constants = constants.len(),
            "compiled block"
        );

        Ok(Self {
            name: decl.name.to_string(),
            constants,
            has_implicit_entry: decl.has_implicit_entry,
            functions,
        })
    }

    /// Look up a function by name, with its index in the block.
    pub fn function(&self, name: &str) -> Option<(u32, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .map(|(i, f)| (i as u32, f))
    }

    /// The entry point, when the block has one.
    pub fn entry(&self) -> Option<&Function> {
        if self.has_implicit_entry {
            self.functions.first()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Constant, OpCode};
    use bumpalo::Bump;
    use vesper_ast::AstBuilder;
    use vesper_core::Span;

    #[test]
    fn functions_share_one_pool() {
        crate::test_utils::init_test_logging();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let first = b.function("first", &[], b.block(&[b.print(b.float(1.0, at), at)], at), at);
        let second = b.function("second", &[], b.block(&[b.print(b.int(2, at), at)], at), at);
        let decl = b.unit("main", &[first, second], true, at);

        let block = Block::compile(&decl, &CompilerOptions::default()).unwrap();

        assert_eq!(block.name, "main");
        assert_eq!(block.functions.len(), 2);
        assert_eq!(
            block.constants.iter().collect::<Vec<_>>(),
            vec![Constant::Float(1.0), Constant::Int(2)]
        );
        // second function loads ordinal 1 of the shared pool
        assert_eq!(block.functions[1].chunk.read_u8(1), Some(1));
        assert_eq!(block.entry().map(|f| f.name.as_str()), Some("first"));
        assert_eq!(block.function("second").map(|(i, _)| i), Some(1));
        block.functions[0]
            .chunk
            .assert_opcodes(&[OpCode::Constant, OpCode::Print]);
    }

    #[test]
    fn duplicate_function_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let f = b.function("dup", &[], b.block(&[], at), at);
        let decl = b.unit("lib", &[f, f], false, at);

        assert_eq!(
            Block::compile(&decl, &CompilerOptions::default()),
            Err(CompilationError::DuplicateDefinition {
                name: "lib::dup".into()
            })
        );
    }

    #[test]
    fn failure_produces_no_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(3);
        let good = b.function("good", &[], b.block(&[b.ret(None, at)], at), at);
        let bad = b.function(
            "bad",
            &[],
            b.block(&[b.print(b.ident("missing", at), at)], at),
            at,
        );
        let decl = b.unit("lib", &[good, bad], false, at);

        assert!(matches!(
            Block::compile(&decl, &CompilerOptions::default()),
            Err(CompilationError::UnresolvedLocal { .. })
        ));
    }

    #[test]
    fn no_entry_without_flag() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let at = Span::line(1);
        let f = b.function("f", &[], b.block(&[], at), at);
        let block = Block::compile(&b.unit("lib", &[f], false, at), &CompilerOptions::default())
            .unwrap();
        assert!(block.entry().is_none());
    }
}
