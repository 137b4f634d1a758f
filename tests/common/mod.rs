//! Shared helpers for the integration tests.

#![allow(dead_code)]

use bumpalo::Bump;
use vesper::ast::{AstBuilder, BlockDecl, Stmt};
use vesper::{Block, CompilationError, CompilerOptions, Span};

/// Install a `tracing` subscriber. Filter with `RUST_LOG`; defaults to `debug`.
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A unit holding a single entry function `main` with `stmts` as its body.
pub fn main_unit<'ast>(b: AstBuilder<'ast>, stmts: &[Stmt<'ast>]) -> BlockDecl<'ast> {
    let at = Span::line(1);
    let main = b.function("main", &[], b.block(stmts, at), at);
    b.unit("script", &[main], true, at)
}

/// Compile `stmts` as the body of `main` in a fresh arena.
pub fn compile_main<F>(options: &CompilerOptions, build: F) -> Result<Block, CompilationError>
where
    F: for<'ast> FnOnce(AstBuilder<'ast>) -> Vec<Stmt<'ast>>,
{
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let stmts = build(b);
    Block::compile(&main_unit(b, &stmts), options)
}
