//! Performance benchmarks for the Vesper code generation pipeline.
//!
//! - Function size: straight-line bodies from 10 to 5000 statements
//! - Locals: slot pressure up to the byte-operand limit
//! - Containers: library and executable serialization
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to collect per-phase timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use bumpalo::Bump;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use vesper::ast::{AstBuilder, BinaryOp, BlockDecl, ScalarType, Stmt};
use vesper::{Block, CompilerOptions, ModuleBuilder, Span, serialize_executable, serialize_library};

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Frames recorded so far.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };
    let view = frame_view.lock();
    println!(
        "\n=== Profiling Summary ({} frames) ===",
        view.recent_frames().count()
    );
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// `var vN = vN-1 + 1.5; print(vN);` chains, with at most `live` locals
/// alive at once.
fn straight_line<'ast>(b: AstBuilder<'ast>, statements: usize, live: usize) -> BlockDecl<'ast> {
    let at = Span::line(1);
    let mut body: Vec<Stmt<'ast>> = Vec::with_capacity(statements + 1);
    let mut scope: Vec<Stmt<'ast>> = Vec::new();
    let names: Vec<String> = (0..live).map(|i| format!("v{i}")).collect();

    for i in 0..statements {
        let slot = i % live;
        let init = if slot == 0 {
            b.float(i as f64, at)
        } else {
            b.binary(
                b.ident(&names[slot - 1], at),
                BinaryOp::Add,
                b.float(1.5, at),
                ScalarType::Float,
                at,
            )
        };
        scope.push(b.var(&names[slot], Some(init), at));
        scope.push(b.print(b.ident(&names[slot], at), at));
        if slot == live - 1 {
            body.push(b.block_stmt(&scope, at));
            scope.clear();
        }
    }
    if !scope.is_empty() {
        body.push(b.block_stmt(&scope, at));
    }
    body.push(b.ret(None, at));

    let main = b.function("main", &[], b.block(&body, at), at);
    b.unit("bench", &[main], true, at)
}

fn function_size_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let options = CompilerOptions::default();
    let mut group = c.benchmark_group("codegen/function_size");

    for statements in [10usize, 100, 1000, 5000] {
        let arena = Bump::new();
        let unit = straight_line(AstBuilder::new(&arena), statements, 8);
        group.throughput(Throughput::Elements(statements as u64));
        group.bench_with_input(BenchmarkId::from_parameter(statements), &unit, |b, unit| {
            b.iter(|| {
                let block = Block::compile(black_box(unit), &options).unwrap();
                end_profiling_frame();
                black_box(block.functions.len())
            });
        });
    }

    group.finish();
    print_profiling_stats();
}

fn local_pressure_benchmarks(c: &mut Criterion) {
    let options = CompilerOptions::default();
    let mut group = c.benchmark_group("codegen/locals");

    for live in [4usize, 32, 255] {
        let arena = Bump::new();
        let unit = straight_line(AstBuilder::new(&arena), 1000, live);
        group.bench_with_input(BenchmarkId::from_parameter(live), &unit, |b, unit| {
            b.iter(|| black_box(Block::compile(black_box(unit), &options).unwrap()));
        });
    }

    group.finish();
}

fn container_benchmarks(c: &mut Criterion) {
    let options = CompilerOptions::default();
    let arena = Bump::new();
    let unit = straight_line(AstBuilder::new(&arena), 5000, 16);
    let block = Block::compile(&unit, &options).unwrap();

    let mut builder = ModuleBuilder::new("bench", &options);
    builder.add_compiled_block(block.clone()).unwrap();
    let module = builder.finish().unwrap();

    let mut group = c.benchmark_group("container");
    group.bench_function("library", |b| {
        b.iter(|| black_box(serialize_library(black_box(&module), &options).unwrap()));
    });
    group.bench_function("executable", |b| {
        b.iter(|| black_box(serialize_executable(black_box(&block), &options).unwrap()));
    });
    group.finish();
}

criterion_group!(
    benches,
    function_size_benchmarks,
    local_pressure_benchmarks,
    container_benchmarks
);
criterion_main!(benches);
