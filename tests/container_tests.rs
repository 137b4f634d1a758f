//! Container tests: compiled modules and executables written, read back and
//! compared.

mod common;

use bumpalo::Bump;
use common::{init_test_logging, main_unit};
use pretty_assertions::assert_eq;
use tempdir::TempDir;
use vesper::ast::AstBuilder;
use vesper::{
    Block, CompilerOptions, Constant, ContainerError, ModuleBuilder, Reference, Span,
    VesperError, build_library, read_executable, read_library, serialize_library,
    write_executable, write_library,
};

fn at(line: u32) -> Span {
    Span::line(line)
}

#[test]
fn library_round_trip_preserves_blocks() {
    init_test_logging();
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);

    let greet = b.function(
        "greet",
        &["who"],
        b.block(&[b.print(b.ident("who", at(2)), at(2)), b.ret(None, at(3))], at(1)),
        at(1),
    );
    let util = b.unit("util", &[greet], false, at(1));
    let script = main_unit(
        b,
        &[b.print(b.string("hello", at(1)), at(1)), b.ret(None, at(1))],
    );

    let options = CompilerOptions::default();
    let mut builder = ModuleBuilder::new("app", &options);
    builder.add_block(&script).unwrap();
    builder.add_block(&util).unwrap();
    let module = builder.finish().unwrap();

    let image = read_library(&serialize_library(&module, &options).unwrap()).unwrap();
    assert_eq!(image.blocks.len(), 2);
    for (block, read) in module.blocks().iter().zip(&image.blocks) {
        assert_eq!(image.name(read.name_index), Some(block.name.clone()));
        assert_eq!(read.constants.bytes(), block.constants.bytes());
        for (function, record) in block.functions.iter().zip(&read.functions) {
            assert_eq!(image.name(record.name_index), Some(function.name.clone()));
            assert_eq!(record.code, function.chunk.code());
            assert_eq!(record.arity(), function.arity());
            assert_eq!(u32::from(record.max_locals), function.max_locals);
            assert_eq!(u32::from(record.max_stack), function.max_stack);
        }
    }

    let script_block = &image.blocks[0];
    assert_eq!(
        script_block.constants.get(0),
        Some(Constant::Str("hello".into()))
    );
}

#[test]
fn references_survive_serialization() {
    let options = CompilerOptions::default();
    let mut builder = ModuleBuilder::new("app", &options);
    let first = builder.reference_internal("lib", "f");
    let second = builder.reference_internal("lib", "f");
    let external = builder.reference_external("net", "send");
    builder
        .add_compiled_block(Block {
            name: "lib".into(),
            constants: Default::default(),
            has_implicit_entry: false,
            functions: vec![vesper::Function {
                name: "f".into(),
                params: Vec::new(),
                max_locals: 0,
                max_stack: 0,
                chunk: Default::default(),
            }],
        })
        .unwrap();
    let module = builder.finish().unwrap();

    let image = read_library(&serialize_library(&module, &options).unwrap()).unwrap();
    assert_eq!(image.references.len(), 3);
    assert_ne!(first, second);
    assert_eq!(image.references[first as usize], image.references[second as usize]);
    assert_eq!(
        image.references[external as usize],
        Reference::External {
            block: "net".into(),
            item: "send".into(),
        }
    );
}

#[test]
fn write_library_to_disk() {
    let dir = TempDir::new("vesper-library").unwrap();
    let path = dir.path().join("build").join("app.vpl");

    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = main_unit(b, &[b.print(b.float(3.14, at(1)), at(1)), b.ret(None, at(1))]);
    write_library(&path, "app", &[unit], &CompilerOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"VESPERMODULE"));
    let image = read_library(&bytes).unwrap();
    assert_eq!(image.module_name().as_deref(), Some("app"));
    assert_eq!(image.blocks[0].constants.get(0), Some(Constant::Float(3.14)));
}

#[test]
fn write_executable_to_disk() {
    let dir = TempDir::new("vesper-executable").unwrap();
    let path = dir.path().join("app.vpx");

    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = main_unit(b, &[b.print(b.uint(9, at(1)), at(1)), b.ret(None, at(2))]);
    let options = CompilerOptions::default().with_executable_version(2, 1);
    write_executable(&path, &unit, &options).unwrap();

    let image = read_executable(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!((image.major, image.minor), (2, 1));
    let entry = image.entry().unwrap();
    assert_eq!(image.name(entry.name_index).as_deref(), Some("main"));
    assert_eq!(image.constants.get(0), Some(Constant::UInt(9)));
    assert_eq!(entry.lines, Some(vec![1, 1, 1, 2]));
}

#[test]
fn failed_compilation_writes_nothing() {
    let dir = TempDir::new("vesper-fatal").unwrap();
    let path = dir.path().join("app.vpl");

    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let bad = main_unit(
        b,
        &[b.expr_stmt(b.assign(b.int(1, at(1)), b.int(2, at(1)), at(1)), at(1))],
    );
    let err = write_library(&path, "app", &[bad], &CompilerOptions::default()).unwrap_err();

    assert!(matches!(err, VesperError::Compilation(_)));
    assert!(!path.exists());
}

#[test]
fn duplicate_blocks_are_rejected() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = main_unit(b, &[]);
    let err = build_library("app", &[unit, unit], &CompilerOptions::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate block 'script'"));
}

#[test]
fn executable_rejects_library_bytes() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let unit = main_unit(b, &[]);
    let library = build_library("app", &[unit], &CompilerOptions::default()).unwrap();

    // VESPERMODULE starts with VESPER, so the magic matches and the
    // endianness byte is 'M'
    assert!(matches!(
        read_executable(&library),
        Err(ContainerError::UnsupportedEndianness(b'M'))
    ));
}
