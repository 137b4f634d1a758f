//! Vesper Container
//!
//! Binary containers for compiled Vesper code. Two variants share the same
//! per-function record:
//!
//! - **Library** ([`serialize_library`]): a whole [`Module`] with its name
//!   table, reference table and blocks
//! - **Executable** ([`serialize_executable`]): one implicit [`Block`] with a
//!   single constant table and an entry-point flag
//!
//! All fields are little-endian. Output is buffered in memory and written with
//! one [`write_to_file`] call. [`reader`] parses both variants back for
//! inspection.
//!
//! ```
//! use vesper_compiler::{Block, CompilerOptions, ModuleBuilder};
//! use vesper_compiler::bytecode::ConstantPool;
//! use vesper_container::{read_library, serialize_library};
//!
//! let options = CompilerOptions::default();
//! let mut builder = ModuleBuilder::new("empty", &options);
//! builder
//!     .add_compiled_block(Block {
//!         name: "main".into(),
//!         constants: ConstantPool::new(),
//!         has_implicit_entry: false,
//!         functions: Vec::new(),
//!     })
//!     .unwrap();
//! let module = builder.finish().unwrap();
//!
//! let bytes = serialize_library(&module, &options).unwrap();
//! assert!(bytes.starts_with(b"VESPERMODULE"));
//! assert_eq!(read_library(&bytes).unwrap().blocks.len(), 1);
//! ```
//!
//! [`Module`]: vesper_compiler::Module
//! [`Block`]: vesper_compiler::Block

mod executable;
mod function;
mod library;
mod output;
pub mod reader;
mod writer;

pub use executable::serialize_executable;
pub use function::FunctionImage;
pub use library::serialize_library;
pub use output::write_to_file;
pub use reader::{BlockImage, ExecutableImage, LibraryImage, read_executable, read_library};
pub use writer::{ByteWriter, checked_u16, checked_u32};

pub use vesper_core::ContainerError;

/// Magic that opens a library container.
pub const LIBRARY_MAGIC: &[u8; 12] = b"VESPERMODULE";

/// Magic that opens a single-file executable.
pub const EXECUTABLE_MAGIC: &[u8; 6] = b"VESPER";

/// Endianness marker. Only little-endian is defined.
pub const LITTLE_ENDIAN: u8 = 0;
