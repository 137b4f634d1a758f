//! Compiler configuration.

use std::fmt;

/// Library container format version, written as four `u16` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
    pub build: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16, build: u16) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(1, 0, 0, 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Options that shape code generation and container output.
///
/// ```
/// use vesper_compiler::{CompilerOptions, Version};
///
/// let options = CompilerOptions::default()
///     .with_checked_arithmetic(true)
///     .with_version(Version::new(2, 1, 0, 0));
/// assert!(options.emit_line_info);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Version written into library containers.
    pub version: Version,
    /// Lower integer arithmetic to the trapping opcodes.
    pub checked_arithmetic: bool,
    /// Write per-byte line arrays into containers.
    pub emit_line_info: bool,
    /// Major/minor written into single-file executables.
    pub executable_version: (u8, u8),
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            version: Version::default(),
            checked_arithmetic: false,
            emit_line_info: true,
            executable_version: (1, 0),
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_checked_arithmetic(mut self, checked: bool) -> Self {
        self.checked_arithmetic = checked;
        self
    }

    pub fn with_line_info(mut self, emit: bool) -> Self {
        self.emit_line_info = emit;
        self
    }

    pub fn with_executable_version(mut self, major: u8, minor: u8) -> Self {
        self.executable_version = (major, minor);
        self
    }
}
