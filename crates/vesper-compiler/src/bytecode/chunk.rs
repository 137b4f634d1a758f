//! Bytecode chunk for compiled functions.
//!
//! A `BytecodeChunk` contains the compiled bytecode for a single function,
//! along with line number information for debugging. All multi-byte operands
//! are stored little-endian regardless of the host.

use super::OpCode;

/// A chunk of compiled bytecode for a single function.
///
/// Constants live in the enclosing block's `ConstantPool`; the chunk only
/// carries their ordinals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BytecodeChunk {
    /// The bytecode instructions.
    code: Vec<u8>,
    /// Line numbers for debugging (parallel to code).
    /// Each entry corresponds to a byte in `code`.
    lines: Vec<u32>,
}

impl BytecodeChunk {
    /// Create a new empty bytecode chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bytecode chunk with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity),
            lines: Vec::with_capacity(capacity),
        }
    }

    /// Write an opcode.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write_u8(op.into(), line);
    }

    /// Write an unsigned byte operand.
    pub fn write_u8(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Write a signed byte operand.
    pub fn write_i8(&mut self, value: i8, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a 16-bit operand.
    pub fn write_u16(&mut self, value: u16, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a 32-bit operand.
    pub fn write_u32(&mut self, value: u32, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a signed 32-bit operand.
    pub fn write_i32(&mut self, value: i32, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a signed 64-bit operand.
    pub fn write_i64(&mut self, value: i64, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    /// Write a double operand.
    pub fn write_f64(&mut self, value: f64, line: u32) {
        self.write_bytes(&value.to_le_bytes(), line);
    }

    fn write_bytes(&mut self, bytes: &[u8], line: u32) {
        self.code.extend_from_slice(bytes);
        self.lines.extend(std::iter::repeat_n(line, bytes.len()));
    }

    /// Insert raw bytes at `offset`, shifting everything after it.
    ///
    /// This is the only backpatching primitive: there is no branch lowering
    /// yet, so no jump encoding is defined on top of it. Offsets recorded
    /// before `offset` stay valid; offsets after it move by `bytes.len()`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the chunk.
    pub fn insert_bytes(&mut self, offset: usize, bytes: &[u8], line: u32) {
        assert!(
            offset <= self.code.len(),
            "insert offset {} past end of chunk ({} bytes)",
            offset,
            self.code.len()
        );
        self.code.splice(offset..offset, bytes.iter().copied());
        self.lines
            .splice(offset..offset, std::iter::repeat_n(line, bytes.len()));
    }

    /// Get current code offset.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Get the bytecode.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Get the line numbers.
    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    /// Get the line number for a given offset.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    /// Get the length of the bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Read a byte at the given offset.
    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Read a u16 at the given offset.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let bytes = self.code.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a u32 at the given offset.
    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        let bytes = self.code.get(offset..offset + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read an opcode at the given offset.
    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.code.get(offset).and_then(|&b| OpCode::from_u8(b))
    }

    /// Extract all opcodes from the chunk, skipping operands.
    ///
    /// This is useful for testing bytecode sequences without worrying about
    /// specific operand values or instruction offsets.
    pub fn opcodes(&self) -> Vec<OpCode> {
        let mut ops = Vec::new();
        let mut offset = 0;

        while offset < self.code.len() {
            if let Some(op) = self.read_op(offset) {
                ops.push(op);
                offset += 1 + op.operand_size();
            } else {
                // Invalid opcode, skip one byte
                offset += 1;
            }
        }

        ops
    }

    /// Check if this chunk contains exactly the given opcode sequence.
    ///
    /// This ignores operand values, only checking the opcodes themselves.
    /// Panics with a descriptive message if the sequences don't match.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_empty() {
        let chunk = BytecodeChunk::new();
        assert!(chunk.is_empty());
        assert_eq!(chunk.len(), 0);
        assert!(chunk.lines().is_empty());
    }

    #[test]
    fn write_op() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_u8(42, 1);

        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.read_op(0), Some(OpCode::Constant));
        assert_eq!(chunk.read_u8(1), Some(42));
        assert_eq!(chunk.line_at(0), Some(1));
        assert_eq!(chunk.line_at(1), Some(1));
    }

    #[test]
    fn multi_byte_operands_are_little_endian() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_u16(0x1234, 5);
        chunk.write_u32(0xAABB_CCDD, 6);

        assert_eq!(&chunk.code()[..2], &[0x34, 0x12]);
        assert_eq!(&chunk.code()[2..], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(chunk.read_u16(0), Some(0x1234));
        assert_eq!(chunk.read_u32(2), Some(0xAABB_CCDD));
        assert_eq!(chunk.lines(), &[5, 5, 6, 6, 6, 6]);
    }

    #[test]
    fn signed_and_wide_encoders() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_i8(-1, 1);
        chunk.write_i32(-2, 1);
        chunk.write_i64(i64::MIN, 2);
        chunk.write_f64(1.5, 3);

        assert_eq!(chunk.len(), 1 + 4 + 8 + 8);
        assert_eq!(chunk.read_u8(0), Some(0xFF));
        assert_eq!(&chunk.code()[1..5], &(-2i32).to_le_bytes());
        assert_eq!(&chunk.code()[5..13], &i64::MIN.to_le_bytes());
        assert_eq!(&chunk.code()[13..], &1.5f64.to_le_bytes());
        assert_eq!(chunk.lines().len(), chunk.code().len());
    }

    #[test]
    fn insert_bytes_shifts_tail_and_lines() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::LoadLocal0, 1);
        chunk.write_op(OpCode::Print, 2);

        chunk.insert_bytes(1, &[0xAA, 0xBB], 9);

        assert_eq!(
            chunk.code(),
            &[OpCode::LoadLocal0 as u8, 0xAA, 0xBB, OpCode::Print as u8]
        );
        assert_eq!(chunk.lines(), &[1, 9, 9, 2]);
    }

    #[test]
    fn insert_at_end_appends() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Return, 1);
        chunk.insert_bytes(chunk.current_offset(), &[7], 2);
        assert_eq!(chunk.read_u8(1), Some(7));
        assert_eq!(chunk.len(), chunk.lines().len());
    }

    #[test]
    #[should_panic(expected = "past end of chunk")]
    fn insert_past_end_panics() {
        let mut chunk = BytecodeChunk::new();
        chunk.insert_bytes(1, &[0], 1);
    }

    #[test]
    fn read_out_of_bounds() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_u8(1, 1);
        assert_eq!(chunk.read_u8(1), None);
        assert_eq!(chunk.read_u16(0), None);
        assert_eq!(chunk.read_u32(0), None);
    }

    #[test]
    fn opcodes_extraction() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_u8(0, 1);
        chunk.write_op(OpCode::ConstantLong, 1);
        chunk.write_u32(300, 1);
        chunk.write_op(OpCode::AddF, 1);
        chunk.write_op(OpCode::StoreLocal, 1);
        chunk.write_u8(7, 1);

        assert_eq!(
            chunk.opcodes(),
            vec![
                OpCode::Constant,
                OpCode::ConstantLong,
                OpCode::AddF,
                OpCode::StoreLocal
            ]
        );
    }

    #[test]
    #[should_panic(expected = "Bytecode mismatch")]
    fn assert_opcodes_failure() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_u8(0, 1);

        chunk.assert_opcodes(&[OpCode::LoadLocal0]);
    }
}
