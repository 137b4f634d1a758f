//! Bytecode disassembler.
//!
//! Renders one instruction per line:
//!
//! ```text
//! 0000    1 CONSTANT          0 (3.14)
//! 0002    1 STORE_LOCAL_0
//! ```
//!
//! A `|` replaces the line number when it repeats the previous instruction's.

use std::fmt::Write;

use super::{BytecodeChunk, Constant, ConstantPool, OpCode};

/// Disassemble a chunk against the pool its constant ordinals refer to.
pub fn disassemble(chunk: &BytecodeChunk, constants: &ConstantPool) -> String {
    let mut out = String::new();
    let mut offset = 0;
    let mut last_line = None;

    while offset < chunk.len() {
        let line = chunk.line_at(offset).unwrap_or(0);
        let _ = write!(out, "{offset:04} ");
        if last_line == Some(line) {
            let _ = write!(out, "   | ");
        } else {
            let _ = write!(out, "{line:4} ");
        }
        last_line = Some(line);

        let Some(op) = chunk.read_op(offset) else {
            let byte = chunk.read_u8(offset).unwrap_or(0);
            let _ = writeln!(out, "<unknown {byte:#04x}>");
            offset += 1;
            continue;
        };

        let operand_at = offset + 1;
        match op {
            OpCode::Constant => match chunk.read_u8(operand_at) {
                Some(ordinal) => constant_line(&mut out, op, ordinal as u32, constants),
                None => truncated(&mut out, op),
            },
            OpCode::ConstantLong => match chunk.read_u32(operand_at) {
                Some(ordinal) => constant_line(&mut out, op, ordinal, constants),
                None => truncated(&mut out, op),
            },
            OpCode::LoadLocal | OpCode::StoreLocal => match chunk.read_u8(operand_at) {
                Some(slot) => {
                    let _ = writeln!(out, "{:<16} {slot}", op.name());
                }
                None => truncated(&mut out, op),
            },
            OpCode::LoadLocalLong | OpCode::StoreLocalLong => match chunk.read_u16(operand_at) {
                Some(slot) => {
                    let _ = writeln!(out, "{:<16} {slot}", op.name());
                }
                None => truncated(&mut out, op),
            },
            _ => {
                let _ = writeln!(out, "{}", op.name());
            }
        }

        offset += 1 + op.operand_size();
    }

    out
}

fn constant_line(out: &mut String, op: OpCode, ordinal: u32, constants: &ConstantPool) {
    let value = match constants.get(ordinal) {
        Some(Constant::Int(v)) => v.to_string(),
        Some(Constant::UInt(v)) => format!("{v}u"),
        Some(Constant::Float(v)) => format!("{v:?}"),
        Some(Constant::Str(s)) => format!("{s:?}"),
        None => "<missing>".to_string(),
    };
    let _ = writeln!(out, "{:<16} {ordinal} ({value})", op.name());
}

fn truncated(out: &mut String, op: OpCode) {
    let _ = writeln!(out, "{} <truncated>", op.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_instructions_with_constants() {
        let mut pool = ConstantPool::new();
        pool.add_f64(1.5).unwrap();
        pool.add_string("hi").unwrap();

        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_u8(0, 1);
        chunk.write_op(OpCode::ConstantLong, 2);
        chunk.write_u32(1, 2);
        chunk.write_op(OpCode::StoreLocal, 2);
        chunk.write_u8(9, 2);
        chunk.write_op(OpCode::Return, 3);

        let text = disassemble(&chunk, &pool);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("0000    1 CONSTANT"));
        assert!(lines[0].ends_with("0 (1.5)"));
        assert!(lines[1].starts_with("0002    2 CONSTANT_LONG"));
        assert!(lines[1].ends_with("1 (\"hi\")"));
        assert!(lines[2].starts_with("0007    | STORE_LOCAL"));
        assert!(lines[2].ends_with(" 9"));
        assert_eq!(lines[3], "0009    3 RETURN");
    }

    #[test]
    fn unknown_and_truncated_bytes() {
        let pool = ConstantPool::new();
        let mut chunk = BytecodeChunk::new();
        chunk.write_u8(0xFE, 1);
        chunk.write_op(OpCode::Constant, 1);

        let text = disassemble(&chunk, &pool);
        assert!(text.contains("<unknown 0xfe>"));
        assert!(text.contains("CONSTANT <truncated>"));
    }

    #[test]
    fn missing_constant_is_marked() {
        let pool = ConstantPool::new();
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write_u8(3, 1);

        assert!(disassemble(&chunk, &pool).contains("3 (<missing>)"));
    }
}
