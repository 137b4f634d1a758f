//! Bytecode operation codes.
//!
//! This module defines the instruction set of the Vesper VM.
//! Each opcode is a single byte, with operands following inline in
//! little-endian order.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bytecode operation codes.
///
/// The VM is a stack-based machine. Arithmetic pops two operands and pushes
/// the result; loads push, stores and `Print` pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Push constant from the block pool.
    /// Operand: u8 ordinal
    Constant = 0,
    /// Push constant from the block pool.
    /// Operand: u32 ordinal
    ConstantLong,

    // =========================================================================
    // Float arithmetic
    // =========================================================================
    /// Add two f64 values.
    AddF,
    /// Subtract two f64 values.
    SubF,
    /// Multiply two f64 values.
    MulF,
    /// Divide two f64 values.
    DivF,

    // =========================================================================
    // Integer arithmetic (wrapping)
    // =========================================================================
    /// Add two i64 values, wrapping on overflow.
    AddI,
    /// Subtract two i64 values, wrapping on overflow.
    SubI,
    /// Multiply two i64 values, wrapping on overflow.
    MulI,
    /// Divide two i64 values, wrapping on overflow.
    DivI,

    // =========================================================================
    // Integer arithmetic (checked)
    // =========================================================================
    /// Add two i64 values, trapping on overflow.
    AddIChecked,
    /// Subtract two i64 values, trapping on overflow.
    SubIChecked,
    /// Multiply two i64 values, trapping on overflow.
    MulIChecked,
    /// Divide two i64 values, trapping on overflow.
    DivIChecked,

    // =========================================================================
    // Local Variables
    // =========================================================================
    /// Load slot 0.
    LoadLocal0,
    /// Load slot 1.
    LoadLocal1,
    /// Load slot 2.
    LoadLocal2,
    /// Load slot 3.
    LoadLocal3,
    /// Load slot 4.
    LoadLocal4,
    /// Load local variable.
    /// Operand: u8 slot
    LoadLocal,
    /// Reserved long-form load. Never emitted.
    /// Operand: u16 slot
    LoadLocalLong,
    /// Store to slot 0.
    StoreLocal0,
    /// Store to slot 1.
    StoreLocal1,
    /// Store to slot 2.
    StoreLocal2,
    /// Store to slot 3.
    StoreLocal3,
    /// Store to slot 4.
    StoreLocal4,
    /// Store to local variable.
    /// Operand: u8 slot
    StoreLocal,
    /// Reserved long-form store. Never emitted.
    /// Operand: u16 slot
    StoreLocalLong,

    // =========================================================================
    // Control
    // =========================================================================
    /// Return from the current function.
    Return,
    /// Debug intrinsic: pop and print the top of stack.
    Print,
}

/// Highest slot reachable through the zero-operand load/store forms.
pub const SHORT_SLOT_MAX: u32 = 4;

impl OpCode {
    /// Decode an opcode byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Get the size of operands for this opcode in bytes.
    ///
    /// This does NOT include the opcode byte itself.
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::Constant | OpCode::LoadLocal | OpCode::StoreLocal => 1,
            OpCode::LoadLocalLong | OpCode::StoreLocalLong => 2,
            OpCode::ConstantLong => 4,
            _ => 0,
        }
    }

    /// Net change in operand-stack depth after executing this opcode.
    pub fn stack_effect(&self) -> i32 {
        match self {
            OpCode::Constant
            | OpCode::ConstantLong
            | OpCode::LoadLocal0
            | OpCode::LoadLocal1
            | OpCode::LoadLocal2
            | OpCode::LoadLocal3
            | OpCode::LoadLocal4
            | OpCode::LoadLocal
            | OpCode::LoadLocalLong => 1,

            OpCode::AddF
            | OpCode::SubF
            | OpCode::MulF
            | OpCode::DivF
            | OpCode::AddI
            | OpCode::SubI
            | OpCode::MulI
            | OpCode::DivI
            | OpCode::AddIChecked
            | OpCode::SubIChecked
            | OpCode::MulIChecked
            | OpCode::DivIChecked
            | OpCode::StoreLocal0
            | OpCode::StoreLocal1
            | OpCode::StoreLocal2
            | OpCode::StoreLocal3
            | OpCode::StoreLocal4
            | OpCode::StoreLocal
            | OpCode::StoreLocalLong
            | OpCode::Print => -1,

            OpCode::Return => 0,
        }
    }

    /// Zero-operand load for slots `0..=4`.
    pub fn short_load(slot: u32) -> Option<Self> {
        match slot {
            0 => Some(OpCode::LoadLocal0),
            1 => Some(OpCode::LoadLocal1),
            2 => Some(OpCode::LoadLocal2),
            3 => Some(OpCode::LoadLocal3),
            4 => Some(OpCode::LoadLocal4),
            _ => None,
        }
    }

    /// Zero-operand store for slots `0..=4`.
    pub fn short_store(slot: u32) -> Option<Self> {
        match slot {
            0 => Some(OpCode::StoreLocal0),
            1 => Some(OpCode::StoreLocal1),
            2 => Some(OpCode::StoreLocal2),
            3 => Some(OpCode::StoreLocal3),
            4 => Some(OpCode::StoreLocal4),
            _ => None,
        }
    }

    /// Slot addressed by a zero-operand load or store.
    pub fn implicit_slot(&self) -> Option<u32> {
        match self {
            OpCode::LoadLocal0 | OpCode::StoreLocal0 => Some(0),
            OpCode::LoadLocal1 | OpCode::StoreLocal1 => Some(1),
            OpCode::LoadLocal2 | OpCode::StoreLocal2 => Some(2),
            OpCode::LoadLocal3 | OpCode::StoreLocal3 => Some(3),
            OpCode::LoadLocal4 | OpCode::StoreLocal4 => Some(4),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::ConstantLong => "CONSTANT_LONG",
            OpCode::AddF => "ADD_F",
            OpCode::SubF => "SUB_F",
            OpCode::MulF => "MUL_F",
            OpCode::DivF => "DIV_F",
            OpCode::AddI => "ADD_I",
            OpCode::SubI => "SUB_I",
            OpCode::MulI => "MUL_I",
            OpCode::DivI => "DIV_I",
            OpCode::AddIChecked => "ADD_I_CHECKED",
            OpCode::SubIChecked => "SUB_I_CHECKED",
            OpCode::MulIChecked => "MUL_I_CHECKED",
            OpCode::DivIChecked => "DIV_I_CHECKED",
            OpCode::LoadLocal0 => "LOAD_LOCAL_0",
            OpCode::LoadLocal1 => "LOAD_LOCAL_1",
            OpCode::LoadLocal2 => "LOAD_LOCAL_2",
            OpCode::LoadLocal3 => "LOAD_LOCAL_3",
            OpCode::LoadLocal4 => "LOAD_LOCAL_4",
            OpCode::LoadLocal => "LOAD_LOCAL",
            OpCode::LoadLocalLong => "LOAD_LOCAL_LONG",
            OpCode::StoreLocal0 => "STORE_LOCAL_0",
            OpCode::StoreLocal1 => "STORE_LOCAL_1",
            OpCode::StoreLocal2 => "STORE_LOCAL_2",
            OpCode::StoreLocal3 => "STORE_LOCAL_3",
            OpCode::StoreLocal4 => "STORE_LOCAL_4",
            OpCode::StoreLocal => "STORE_LOCAL",
            OpCode::StoreLocalLong => "STORE_LOCAL_LONG",
            OpCode::Return => "RETURN",
            OpCode::Print => "PRINT",
        }
    }
}
