//! Opcode definitions for the NXSL instruction set.

use crate::error::ProgramError;

/// Identifies the operation an instruction performs.
///
/// The `#[repr(u8)]` tag values follow the mnemonic table order.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// No operation.
    Nop = 0,
    /// Return from the current function (or halt when in `main`).
    Return = 1,
    /// Unconditional jump.
    Jmp = 2,
    /// Call a function at a resolved address.
    Call = 3,
    /// Call a function by name; rewritten to [`Opcode::Call`] when the name
    /// resolves to a script function, otherwise dispatched to the host.
    CallExternal = 4,
    /// Push a copy of the embedded constant.
    PushConstant = 5,
    /// Push a copy of a variable's value.
    PushVariable = 6,
    /// Pop the result value and halt.
    Exit = 7,
    /// Discard `stack_items` values.
    Pop = 8,
    /// Assign the top of the data stack to a variable (without popping).
    Set = 9,

    // Arithmetic
    Add = 10,
    Sub = 11,
    Mul = 12,
    Div = 13,
    Rem = 14,

    // Comparison
    Eq = 15,
    Ne = 16,
    Lt = 17,
    Le = 18,
    Gt = 19,
    Ge = 20,

    // Bitwise
    BitAnd = 21,
    BitOr = 22,
    BitXor = 23,

    // Logical
    And = 24,
    Or = 25,

    // Shifts
    LShift = 26,
    RShift = 27,

    /// Push null, then return.
    RetNull = 28,
    /// Pop a numeric condition; jump if it is zero.
    Jz = 29,
    /// Pop a value and write its string form to the output sink.
    Print = 30,
    /// Pop two values, push their string concatenation.
    Concat = 31,
    /// Alias the next positional argument to a named local.
    Bind = 32,
}

/// All valid opcodes, in tag order.
pub const ALL_OPCODES: [Opcode; 33] = [
    Opcode::Nop,
    Opcode::Return,
    Opcode::Jmp,
    Opcode::Call,
    Opcode::CallExternal,
    Opcode::PushConstant,
    Opcode::PushVariable,
    Opcode::Exit,
    Opcode::Pop,
    Opcode::Set,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Rem,
    Opcode::Eq,
    Opcode::Ne,
    Opcode::Lt,
    Opcode::Le,
    Opcode::Gt,
    Opcode::Ge,
    Opcode::BitAnd,
    Opcode::BitOr,
    Opcode::BitXor,
    Opcode::And,
    Opcode::Or,
    Opcode::LShift,
    Opcode::RShift,
    Opcode::RetNull,
    Opcode::Jz,
    Opcode::Print,
    Opcode::Concat,
    Opcode::Bind,
];

impl TryFrom<u8> for Opcode {
    type Error = ProgramError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_OPCODES
            .get(value as usize)
            .copied()
            .ok_or(ProgramError::InvalidOpcode(value))
    }
}

impl Opcode {
    /// Returns the listing mnemonic for this opcode.
    ///
    /// Mnemonics are not unique: both call forms print as `CALL` and both
    /// push forms as `PUSH`; the operand tells them apart.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Return => "RET",
            Opcode::Jmp => "JMP",
            Opcode::Call | Opcode::CallExternal => "CALL",
            Opcode::PushConstant | Opcode::PushVariable => "PUSH",
            Opcode::Exit => "EXIT",
            Opcode::Pop => "POP",
            Opcode::Set => "SET",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Rem => "REM",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::BitAnd => "BITAND",
            Opcode::BitOr => "BITOR",
            Opcode::BitXor => "BITXOR",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::LShift => "LSHIFT",
            Opcode::RShift => "RSHIFT",
            Opcode::RetNull => "NRET",
            Opcode::Jz => "JZ",
            Opcode::Print => "PRINT",
            Opcode::Concat => "CONCAT",
            Opcode::Bind => "BIND",
        }
    }

    /// True for the jump opcodes whose operand is a code address.
    pub fn is_jump(&self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Jz)
    }

    /// True for operators that pop two operands and push one result.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Rem
                | Opcode::Eq
                | Opcode::Ne
                | Opcode::Lt
                | Opcode::Le
                | Opcode::Gt
                | Opcode::Ge
                | Opcode::BitAnd
                | Opcode::BitOr
                | Opcode::BitXor
                | Opcode::And
                | Opcode::Or
                | Opcode::LShift
                | Opcode::RShift
                | Opcode::Concat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_table_order() {
        for (i, &opcode) in ALL_OPCODES.iter().enumerate() {
            assert_eq!(opcode as usize, i, "tag mismatch for {opcode:?}");
            assert_eq!(Opcode::try_from(i as u8), Ok(opcode));
        }
    }

    #[test]
    fn out_of_range_tag_rejected() {
        assert_eq!(Opcode::try_from(33), Err(ProgramError::InvalidOpcode(33)));
        assert_eq!(
            Opcode::try_from(0xFF),
            Err(ProgramError::InvalidOpcode(0xFF))
        );
    }

    #[test]
    fn shared_mnemonics() {
        assert_eq!(Opcode::Call.mnemonic(), "CALL");
        assert_eq!(Opcode::CallExternal.mnemonic(), "CALL");
        assert_eq!(Opcode::PushConstant.mnemonic(), "PUSH");
        assert_eq!(Opcode::PushVariable.mnemonic(), "PUSH");
        assert_eq!(Opcode::RetNull.mnemonic(), "NRET");
    }

    #[test]
    fn mnemonics_fit_listing_column() {
        for &opcode in &ALL_OPCODES {
            let m = opcode.mnemonic();
            assert!(!m.is_empty() && m.len() <= 6, "bad mnemonic {m}");
            assert_eq!(m, m.to_uppercase());
        }
    }

    #[test]
    fn binary_operator_set() {
        assert_eq!(ALL_OPCODES.iter().filter(|op| op.is_binary()).count(), 19);
        assert!(!Opcode::Print.is_binary());
        assert!(Opcode::Jz.is_jump());
        assert!(!Opcode::Call.is_jump());
    }
}
