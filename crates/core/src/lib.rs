pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod pattern;
pub mod result;
pub mod scanner;

pub use instruction::{Instruction, InstructionSequence};
pub use opcode::{EncodingClass, Opcode, OperandShape};
pub use operand::{FieldRef, MethodRef, Operand};
pub use pattern::{MatchRule, OperandPredicate, Pattern};
pub use result::{Error, Result};
pub use scanner::{MatchWindow, matches_at, scan, scan_all};

/// Returns true if the opcode transfers control within the method.
///
/// Branches are what make a removal window unsafe: deleting an instruction
/// something else jumps to breaks the method.
#[inline]
pub fn is_branch_opcode(opcode: Opcode) -> bool {
    opcode.is_branch()
}

/// Returns true if the opcode ends execution of the method.
#[inline]
pub fn is_terminal_opcode(opcode: Opcode) -> bool {
    opcode.is_terminal()
}

/// Renders a sequence as one assembly-style line per instruction, prefixed
/// with its index.
pub fn render_listing(sequence: &[Instruction]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (index, instruction) in sequence.iter().enumerate() {
        let _ = writeln!(out, "IL_{index:04}: {instruction}");
    }
    out
}
