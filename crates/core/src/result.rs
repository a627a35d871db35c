//! Core results and error types

use crate::opcode::{Opcode, OperandShape};
use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The operand's tag does not match the shape the opcode requires.
    #[error("operand mismatch for {opcode}: expected {expected}, got {got}")]
    OperandMismatch {
        /// The opcode being constructed.
        opcode: Opcode,
        /// The operand shape the opcode requires.
        expected: OperandShape,
        /// The shape of the operand that was supplied.
        got: OperandShape,
    },

    /// The operand value does not fit the opcode's encoding.
    #[error("operand value {value} out of range for {opcode}")]
    OperandOutOfRange {
        /// The opcode being constructed.
        opcode: Opcode,
        /// The offending integer value.
        value: i64,
    },

    /// The local/argument index does not fit the opcode's encoding.
    #[error("local index {index} out of range for {opcode}")]
    LocalOutOfRange {
        /// The opcode being constructed.
        opcode: Opcode,
        /// The offending local slot index.
        index: u16,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
