//! Typed operand values and the identifier tables they reference.
//!
//! Field and method identifiers are declared statically up front (the
//! patch author writes them out once), never re-derived from string lookups
//! at match time. Equality is deep and value-based throughout.

use crate::opcode::OperandShape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a named field on a named type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Declaring type name.
    pub owner: String,
    /// Field name.
    pub name: String,
}

impl FieldRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// A reference to a named method on a named type.
///
/// The arity disambiguates overloads with the same name, e.g. a two-string
/// concat from a three-string concat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    /// Declaring type name.
    pub owner: String,
    /// Method name.
    pub name: String,
    /// Number of parameters.
    pub arity: usize,
}

impl MethodRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, arity: usize) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            arity,
        }
    }
}

/// Immediate data carried by an instruction.
///
/// Branch targets ride in [`Operand::Int`] as a non-negative instruction
/// index into the owning sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Operand {
    /// No immediate data.
    #[default]
    None,
    /// Integer constant (also used for branch target indices).
    Int(i64),
    /// String literal.
    Str(String),
    /// Field reference.
    Field(FieldRef),
    /// Method reference.
    Method(MethodRef),
    /// Local or argument slot index.
    Local(u16),
}

impl Operand {
    /// The shape this operand value satisfies.
    ///
    /// `Int` satisfies both the `Int` and `Target` shapes; the distinction is
    /// resolved by the opcode at construction time.
    pub fn shape(&self) -> OperandShape {
        match self {
            Operand::None => OperandShape::None,
            Operand::Int(_) => OperandShape::Int,
            Operand::Str(_) => OperandShape::Str,
            Operand::Field(_) => OperandShape::Field,
            Operand::Method(_) => OperandShape::Method,
            Operand::Local(_) => OperandShape::Local,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}/{}", self.owner, self.name, self.arity)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int(v) => write!(f, "{v}"),
            Operand::Str(s) => write!(f, "{s:?}"),
            Operand::Field(r) => write!(f, "{r}"),
            Operand::Method(r) => write!(f, "{r}"),
            Operand::Local(i) => write!(f, "V_{i}"),
        }
    }
}
