//! Match rules and patterns over instruction windows.
//!
//! A rule tests exactly one instruction with exactly one predicate; there is
//! no backtracking inside a rule. Retrying at the next start offset is the
//! scanner's job.

use crate::instruction::Instruction;
use crate::opcode::{EncodingClass, Opcode};
use crate::operand::{FieldRef, MethodRef, Operand};
use serde::{Deserialize, Serialize};

/// Declarative predicate over an instruction's operand.
///
/// Kept as data rather than closures so patch specs serialize and diff
/// cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum OperandPredicate {
    /// Accept any operand, including none.
    #[default]
    Any,
    /// Operand is an integer constant of any value.
    IsInt,
    /// Operand is an integer constant with this exact value.
    IntEquals(i64),
    /// Operand is a string literal with this exact value.
    StrEquals(String),
    /// Operand is a local slot of any index.
    IsLocal,
    /// Operand is this exact local slot.
    LocalEquals(u16),
    /// Operand is this exact field reference.
    FieldEquals(FieldRef),
    /// Operand is this exact method reference.
    MethodEquals(MethodRef),
}

impl OperandPredicate {
    /// Tests the predicate against an operand value.
    pub fn holds(&self, operand: &Operand) -> bool {
        match self {
            OperandPredicate::Any => true,
            OperandPredicate::IsInt => matches!(operand, Operand::Int(_)),
            OperandPredicate::IntEquals(v) => matches!(operand, Operand::Int(o) if o == v),
            OperandPredicate::StrEquals(s) => matches!(operand, Operand::Str(o) if o == s),
            OperandPredicate::IsLocal => matches!(operand, Operand::Local(_)),
            OperandPredicate::LocalEquals(i) => matches!(operand, Operand::Local(o) if o == i),
            OperandPredicate::FieldEquals(r) => matches!(operand, Operand::Field(o) if o == r),
            OperandPredicate::MethodEquals(r) => matches!(operand, Operand::Method(o) if o == r),
        }
    }
}

/// One positional test in a pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchRule {
    /// Exact opcode plus deep operand equality.
    Exact {
        /// Required opcode.
        opcode: Opcode,
        /// Required operand value.
        operand: Operand,
    },
    /// Encoding-class membership plus an operand predicate. This is how a
    /// pattern matches "a constant load of any encoding" without naming
    /// every compact variant.
    AnyOf {
        /// Accepted encoding classes.
        classes: Vec<EncodingClass>,
        /// Predicate over the operand.
        #[serde(default)]
        operand: OperandPredicate,
    },
}

impl MatchRule {
    /// Exact match on an already-built instruction.
    pub fn is(instruction: &Instruction) -> Self {
        MatchRule::Exact {
            opcode: instruction.opcode(),
            operand: instruction.operand().clone(),
        }
    }

    /// Exact match on an opcode with no operand.
    pub fn opcode(opcode: Opcode) -> Self {
        MatchRule::Exact {
            opcode,
            operand: Operand::None,
        }
    }

    /// Class match with an operand predicate.
    pub fn any_of(classes: impl Into<Vec<EncodingClass>>, operand: OperandPredicate) -> Self {
        MatchRule::AnyOf {
            classes: classes.into(),
            operand,
        }
    }

    /// Shorthand for "an integer constant load of any encoding".
    pub fn any_int_const() -> Self {
        MatchRule::AnyOf {
            classes: vec![EncodingClass::IntConst],
            operand: OperandPredicate::IsInt,
        }
    }

    /// Tests this rule against one instruction.
    pub fn matches(&self, instruction: &Instruction) -> bool {
        match self {
            MatchRule::Exact { opcode, operand } => {
                instruction.opcode() == *opcode && instruction.operand() == operand
            }
            MatchRule::AnyOf { classes, operand } => {
                classes.contains(&instruction.opcode().encoding_class())
                    && operand.holds(instruction.operand())
            }
        }
    }
}

/// An ordered list of match rules describing a target instruction window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    rules: Vec<MatchRule>,
}

impl Pattern {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    /// Number of instructions a full match spans.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The positional rules, in order.
    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }
}

impl From<Vec<MatchRule>> for Pattern {
    fn from(rules: Vec<MatchRule>) -> Self {
        Self::new(rules)
    }
}
