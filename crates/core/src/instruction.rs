//! The typed representation of one instruction.
//!
//! An [`Instruction`] pairs an opcode with the operand that opcode requires;
//! a mismatched pairing is rejected at construction and cannot exist as a
//! value. The smart constructors pick the same compact encoding a compiler
//! would, so fixture and replacement code is built the way real method bodies
//! look.

use crate::opcode::{Opcode, OperandShape};
use crate::operand::{FieldRef, MethodRef, Operand};
use crate::result::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered method body, indexed 0..n-1. Indices are stable only until a
/// removal or insertion shifts everything downstream of the edit.
pub type InstructionSequence = Vec<Instruction>;

/// One instruction: an opcode plus the operand its shape demands.
///
/// Fields are private so the construction invariant cannot be bypassed;
/// deserialization funnels through the same validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "InstructionRepr", into = "InstructionRepr")]
pub struct Instruction {
    opcode: Opcode,
    operand: Operand,
}

impl Instruction {
    /// Builds an instruction, rejecting operands the opcode cannot carry.
    ///
    /// # Errors
    /// * [`Error::OperandMismatch`] when the operand's tag disagrees with
    ///   the opcode's required shape.
    /// * [`Error::OperandOutOfRange`] / [`Error::LocalOutOfRange`] when the
    ///   value does not fit the chosen encoding (e.g. `ldc.i4.s` with a
    ///   value outside i8, or `ldloc.2` with a slot other than 2).
    pub fn new(opcode: Opcode, operand: Operand) -> Result<Self> {
        let expected = opcode.operand_shape();
        let got = operand.shape();
        let shape_ok = match expected {
            // Branch targets ride in the Int operand.
            OperandShape::Target => got == OperandShape::Int,
            other => got == other,
        };
        if !shape_ok {
            return Err(Error::OperandMismatch {
                opcode,
                expected,
                got,
            });
        }
        check_encoding_range(opcode, &operand)?;
        Ok(Self { opcode, operand })
    }

    /// The instruction's opcode tag.
    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The instruction's immediate data.
    #[inline]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// For branch instructions, the target instruction index; `None` for
    /// everything else.
    pub fn branch_target(&self) -> Option<usize> {
        if !self.opcode.is_branch() {
            return None;
        }
        match self.operand {
            Operand::Int(t) if t >= 0 => Some(t as usize),
            _ => None,
        }
    }

    /// Rewrites a branch's target index in place; no-op for non-branches.
    ///
    /// Used when an edit upstream of the target shifts instruction indices.
    pub fn retarget(&mut self, new_target: usize) {
        if self.opcode.is_branch() {
            self.operand = Operand::Int(new_target as i64);
        }
    }

    /// Builds an operand-less instruction (`nop`, `dup`, `pop`, `add`,
    /// `sub`, `ret`).
    pub fn simple(opcode: Opcode) -> Result<Self> {
        Self::new(opcode, Operand::None)
    }

    /// Loads a 32-bit integer constant in the most compact encoding.
    pub fn ldc_i4(value: i32) -> Self {
        let opcode = match value {
            -1 => Opcode::Ldc_I4_M1,
            0 => Opcode::Ldc_I4_0,
            1 => Opcode::Ldc_I4_1,
            2 => Opcode::Ldc_I4_2,
            3 => Opcode::Ldc_I4_3,
            4 => Opcode::Ldc_I4_4,
            5 => Opcode::Ldc_I4_5,
            6 => Opcode::Ldc_I4_6,
            7 => Opcode::Ldc_I4_7,
            8 => Opcode::Ldc_I4_8,
            v if i8::try_from(v).is_ok() => Opcode::Ldc_I4_S,
            _ => Opcode::Ldc_I4,
        };
        Self {
            opcode,
            operand: Operand::Int(value as i64),
        }
    }

    /// Loads a 64-bit integer constant.
    pub fn ldc_i8(value: i64) -> Self {
        Self {
            opcode: Opcode::Ldc_I8,
            operand: Operand::Int(value),
        }
    }

    /// Loads a string literal.
    pub fn ldstr(value: impl Into<String>) -> Self {
        Self {
            opcode: Opcode::Ldstr,
            operand: Operand::Str(value.into()),
        }
    }

    /// Loads a local in the most compact encoding.
    pub fn ldloc(slot: u16) -> Self {
        Self::slot_encoded(
            slot,
            [Opcode::Ldloc_0, Opcode::Ldloc_1, Opcode::Ldloc_2, Opcode::Ldloc_3],
            Opcode::Ldloc_S,
            Opcode::Ldloc,
        )
    }

    /// Stores a local in the most compact encoding.
    pub fn stloc(slot: u16) -> Self {
        Self::slot_encoded(
            slot,
            [Opcode::Stloc_0, Opcode::Stloc_1, Opcode::Stloc_2, Opcode::Stloc_3],
            Opcode::Stloc_S,
            Opcode::Stloc,
        )
    }

    /// Loads a local's address (`ldloca.s` where the slot fits a byte).
    pub fn ldloca(slot: u16) -> Self {
        let opcode = if u8::try_from(slot).is_ok() {
            Opcode::Ldloca_S
        } else {
            Opcode::Ldloca
        };
        Self {
            opcode,
            operand: Operand::Local(slot),
        }
    }

    /// Loads an argument in the most compact encoding.
    pub fn ldarg(slot: u16) -> Self {
        Self::slot_encoded(
            slot,
            [Opcode::Ldarg_0, Opcode::Ldarg_1, Opcode::Ldarg_2, Opcode::Ldarg_3],
            Opcode::Ldarg_S,
            Opcode::Ldarg,
        )
    }

    /// Loads a static field.
    pub fn ldsfld(field: FieldRef) -> Self {
        Self {
            opcode: Opcode::Ldsfld,
            operand: Operand::Field(field),
        }
    }

    /// Stores a static field.
    pub fn stsfld(field: FieldRef) -> Self {
        Self {
            opcode: Opcode::Stsfld,
            operand: Operand::Field(field),
        }
    }

    /// Loads an instance field.
    pub fn ldfld(field: FieldRef) -> Self {
        Self {
            opcode: Opcode::Ldfld,
            operand: Operand::Field(field),
        }
    }

    /// Calls a method non-virtually.
    pub fn call(method: MethodRef) -> Self {
        Self {
            opcode: Opcode::Call,
            operand: Operand::Method(method),
        }
    }

    /// Calls a method virtually.
    pub fn callvirt(method: MethodRef) -> Self {
        Self {
            opcode: Opcode::Callvirt,
            operand: Operand::Method(method),
        }
    }

    /// Allocates via a constructor.
    pub fn newobj(ctor: MethodRef) -> Self {
        Self {
            opcode: Opcode::Newobj,
            operand: Operand::Method(ctor),
        }
    }

    /// Unconditional branch to an instruction index.
    pub fn br(target: usize) -> Self {
        Self {
            opcode: Opcode::Br,
            operand: Operand::Int(target as i64),
        }
    }

    /// Branch-if-true to an instruction index.
    pub fn brtrue(target: usize) -> Self {
        Self {
            opcode: Opcode::Brtrue,
            operand: Operand::Int(target as i64),
        }
    }

    /// Branch-if-false to an instruction index.
    pub fn brfalse(target: usize) -> Self {
        Self {
            opcode: Opcode::Brfalse,
            operand: Operand::Int(target as i64),
        }
    }

    fn slot_encoded(slot: u16, compact: [Opcode; 4], short: Opcode, long: Opcode) -> Self {
        let opcode = match slot {
            0..=3 => compact[slot as usize],
            s if u8::try_from(s).is_ok() => short,
            _ => long,
        };
        Self {
            opcode,
            operand: Operand::Local(slot),
        }
    }
}

/// Rejects values the opcode's encoding cannot carry.
fn check_encoding_range(opcode: Opcode, operand: &Operand) -> Result<()> {
    use Opcode::*;
    match (opcode, operand) {
        (_, Operand::Int(v)) => {
            if let Some(implicit) = implicit_i4(opcode) {
                if *v != implicit {
                    return Err(Error::OperandOutOfRange { opcode, value: *v });
                }
            } else {
                let fits = match opcode {
                    Ldc_I4_S => i8::try_from(*v).is_ok(),
                    Ldc_I4 => i32::try_from(*v).is_ok(),
                    Ldc_I8 => true,
                    // Branch target: any non-negative index.
                    _ => *v >= 0,
                };
                if !fits {
                    return Err(Error::OperandOutOfRange { opcode, value: *v });
                }
            }
            Ok(())
        }
        (_, Operand::Local(slot)) => {
            let ok = if let Some(implicit) = implicit_slot(opcode) {
                *slot == implicit
            } else if matches!(opcode, Ldloc_S | Stloc_S | Ldloca_S | Ldarg_S) {
                u8::try_from(*slot).is_ok()
            } else {
                true
            };
            if ok {
                Ok(())
            } else {
                Err(Error::LocalOutOfRange {
                    opcode,
                    index: *slot,
                })
            }
        }
        _ => Ok(()),
    }
}

/// The constant baked into a compact `ldc.i4.*` opcode, if any.
fn implicit_i4(opcode: Opcode) -> Option<i64> {
    use Opcode::*;
    match opcode {
        Ldc_I4_M1 => Some(-1),
        Ldc_I4_0 => Some(0),
        Ldc_I4_1 => Some(1),
        Ldc_I4_2 => Some(2),
        Ldc_I4_3 => Some(3),
        Ldc_I4_4 => Some(4),
        Ldc_I4_5 => Some(5),
        Ldc_I4_6 => Some(6),
        Ldc_I4_7 => Some(7),
        Ldc_I4_8 => Some(8),
        _ => None,
    }
}

/// The slot baked into a compact `ldloc.N`/`stloc.N`/`ldarg.N` opcode, if any.
fn implicit_slot(opcode: Opcode) -> Option<u16> {
    use Opcode::*;
    match opcode {
        Ldloc_0 | Stloc_0 | Ldarg_0 => Some(0),
        Ldloc_1 | Stloc_1 | Ldarg_1 => Some(1),
        Ldloc_2 | Stloc_2 | Ldarg_2 => Some(2),
        Ldloc_3 | Stloc_3 | Ldarg_3 => Some(3),
        _ => None,
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::None => f.write_str(self.opcode.mnemonic()),
            operand => write!(f, "{} {}", self.opcode.mnemonic(), operand),
        }
    }
}

/// Serialized form; conversion back into [`Instruction`] re-runs the
/// construction checks, so hand-edited files cannot smuggle in a mismatched
/// pairing.
#[derive(Serialize, Deserialize)]
struct InstructionRepr {
    opcode: Opcode,
    #[serde(default, skip_serializing_if = "operand_is_none")]
    operand: Operand,
}

fn operand_is_none(operand: &Operand) -> bool {
    matches!(operand, Operand::None)
}

impl TryFrom<InstructionRepr> for Instruction {
    type Error = Error;

    fn try_from(repr: InstructionRepr) -> Result<Self> {
        Instruction::new(repr.opcode, repr.operand)
    }
}

impl From<Instruction> for InstructionRepr {
    fn from(ins: Instruction) -> Self {
        Self {
            opcode: ins.opcode,
            operand: ins.operand,
        }
    }
}
