//! Closed enumeration of the instruction tags the patcher understands.
//!
//! Variant names follow the CIL mnemonics, so a pattern written against a
//! disassembly listing reads the same in both. The set is deliberately
//! bounded: it covers constant loads in every encoding the compiler may pick,
//! local/argument traffic, field access, calls, and straight branches. This is
//! enough to describe any window a patch would match; it is not a general
//! disassembler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction tag. Each opcode has exactly one required operand shape,
/// reported by [`Opcode::operand_shape`].
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // Operand-less
    Nop,
    Dup,
    Pop,
    Add,
    Sub,
    Ret,

    // Integer constant loads, compact through general encodings
    Ldc_I4_M1,
    Ldc_I4_0,
    Ldc_I4_1,
    Ldc_I4_2,
    Ldc_I4_3,
    Ldc_I4_4,
    Ldc_I4_5,
    Ldc_I4_6,
    Ldc_I4_7,
    Ldc_I4_8,
    Ldc_I4_S,
    Ldc_I4,
    Ldc_I8,

    // String constant load
    Ldstr,

    // Local variable loads
    Ldloc_0,
    Ldloc_1,
    Ldloc_2,
    Ldloc_3,
    Ldloc_S,
    Ldloc,

    // Local variable stores
    Stloc_0,
    Stloc_1,
    Stloc_2,
    Stloc_3,
    Stloc_S,
    Stloc,

    // Local variable address loads
    Ldloca_S,
    Ldloca,

    // Argument loads
    Ldarg_0,
    Ldarg_1,
    Ldarg_2,
    Ldarg_3,
    Ldarg_S,
    Ldarg,

    // Field access
    Ldfld,
    Stfld,
    Ldsfld,
    Stsfld,

    // Calls and allocation
    Call,
    Callvirt,
    Newobj,

    // Branches (operand is the target instruction index)
    Br_S,
    Br,
    Brtrue_S,
    Brtrue,
    Brfalse_S,
    Brfalse,
}

/// The operand shape an opcode requires, fixed per opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperandShape {
    /// No operand.
    None,
    /// Integer constant.
    Int,
    /// String literal.
    Str,
    /// Field reference.
    Field,
    /// Method reference.
    Method,
    /// Local or argument slot index.
    Local,
    /// Branch target, carried as a non-negative integer instruction index.
    Target,
}

/// Canonical category of an opcode regardless of which equivalent
/// compact/general encoding the compiler chose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingClass {
    /// Any `ldc.i4.*` encoding of a 32-bit integer constant.
    IntConst,
    /// `ldc.i8`.
    LongConst,
    /// `ldstr`.
    StringConst,
    /// Any `ldloc*` encoding.
    LocalLoad,
    /// Any `stloc*` encoding.
    LocalStore,
    /// Any `ldloca*` encoding.
    LocalAddr,
    /// Any `ldarg*` encoding.
    ArgLoad,
    /// `ldfld` / `ldsfld`.
    FieldLoad,
    /// `stfld` / `stsfld`.
    FieldStore,
    /// `call` / `callvirt`.
    Invoke,
    /// `newobj`.
    ObjectNew,
    /// Any branch encoding.
    Branch,
    /// `ret`.
    Return,
    /// `add` / `sub`.
    Arith,
    /// `nop` / `dup` / `pop`.
    StackOp,
}

impl Opcode {
    /// Returns the operand shape this opcode requires.
    ///
    /// Pure and total over the enumeration; instruction construction rejects
    /// any operand whose tag disagrees with the returned shape.
    pub fn operand_shape(self) -> OperandShape {
        use Opcode::*;
        match self {
            Nop | Dup | Pop | Add | Sub | Ret => OperandShape::None,
            Ldc_I4_M1 | Ldc_I4_0 | Ldc_I4_1 | Ldc_I4_2 | Ldc_I4_3 | Ldc_I4_4 | Ldc_I4_5
            | Ldc_I4_6 | Ldc_I4_7 | Ldc_I4_8 | Ldc_I4_S | Ldc_I4 | Ldc_I8 => OperandShape::Int,
            Ldstr => OperandShape::Str,
            Ldloc_0 | Ldloc_1 | Ldloc_2 | Ldloc_3 | Ldloc_S | Ldloc | Stloc_0 | Stloc_1
            | Stloc_2 | Stloc_3 | Stloc_S | Stloc | Ldloca_S | Ldloca | Ldarg_0 | Ldarg_1
            | Ldarg_2 | Ldarg_3 | Ldarg_S | Ldarg => OperandShape::Local,
            Ldfld | Stfld | Ldsfld | Stsfld => OperandShape::Field,
            Call | Callvirt | Newobj => OperandShape::Method,
            Br_S | Br | Brtrue_S | Brtrue | Brfalse_S | Brfalse => OperandShape::Target,
        }
    }

    /// Maps this opcode to its canonical encoding class.
    ///
    /// Every compact encoding of the same logical operation lands in the same
    /// class, so a pattern can ask for "a constant load of any encoding"
    /// without enumerating the variants. Pure and total.
    pub fn encoding_class(self) -> EncodingClass {
        use Opcode::*;
        match self {
            Ldc_I4_M1 | Ldc_I4_0 | Ldc_I4_1 | Ldc_I4_2 | Ldc_I4_3 | Ldc_I4_4 | Ldc_I4_5
            | Ldc_I4_6 | Ldc_I4_7 | Ldc_I4_8 | Ldc_I4_S | Ldc_I4 => EncodingClass::IntConst,
            Ldc_I8 => EncodingClass::LongConst,
            Ldstr => EncodingClass::StringConst,
            Ldloc_0 | Ldloc_1 | Ldloc_2 | Ldloc_3 | Ldloc_S | Ldloc => EncodingClass::LocalLoad,
            Stloc_0 | Stloc_1 | Stloc_2 | Stloc_3 | Stloc_S | Stloc => EncodingClass::LocalStore,
            Ldloca_S | Ldloca => EncodingClass::LocalAddr,
            Ldarg_0 | Ldarg_1 | Ldarg_2 | Ldarg_3 | Ldarg_S | Ldarg => EncodingClass::ArgLoad,
            Ldfld | Ldsfld => EncodingClass::FieldLoad,
            Stfld | Stsfld => EncodingClass::FieldStore,
            Call | Callvirt => EncodingClass::Invoke,
            Newobj => EncodingClass::ObjectNew,
            Br_S | Br | Brtrue_S | Brtrue | Brfalse_S | Brfalse => EncodingClass::Branch,
            Ret => EncodingClass::Return,
            Add | Sub => EncodingClass::Arith,
            Nop | Dup | Pop => EncodingClass::StackOp,
        }
    }

    /// Returns true if the opcode transfers control within the method.
    #[inline]
    pub fn is_branch(self) -> bool {
        self.encoding_class() == EncodingClass::Branch
    }

    /// Returns true if the opcode ends execution of the method.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Opcode::Ret)
    }

    /// The CIL mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Nop => "nop",
            Dup => "dup",
            Pop => "pop",
            Add => "add",
            Sub => "sub",
            Ret => "ret",
            Ldc_I4_M1 => "ldc.i4.m1",
            Ldc_I4_0 => "ldc.i4.0",
            Ldc_I4_1 => "ldc.i4.1",
            Ldc_I4_2 => "ldc.i4.2",
            Ldc_I4_3 => "ldc.i4.3",
            Ldc_I4_4 => "ldc.i4.4",
            Ldc_I4_5 => "ldc.i4.5",
            Ldc_I4_6 => "ldc.i4.6",
            Ldc_I4_7 => "ldc.i4.7",
            Ldc_I4_8 => "ldc.i4.8",
            Ldc_I4_S => "ldc.i4.s",
            Ldc_I4 => "ldc.i4",
            Ldc_I8 => "ldc.i8",
            Ldstr => "ldstr",
            Ldloc_0 => "ldloc.0",
            Ldloc_1 => "ldloc.1",
            Ldloc_2 => "ldloc.2",
            Ldloc_3 => "ldloc.3",
            Ldloc_S => "ldloc.s",
            Ldloc => "ldloc",
            Stloc_0 => "stloc.0",
            Stloc_1 => "stloc.1",
            Stloc_2 => "stloc.2",
            Stloc_3 => "stloc.3",
            Stloc_S => "stloc.s",
            Stloc => "stloc",
            Ldloca_S => "ldloca.s",
            Ldloca => "ldloca",
            Ldarg_0 => "ldarg.0",
            Ldarg_1 => "ldarg.1",
            Ldarg_2 => "ldarg.2",
            Ldarg_3 => "ldarg.3",
            Ldarg_S => "ldarg.s",
            Ldarg => "ldarg",
            Ldfld => "ldfld",
            Stfld => "stfld",
            Ldsfld => "ldsfld",
            Stsfld => "stsfld",
            Call => "call",
            Callvirt => "callvirt",
            Newobj => "newobj",
            Br_S => "br.s",
            Br => "br",
            Brtrue_S => "brtrue.s",
            Brtrue => "brtrue",
            Brfalse_S => "brfalse.s",
            Brfalse => "brfalse",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for OperandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandShape::None => "no operand",
            OperandShape::Int => "integer constant",
            OperandShape::Str => "string literal",
            OperandShape::Field => "field reference",
            OperandShape::Method => "method reference",
            OperandShape::Local => "local index",
            OperandShape::Target => "branch target",
        };
        f.write_str(name)
    }
}
