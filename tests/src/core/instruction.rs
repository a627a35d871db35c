use cilgraft_core::result::Error;
use cilgraft_core::{Instruction, Opcode, Operand};

#[test]
fn test_operand_mismatch_rejected() {
    let result = Instruction::new(Opcode::Ldstr, Operand::Int(3));
    assert!(matches!(result, Err(Error::OperandMismatch { .. })));

    let result = Instruction::new(Opcode::Call, Operand::Str("Concat".into()));
    assert!(matches!(result, Err(Error::OperandMismatch { .. })));

    // Operand-less opcodes reject any immediate at all.
    let result = Instruction::new(Opcode::Pop, Operand::Int(0));
    assert!(matches!(result, Err(Error::OperandMismatch { .. })));
}

#[test]
fn test_compact_encoding_value_enforced() {
    // ldc.i4.3 carries exactly 3; anything else is not a valid value.
    let result = Instruction::new(Opcode::Ldc_I4_3, Operand::Int(4));
    assert!(matches!(result, Err(Error::OperandOutOfRange { value: 4, .. })));

    let ins = Instruction::new(Opcode::Ldc_I4_3, Operand::Int(3)).unwrap();
    assert_eq!(ins.operand(), &Operand::Int(3));

    let result = Instruction::new(Opcode::Ldloc_2, Operand::Local(1));
    assert!(matches!(result, Err(Error::LocalOutOfRange { index: 1, .. })));
}

#[test]
fn test_short_form_range_enforced() {
    let result = Instruction::new(Opcode::Ldc_I4_S, Operand::Int(300));
    assert!(matches!(result, Err(Error::OperandOutOfRange { .. })));

    let result = Instruction::new(Opcode::Ldloc_S, Operand::Local(300));
    assert!(matches!(result, Err(Error::LocalOutOfRange { .. })));

    // The general forms take the same values fine.
    assert!(Instruction::new(Opcode::Ldc_I4, Operand::Int(300)).is_ok());
    assert!(Instruction::new(Opcode::Ldloc, Operand::Local(300)).is_ok());
}

#[test]
fn test_smart_ctors_pick_compact_encoding() {
    assert_eq!(Instruction::ldc_i4(-1).opcode(), Opcode::Ldc_I4_M1);
    assert_eq!(Instruction::ldc_i4(2).opcode(), Opcode::Ldc_I4_2);
    assert_eq!(Instruction::ldc_i4(8).opcode(), Opcode::Ldc_I4_8);
    assert_eq!(Instruction::ldc_i4(100).opcode(), Opcode::Ldc_I4_S);
    assert_eq!(Instruction::ldc_i4(1000).opcode(), Opcode::Ldc_I4);

    assert_eq!(Instruction::ldloc(1).opcode(), Opcode::Ldloc_1);
    assert_eq!(Instruction::ldloc(9).opcode(), Opcode::Ldloc_S);
    assert_eq!(Instruction::ldloc(300).opcode(), Opcode::Ldloc);
    assert_eq!(Instruction::stloc(3).opcode(), Opcode::Stloc_3);
    assert_eq!(Instruction::ldarg(0).opcode(), Opcode::Ldarg_0);
    assert_eq!(Instruction::ldloca(2).opcode(), Opcode::Ldloca_S);
}

#[test]
fn test_branch_target_accessor() {
    assert_eq!(Instruction::br(5).branch_target(), Some(5));
    assert_eq!(Instruction::brtrue(0).branch_target(), Some(0));
    assert_eq!(Instruction::ldc_i4(5).branch_target(), None);
}

#[test]
fn test_serde_rejects_mismatched_pairing() {
    // Deserialization funnels through the same construction checks.
    let bad = r#"{"opcode":"Ldstr","operand":{"Int":3}}"#;
    assert!(serde_json::from_str::<Instruction>(bad).is_err());

    let bad = r#"{"opcode":"Ldc_I4_3","operand":{"Int":7}}"#;
    assert!(serde_json::from_str::<Instruction>(bad).is_err());

    let ins = Instruction::ldstr(".db");
    let json = serde_json::to_string(&ins).unwrap();
    let back: Instruction = serde_json::from_str(&json).unwrap();
    assert_eq!(ins, back);
}

#[test]
fn test_display_renders_mnemonics() {
    assert_eq!(Instruction::ldstr(".db").to_string(), "ldstr \".db\"");
    assert_eq!(Instruction::ldloc(1).to_string(), "ldloc.1 V_1");
    assert_eq!(Instruction::simple(Opcode::Ret).unwrap().to_string(), "ret");
}
