mod rewrite;

use cilgraft_core::{
    EncodingClass, FieldRef, Instruction, MatchRule, MethodRef, OperandPredicate, Pattern,
};
use cilgraft_patch::{MethodSelector, PatchSpec};

/// The filename-construction block from UserPersistance's constructor:
/// `blueprints.Open(basePath + version.ToString() + ".db", true)`.
pub(crate) fn blueprints_ctor_body() -> Vec<Instruction> {
    vec![
        Instruction::ldsfld(FieldRef::new("UserPersistance", "blueprints")),
        Instruction::ldloc(1),
        Instruction::ldc_i4(2),
        Instruction::stloc(2),
        Instruction::ldloca(2),
        Instruction::call(MethodRef::new("System.Int32", "ToString", 0)),
        Instruction::ldstr(".db"),
        Instruction::call(MethodRef::new("System.String", "Concat", 3)),
        Instruction::ldc_i4(1),
        Instruction::callvirt(MethodRef::new("Facepunch.Sqlite.Database", "Open", 2)),
    ]
}

/// Matches the whole block above. The version constant is matched by class
/// (the compiler may re-encode it on any update) and the base-path local by
/// exact slot.
pub(crate) fn blueprints_pattern() -> Pattern {
    Pattern::new(vec![
        MatchRule::is(&Instruction::ldsfld(FieldRef::new(
            "UserPersistance",
            "blueprints",
        ))),
        MatchRule::is(&Instruction::ldloc(1)),
        MatchRule::any_int_const(),
        MatchRule::is(&Instruction::stloc(2)),
        MatchRule::any_of(
            vec![EncodingClass::LocalAddr],
            OperandPredicate::LocalEquals(2),
        ),
        MatchRule::is(&Instruction::call(MethodRef::new(
            "System.Int32",
            "ToString",
            0,
        ))),
        MatchRule::is(&Instruction::ldstr(".db")),
        MatchRule::is(&Instruction::call(MethodRef::new(
            "System.String",
            "Concat",
            3,
        ))),
        MatchRule::is(&Instruction::ldc_i4(1)),
        MatchRule::is(&Instruction::callvirt(MethodRef::new(
            "Facepunch.Sqlite.Database",
            "Open",
            2,
        ))),
    ])
}

/// Keeps the field and base-path loads, drops the versioned-filename
/// construction, splices in a fixed filename and a two-string concat.
pub(crate) fn blueprints_patch() -> PatchSpec {
    PatchSpec {
        name: "change-blueprints-path".into(),
        target: MethodSelector::new("UserPersistance", ".ctor"),
        pattern: blueprints_pattern(),
        keep_prefix: 2,
        remove_count: 6,
        insert: vec![
            Instruction::ldstr("player.blueprints.db"),
            Instruction::call(MethodRef::new("System.String", "Concat", 2)),
        ],
    }
}
