use super::{blueprints_ctor_body, blueprints_patch};
use cilgraft_core::{Instruction, MatchRule, MethodRef, Opcode, Pattern};
use cilgraft_patch::{Error, MethodSelector, PatchSpec, Rewriter};

#[test]
fn test_blueprints_path_rewrite() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .try_init();

    let body = blueprints_ctor_body();
    let spec = blueprints_patch();
    let patched = spec.apply_to(&body).unwrap();

    // Length accounting: 10 - 6 + 2 = 6.
    assert_eq!(
        patched.len(),
        body.len() - spec.remove_count + spec.insert.len()
    );

    let expected = vec![
        body[0].clone(),
        body[1].clone(),
        Instruction::ldstr("player.blueprints.db"),
        Instruction::call(MethodRef::new("System.String", "Concat", 2)),
        body[8].clone(),
        body[9].clone(),
    ];
    assert_eq!(patched, expected);
}

#[test]
fn test_encoding_drift_still_matches() {
    // A recompile may bump the version constant past the compact range;
    // the class rule keeps matching.
    let mut body = blueprints_ctor_body();
    body[2] = Instruction::ldc_i4(147);
    assert_eq!(body[2].opcode(), Opcode::Ldc_I4_S);

    let patched = blueprints_patch().apply_to(&body).unwrap();
    assert_eq!(patched.len(), 6);
}

#[test]
fn test_pattern_drift_leaves_body_untouched() {
    let mut body = blueprints_ctor_body();
    // An opcode the pattern does not model appears mid-window.
    body[2] = Instruction::simple(Opcode::Dup).unwrap();
    let original = body.clone();

    let spec = blueprints_patch();
    let result = spec.apply_to(&body);
    assert!(
        matches!(result, Err(Error::PatternNotFound { ref patch }) if patch == &spec.name)
    );
    // Bit-for-bit untouched.
    assert_eq!(body, original);
}

#[test]
fn test_removal_rejects_branch_target_inside_window() {
    let body = vec![
        Instruction::br(3),
        Instruction::ldc_i4(1),
        Instruction::ldc_i4(2),
        Instruction::stloc(0),
        Instruction::simple(Opcode::Ret).unwrap(),
    ];
    let spec = PatchSpec {
        name: "bad-window".into(),
        target: MethodSelector::new("T", "m"),
        pattern: Pattern::new(vec![
            MatchRule::any_int_const(),
            MatchRule::any_int_const(),
            MatchRule::is(&Instruction::stloc(0)),
        ]),
        keep_prefix: 0,
        remove_count: 3,
        insert: vec![],
    };

    let result = spec.apply_to(&body);
    assert!(matches!(
        result,
        Err(Error::UnsafeRemovalWindow {
            target: 3,
            start: 1,
            end: 4
        })
    ));
}

#[test]
fn test_removal_retargets_downstream_branches() {
    // The branch at index 1 jumps over the removable pair to the ret.
    let body = vec![
        Instruction::simple(Opcode::Nop).unwrap(),
        Instruction::br(5),
        Instruction::ldc_i4(7),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::simple(Opcode::Nop).unwrap(),
        Instruction::simple(Opcode::Ret).unwrap(),
    ];
    let pattern = Pattern::new(vec![
        MatchRule::any_int_const(),
        MatchRule::opcode(Opcode::Pop),
    ]);

    let mut rewriter = Rewriter::locate(&body, &pattern).unwrap();
    assert_eq!(rewriter.window().start, 2);
    rewriter.remove(2).unwrap();
    let patched = rewriter.into_sequence();

    assert_eq!(patched.len(), 4);
    assert_eq!(patched[1].branch_target(), Some(3));
    assert_eq!(patched[3].opcode(), Opcode::Ret);
}

#[test]
fn test_insert_shifts_downstream_targets() {
    let body = vec![
        Instruction::simple(Opcode::Nop).unwrap(),
        Instruction::ldc_i4(1),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::br(4),
        Instruction::simple(Opcode::Ret).unwrap(),
    ];
    let pattern = Pattern::new(vec![
        MatchRule::any_int_const(),
        MatchRule::opcode(Opcode::Pop),
    ]);

    let mut rewriter = Rewriter::locate(&body, &pattern).unwrap();
    rewriter.remove(2).unwrap();
    rewriter.insert(&[
        Instruction::ldstr("x"),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::simple(Opcode::Nop).unwrap(),
    ]);
    let patched = rewriter.into_sequence();

    assert_eq!(patched.len(), 6);
    // br tracked the ret through both edits: 4 -> 2 after removal, -> 5
    // after the three-instruction insert.
    assert_eq!(patched[4].branch_target(), Some(5));
    assert_eq!(patched[5].opcode(), Opcode::Ret);
}

#[test]
fn test_window_exhausted_on_overrun() {
    let body = blueprints_ctor_body();
    let mut spec = blueprints_patch();
    spec.keep_prefix = 8;
    spec.remove_count = 6;

    let result = spec.apply_to(&body);
    assert!(matches!(
        result,
        Err(Error::WindowExhausted {
            requested: 6,
            available: 2
        })
    ));
}

#[test]
fn test_empty_pattern_is_rejected() {
    let body = blueprints_ctor_body();
    let mut spec = blueprints_patch();
    spec.pattern = Pattern::new(vec![]);

    assert!(matches!(
        spec.apply_to(&body),
        Err(Error::EmptyPattern { .. })
    ));
}

#[test]
fn test_patch_spec_serializes_round_trip() {
    let spec = blueprints_patch();
    let json = serde_json::to_string_pretty(&spec).unwrap();
    let back: PatchSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(spec, back);
}
