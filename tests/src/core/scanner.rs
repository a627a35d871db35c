use cilgraft_core::{
    Instruction, MatchRule, Opcode, Pattern, matches_at, scan, scan_all,
};

/// nop, (ldc.i4 k, pop) x3, ret — three occurrences of the same shape.
fn repeated_body() -> Vec<Instruction> {
    vec![
        Instruction::simple(Opcode::Nop).unwrap(),
        Instruction::ldc_i4(1),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::ldc_i4(2),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::ldc_i4(3),
        Instruction::simple(Opcode::Pop).unwrap(),
        Instruction::simple(Opcode::Ret).unwrap(),
    ]
}

fn const_pop_pattern() -> Pattern {
    Pattern::new(vec![
        MatchRule::any_int_const(),
        MatchRule::opcode(Opcode::Pop),
    ])
}

#[test]
fn test_leftmost_match_wins() {
    let body = repeated_body();
    let window = scan(&body, &const_pop_pattern(), 0).unwrap();
    assert_eq!(window.start, 1);
    assert_eq!(window.length, 2);
    assert_eq!(window.end(), 3);
}

#[test]
fn test_start_offset_skips_earlier_occurrences() {
    let body = repeated_body();
    let window = scan(&body, &const_pop_pattern(), 2).unwrap();
    assert_eq!(window.start, 3);

    let window = scan(&body, &const_pop_pattern(), 6);
    assert!(window.is_none());
}

#[test]
fn test_not_found_is_none_not_an_error() {
    let body = repeated_body();
    let pattern = Pattern::new(vec![
        MatchRule::any_int_const(),
        MatchRule::opcode(Opcode::Dup),
    ]);
    assert!(scan(&body, &pattern, 0).is_none());
}

#[test]
fn test_empty_pattern_matches_nowhere() {
    let body = repeated_body();
    assert!(scan(&body, &Pattern::new(vec![]), 0).is_none());
    assert!(!matches_at(&body, &Pattern::new(vec![]), 0));
}

#[test]
fn test_pattern_longer_than_sequence() {
    let body = vec![Instruction::ldc_i4(1)];
    assert!(scan(&body, &const_pop_pattern(), 0).is_none());
    // Offset arithmetic must not underflow on short sequences.
    assert!(scan(&[], &const_pop_pattern(), 0).is_none());
}

#[test]
fn test_matches_at_is_positional() {
    let body = repeated_body();
    let pattern = const_pop_pattern();
    assert!(!matches_at(&body, &pattern, 0));
    assert!(matches_at(&body, &pattern, 1));
    assert!(!matches_at(&body, &pattern, 2));
    assert!(matches_at(&body, &pattern, 5));
    // Would run past the end.
    assert!(!matches_at(&body, &pattern, 7));
}

#[test]
fn test_scan_all_finds_non_overlapping_windows() {
    let body = repeated_body();
    let windows = scan_all(&body, &const_pop_pattern());
    let starts: Vec<usize> = windows.iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![1, 3, 5]);
}
