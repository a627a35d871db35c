//! Leftmost-match scanning of an instruction sequence.

use crate::instruction::Instruction;
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The contiguous span in a sequence satisfying a pattern.
///
/// Produced by one scan call and consumed immediately by one rewrite; a
/// window is stale as soon as the sequence it was found in is edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWindow {
    /// Index of the first matched instruction.
    pub start: usize,
    /// Number of matched instructions.
    pub length: usize,
}

impl MatchWindow {
    /// One past the last matched instruction.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Tests whether every rule of `pattern` holds positionally at `offset`.
///
/// Returns false when the pattern is empty or would run past the end of the
/// sequence.
pub fn matches_at(sequence: &[Instruction], pattern: &Pattern, offset: usize) -> bool {
    if pattern.is_empty() || offset + pattern.len() > sequence.len() {
        return false;
    }
    pattern
        .rules()
        .iter()
        .zip(&sequence[offset..])
        .all(|(rule, instruction)| rule.matches(instruction))
}

/// Finds the first window satisfying `pattern`, trying every start offset
/// from `start_at` upward.
///
/// Returns `None` when no offset satisfies the full pattern. That is the
/// normal outcome when an upstream compiler change reshaped the method body,
/// not a fault; callers decide whether to treat it as one.
pub fn scan(sequence: &[Instruction], pattern: &Pattern, start_at: usize) -> Option<MatchWindow> {
    if pattern.is_empty() || sequence.len() < pattern.len() {
        return None;
    }
    for offset in start_at..=(sequence.len() - pattern.len()) {
        if matches_at(sequence, pattern, offset) {
            debug!(
                "pattern of {} rule(s) matched at offset {}",
                pattern.len(),
                offset
            );
            return Some(MatchWindow {
                start: offset,
                length: pattern.len(),
            });
        }
    }
    None
}

/// Finds every non-overlapping window satisfying `pattern`, left to right.
pub fn scan_all(sequence: &[Instruction], pattern: &Pattern) -> Vec<MatchWindow> {
    let mut windows = Vec::new();
    let mut cursor = 0;
    while let Some(window) = scan(sequence, pattern, cursor) {
        cursor = window.end();
        windows.push(window);
    }
    windows
}
