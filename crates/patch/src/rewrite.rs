//! The rewrite engine: advance, remove, insert over one matched window.
//!
//! A [`Rewriter`] owns a private working copy of the method body. The caller's
//! sequence is never aliased, so a rewrite that fails at any step leaves the
//! original untouched; there is no "patched half the method" state.
//!
//! Stack-effect equivalence between removed and inserted code is an authoring
//! contract. The engine checks what it can check structurally (branch targets
//! inside the removal region) and re-indexes downstream branch targets after
//! every edit, but it does not prove that the replacement leaves the operand
//! stack in the shape the rest of the method was compiled against.

use crate::{Error, Result};
use cilgraft_core::{Instruction, MatchWindow, Pattern, scan};
use tracing::debug;

/// Cursor over a working copy of a method body, scoped to one matched window.
///
/// Steps run in order: locate, advance past the kept prefix, remove, insert.
/// Each step keeps branch targets elsewhere in the body consistent with the
/// shifted indices.
#[derive(Debug)]
pub struct Rewriter {
    work: Vec<Instruction>,
    window: MatchWindow,
    cursor: usize,
}

impl Rewriter {
    /// Scans `body` from offset 0 and takes a working copy on the first
    /// match. `None` means the pattern is absent; the caller still holds the
    /// original body, unchanged.
    pub fn locate(body: &[Instruction], pattern: &Pattern) -> Option<Self> {
        let window = scan(body, pattern, 0)?;
        Some(Self {
            work: body.to_vec(),
            window,
            cursor: window.start,
        })
    }

    /// The matched window in the working copy's current indexing.
    pub fn window(&self) -> MatchWindow {
        self.window
    }

    /// Current cursor position in the working copy.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Skips `count` instructions from the cursor; they remain in the output
    /// untouched.
    pub fn advance(&mut self, count: usize) -> Result<()> {
        let available = self.window.end() - self.cursor;
        if count > available {
            return Err(Error::WindowExhausted {
                requested: count,
                available,
            });
        }
        self.cursor += count;
        Ok(())
    }

    /// Deletes exactly `count` instructions at the cursor.
    ///
    /// Fails with [`Error::UnsafeRemovalWindow`] if any surviving branch
    /// targets an instruction inside the removal region, leaving the working
    /// copy unmodified. Surviving branch targets beyond the region shift down
    /// by `count`.
    pub fn remove(&mut self, count: usize) -> Result<()> {
        let available = self.window.end() - self.cursor;
        if count > available {
            return Err(Error::WindowExhausted {
                requested: count,
                available,
            });
        }
        if count == 0 {
            return Ok(());
        }

        let start = self.cursor;
        let end = self.cursor + count;

        // Check before touching anything: a branch that survives the removal
        // must not target an instruction that will no longer exist.
        for (index, instruction) in self.work.iter().enumerate() {
            if (start..end).contains(&index) {
                continue;
            }
            if let Some(target) = instruction.branch_target()
                && (start..end).contains(&target)
            {
                return Err(Error::UnsafeRemovalWindow { target, start, end });
            }
        }

        self.work.drain(start..end);
        self.window.length -= count;

        for instruction in &mut self.work {
            if let Some(target) = instruction.branch_target()
                && target >= end
            {
                instruction.retarget(target - count);
            }
        }
        debug!("removed {} instruction(s) at {}", count, start);
        Ok(())
    }

    /// Splices `replacement` in at the cursor and advances just past it.
    ///
    /// Branch targets at or beyond the cursor shift up by the insertion
    /// length before the splice, so pre-existing control flow keeps pointing
    /// at the same instructions.
    pub fn insert(&mut self, replacement: &[Instruction]) {
        if replacement.is_empty() {
            return;
        }
        let at = self.cursor;
        let added = replacement.len();

        for instruction in &mut self.work {
            if let Some(target) = instruction.branch_target()
                && target >= at
            {
                instruction.retarget(target + added);
            }
        }

        self.work.splice(at..at, replacement.iter().cloned());
        self.window.length += added;
        self.cursor += added;
        debug!("inserted {} instruction(s) at {}", added, at);
    }

    /// Finishes the rewrite, yielding the working copy.
    pub fn into_sequence(self) -> Vec<Instruction> {
        self.work
    }
}
