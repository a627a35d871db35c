//! Declarative patch descriptions.

use crate::rewrite::Rewriter;
use crate::{Error, Result};
use cilgraft_core::{Instruction, Pattern};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifies one method body at the provider boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSelector {
    /// Declaring type name.
    pub type_name: String,
    /// Method name (constructors use their type's conventional ctor name).
    pub method: String,
}

impl MethodSelector {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.method)
    }
}

/// What to find inside one target method and how to replace it.
///
/// Constructed once at startup and applied at most once per qualifying body.
/// `keep_prefix + remove_count` must not exceed the pattern length; the
/// removal region is expected, by construction of the pattern, to fall inside
/// a straight-line region of the method. The inserted instructions must leave
/// the operand stack in the same shape the removed ones did; that part is on
/// the patch author, not checked here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchSpec {
    /// Identifying name, used in every diagnostic about this patch.
    pub name: String,
    /// Which method body to patch.
    pub target: MethodSelector,
    /// The window to locate.
    pub pattern: Pattern,
    /// How many matched instructions to keep untouched at the window start.
    #[serde(default)]
    pub keep_prefix: usize,
    /// How many instructions to delete after the kept prefix.
    pub remove_count: usize,
    /// Replacement instructions spliced in where the removal happened.
    pub insert: Vec<Instruction>,
}

impl PatchSpec {
    /// Applies this patch to a method body, returning the new body.
    ///
    /// The input is never mutated. On any failure the caller's body is
    /// exactly what it was, so a failed patch can be skipped safely.
    ///
    /// # Errors
    /// * [`Error::PatternNotFound`] when the pattern matches nowhere —
    ///   expected on encoding drift or an already-patched body.
    /// * [`Error::EmptyPattern`] when there is nothing to locate.
    /// * [`Error::WindowExhausted`] when `keep_prefix + remove_count`
    ///   overruns the matched window.
    /// * [`Error::UnsafeRemovalWindow`] when the removal region contains a
    ///   branch target.
    pub fn apply_to(&self, body: &[Instruction]) -> Result<Vec<Instruction>> {
        if self.pattern.is_empty() {
            return Err(Error::EmptyPattern {
                patch: self.name.clone(),
            });
        }
        let Some(mut rewriter) = Rewriter::locate(body, &self.pattern) else {
            return Err(Error::PatternNotFound {
                patch: self.name.clone(),
            });
        };
        debug!(
            "patch '{}' located window at {} (length {})",
            self.name,
            rewriter.window().start,
            rewriter.window().length
        );

        rewriter.advance(self.keep_prefix)?;
        rewriter.remove(self.remove_count)?;
        rewriter.insert(&self.insert);
        Ok(rewriter.into_sequence())
    }
}
