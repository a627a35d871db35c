pub mod engine;
pub mod rewrite;
pub mod spec;

pub use engine::{InMemoryProvider, MethodBodyProvider, PatchOutcome, PatchReport, PatchStatus, apply_patches};
pub use rewrite::Rewriter;
pub use spec::{MethodSelector, PatchSpec};

use thiserror::Error;

/// Patch error type encompassing all rewrite and orchestration errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Core instruction construction failed.
    #[error("core operation failed: {0}")]
    Core(#[from] cilgraft_core::Error),

    /// The patch's pattern matched nowhere in the target body.
    ///
    /// Expected and recoverable: the usual cause is an upstream compiler
    /// change that reshaped the method, or a patch that already applied.
    #[error("pattern for patch '{patch}' not found in target body")]
    PatternNotFound {
        /// Name of the patch whose pattern failed to match.
        patch: String,
    },

    /// The patch's pattern is empty; there is nothing to locate.
    #[error("patch '{patch}' has an empty pattern")]
    EmptyPattern {
        /// Name of the offending patch.
        patch: String,
    },

    /// A branch elsewhere in the method targets an instruction inside the
    /// removal region.
    #[error("unsafe removal window [{start}, {end}): instruction {target} is a branch target")]
    UnsafeRemovalWindow {
        /// The targeted instruction index inside the region.
        target: usize,
        /// First index of the removal region.
        start: usize,
        /// One past the last index of the removal region.
        end: usize,
    },

    /// An advance or removal ran past the end of the matched window.
    #[error("window exhausted: requested {requested} instruction(s), {available} available")]
    WindowExhausted {
        /// How many instructions the step asked for.
        requested: usize,
        /// How many remained in the window.
        available: usize,
    },

    /// The method-body provider has no body for the selector.
    #[error("no method body for selector '{0}'")]
    MethodNotFound(String),
}

/// Patch result type
pub type Result<T> = std::result::Result<T, Error>;
