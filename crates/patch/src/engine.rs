//! Patch orchestration: run every spec against its target body, fail soft.

use crate::spec::{MethodSelector, PatchSpec};
use crate::{Error, Result};
use cilgraft_core::Instruction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Supplies and accepts method bodies.
///
/// The engine only consumes and produces instruction sequences; how bodies
/// are loaded, verified, or re-installed into a running process is the
/// provider's business.
pub trait MethodBodyProvider {
    /// Fetches the current body for a method.
    fn instructions(&self, selector: &MethodSelector) -> Result<Vec<Instruction>>;

    /// Replaces a method's body wholesale.
    fn install(&mut self, selector: &MethodSelector, body: Vec<Instruction>) -> Result<()>;
}

/// HashMap-backed provider, keyed by the selector's `Type::method` form.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    bodies: HashMap<String, Vec<Instruction>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from an already-loaded body map.
    pub fn from_map(bodies: HashMap<String, Vec<Instruction>>) -> Self {
        Self { bodies }
    }

    /// Registers a method body.
    pub fn insert_body(&mut self, selector: &MethodSelector, body: Vec<Instruction>) {
        self.bodies.insert(selector.to_string(), body);
    }

    /// The full body map, for writing back out.
    pub fn into_map(self) -> HashMap<String, Vec<Instruction>> {
        self.bodies
    }
}

impl MethodBodyProvider for InMemoryProvider {
    fn instructions(&self, selector: &MethodSelector) -> Result<Vec<Instruction>> {
        self.bodies
            .get(&selector.to_string())
            .cloned()
            .ok_or_else(|| Error::MethodNotFound(selector.to_string()))
    }

    fn install(&mut self, selector: &MethodSelector, body: Vec<Instruction>) -> Result<()> {
        self.bodies.insert(selector.to_string(), body);
        Ok(())
    }
}

/// How one patch ended up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchStatus {
    /// The rewrite succeeded and the new body was installed.
    Applied {
        /// Body length before the rewrite.
        len_before: usize,
        /// Body length after the rewrite.
        len_after: usize,
    },
    /// The patch was abandoned; the target body is untouched.
    Skipped {
        /// Human-readable reason, as logged.
        reason: String,
    },
}

/// Outcome of one patch attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    /// The patch's identifying name.
    pub patch: String,
    /// The targeted method, in `Type::method` form.
    pub target: String,
    /// What happened.
    pub status: PatchStatus,
}

/// Summary of a whole orchestration run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchReport {
    /// One outcome per attempted patch, in application order.
    pub outcomes: Vec<PatchOutcome>,
}

impl PatchReport {
    /// Number of patches that applied.
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, PatchStatus::Applied { .. }))
            .count()
    }

    /// Number of patches that were skipped.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Runs every patch spec against its target body.
///
/// A failed patch is logged and skipped; the remaining patches proceed and
/// the failed patch's target keeps its original body. Nothing here aborts
/// the run — per-patch failure is the expected shape of encoding drift.
pub fn apply_patches(provider: &mut dyn MethodBodyProvider, specs: &[PatchSpec]) -> PatchReport {
    let mut report = PatchReport::default();

    for spec in specs {
        let status = attempt(provider, spec);
        match &status {
            PatchStatus::Applied {
                len_before,
                len_after,
            } => {
                info!(
                    "{:>20} applied to {}: {} -> {} instruction(s)",
                    spec.name, spec.target, len_before, len_after
                );
            }
            PatchStatus::Skipped { reason } => {
                warn!("{:>20} skipped: {}", spec.name, reason);
            }
        }
        report.outcomes.push(PatchOutcome {
            patch: spec.name.clone(),
            target: spec.target.to_string(),
            status,
        });
    }
    report
}

fn attempt(provider: &mut dyn MethodBodyProvider, spec: &PatchSpec) -> PatchStatus {
    let body = match provider.instructions(&spec.target) {
        Ok(body) => body,
        Err(e) => {
            return PatchStatus::Skipped {
                reason: e.to_string(),
            };
        }
    };
    let len_before = body.len();

    match spec.apply_to(&body) {
        Ok(patched) => {
            let len_after = patched.len();
            match provider.install(&spec.target, patched) {
                Ok(()) => PatchStatus::Applied {
                    len_before,
                    len_after,
                },
                Err(e) => PatchStatus::Skipped {
                    reason: e.to_string(),
                },
            }
        }
        Err(e) => PatchStatus::Skipped {
            reason: e.to_string(),
        },
    }
}
