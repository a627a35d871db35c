use clap::Subcommand;
use std::error::Error;

pub mod apply;
pub mod scan;
pub mod show;

use cilgraft_core::Instruction;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or writing CLI files.
#[derive(Debug, Error)]
pub enum CliError {
    /// File read/write error.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The bodies file has no entry for the requested method.
    #[error("no method body for selector '{0}'")]
    UnknownMethod(String),
}

/// A bodies file: `Type::method` mapped to its instruction list.
pub type BodyMap = HashMap<String, Vec<Instruction>>;

/// Loads a bodies file. Deserialization re-runs instruction construction,
/// so a hand-edited file with a mismatched operand fails here, not later.
pub fn load_bodies(path: &Path) -> Result<BodyMap, CliError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Loads a patches file: an array of patch specs.
pub fn load_patches(path: &Path) -> Result<Vec<cilgraft_patch::PatchSpec>, CliError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// CLI subcommands for Cilgraft.
#[derive(Subcommand)]
pub enum Cmd {
    /// Print method bodies as readable assembly-style listings.
    Show(show::ShowArgs),
    /// Test each patch's pattern against its target body.
    Scan(scan::ScanArgs),
    /// Apply patches fail-soft and write the patched bodies.
    Apply(apply::ApplyArgs),
}

/// Trait for executing CLI subcommands.
pub trait Command {
    /// Executes the subcommand.
    ///
    /// # Returns
    /// A `Result` indicating success or an error if execution fails.
    fn execute(self) -> Result<(), Box<dyn Error>>;
}

impl Command for Cmd {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Show(args) => args.execute(),
            Cmd::Scan(args) => args.execute(),
            Cmd::Apply(args) => args.execute(),
        }
    }
}
