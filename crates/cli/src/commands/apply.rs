//! This module applies a set of patch specs to a bodies file fail-soft,
//! writes the patched bodies out, and prints the run report as JSON.

use cilgraft_patch::{InMemoryProvider, apply_patches};
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

/// Arguments for the `apply` subcommand.
#[derive(Args)]
pub struct ApplyArgs {
    /// Path to a JSON bodies file mapping `Type::method` to instructions.
    #[arg(short = 'b', long = "bodies")]
    pub bodies: PathBuf,

    /// Path to a JSON file holding an array of patch specs.
    #[arg(short = 'p', long = "patches")]
    pub patches: PathBuf,

    /// Where to write the patched bodies. Unpatched methods are carried
    /// through unchanged.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

/// Executes the `apply` subcommand.
impl super::Command for ApplyArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let bodies = super::load_bodies(&self.bodies)?;
        let patches = super::load_patches(&self.patches)?;

        let mut provider = InMemoryProvider::from_map(bodies);
        let report = apply_patches(&mut provider, &patches);

        let patched = provider.into_map();
        std::fs::write(&self.output, serde_json::to_string_pretty(&patched)?)?;

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
