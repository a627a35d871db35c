//! This module dry-runs every patch's pattern against its target body and
//! prints a verdict per patch, without rewriting anything. Useful after a
//! game update to see which patches survived the recompile.

use cilgraft_core::scan;
use clap::Args;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::PathBuf;

/// Arguments for the `scan` subcommand.
#[derive(Args)]
pub struct ScanArgs {
    /// Path to a JSON bodies file mapping `Type::method` to instructions.
    #[arg(short = 'b', long = "bodies")]
    pub bodies: PathBuf,

    /// Path to a JSON file holding an array of patch specs.
    #[arg(short = 'p', long = "patches")]
    pub patches: PathBuf,
}

/// Executes the `scan` subcommand.
impl super::Command for ScanArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let bodies = super::load_bodies(&self.bodies)?;
        let patches = super::load_patches(&self.patches)?;

        let mut missing = 0usize;
        for spec in &patches {
            let selector = spec.target.to_string();
            let Some(body) = bodies.get(&selector) else {
                println!(
                    "{} {:>20}: no body for {}",
                    "MISSING".red(),
                    spec.name,
                    selector
                );
                missing += 1;
                continue;
            };
            match scan(body, &spec.pattern, 0) {
                Some(window) => println!(
                    "{} {:>20}: {} at IL_{:04}..IL_{:04}",
                    "FOUND".green(),
                    spec.name,
                    selector,
                    window.start,
                    window.end()
                ),
                None => {
                    println!("{} {:>20}: {}", "NOT FOUND".red(), spec.name, selector);
                    missing += 1;
                }
            }
        }

        println!(
            "\n{} pattern(s) located, {} missing",
            patches.len() - missing,
            missing
        );
        Ok(())
    }
}
