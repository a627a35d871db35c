//! This module prints the method bodies in a bodies file as one
//! assembly-style listing per method, sorted by selector for stable output.

use clap::Args;
use std::error::Error;
use std::path::PathBuf;

/// Arguments for the `show` subcommand.
#[derive(Args)]
pub struct ShowArgs {
    /// Path to a JSON bodies file mapping `Type::method` to instructions.
    #[arg(short = 'b', long = "bodies")]
    pub bodies: PathBuf,

    /// Only show this method (`Type::method`).
    #[arg(short = 'm', long = "method")]
    pub method: Option<String>,
}

/// Executes the `show` subcommand.
impl super::Command for ShowArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let bodies = super::load_bodies(&self.bodies)?;

        let mut selectors: Vec<&String> = bodies.keys().collect();
        selectors.sort();

        for selector in selectors {
            if let Some(only) = &self.method
                && selector != only
            {
                continue;
            }
            println!("{selector}:");
            print!("{}", cilgraft_core::render_listing(&bodies[selector]));
            println!();
        }

        if let Some(only) = &self.method
            && !bodies.contains_key(only)
        {
            return Err(Box::new(super::CliError::UnknownMethod(only.clone())));
        }
        Ok(())
    }
}
