use cilgraft_cli::commands::{Cmd, Command};
use clap::Parser;

/// Cilgraft CLI
///
/// Cilgraft locates instruction patterns inside compiled method bodies and
/// surgically rewrites them: show a body as readable assembly, scan it for a
/// patch's pattern, or apply a whole set of patches fail-soft.
#[derive(Parser)]
#[command(name = "cilgraft")]
#[command(about = "Cilgraft: method-body pattern patcher")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

/// Runs the Cilgraft CLI with the provided arguments.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    cli.command.execute()
}
