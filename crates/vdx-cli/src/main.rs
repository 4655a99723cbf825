//! # vdx CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Veridex dispute stack CLI.
///
/// Generates juror keys, computes vote commitments, and signs or checks
/// evidence attestations for the dispute engine.
#[derive(Parser, Debug)]
#[command(name = "vdx", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ed25519 key generation and account derivation.
    Keys(vdx_cli::keys::KeysArgs),
    /// Vote commitment computation for the commit phase.
    Commit(vdx_cli::commitment::CommitArgs),
    /// Envelope hashing and attestation signing/checking.
    Evidence(vdx_cli::evidence::EvidenceArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keys(args) => vdx_cli::keys::run(args),
        Commands::Commit(args) => vdx_cli::commitment::run(args),
        Commands::Evidence(args) => vdx_cli::evidence::run(args),
    }
}
