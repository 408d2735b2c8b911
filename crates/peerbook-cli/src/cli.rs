use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "peerbook",
    about = "Peerbook — replicated address book with author-owned records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file; flags below override its values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Replica node id used for causal stamps.
    #[arg(long, global = true)]
    pub node_id: Option<u16>,

    /// Similarity threshold for fuzzy name search, 0.0 to 1.0.
    #[arg(long, global = true)]
    pub threshold: Option<f64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive shell over a single local replica
    Shell(ShellArgs),
    /// Scripted two-replica session showing ownership and convergence
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ShellArgs {}

#[derive(Args)]
pub struct DemoArgs {}
