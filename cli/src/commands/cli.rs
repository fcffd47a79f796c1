use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fleetrun", version, about = "Polls the task portal and runs tasks through ansible-runner")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file; falls back to $FLEETRUN_CONFIG, then ./fleetrun.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch pending tasks, run them and report results.
    Run(RunArgs),
    /// Decode a task record JSON file and print the task descriptor.
    Decode(DecodeArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Keep polling at this interval instead of exiting after one pass.
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DecodeArgs {
    pub file: PathBuf,
}
