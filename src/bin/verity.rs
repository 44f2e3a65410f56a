//! Verity CLI binary.

use std::io::Write;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use verity::cli::args::*;
use verity::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = VerityArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: VerityArgs) -> anyhow::Result<()> {
    let name = match &args.command {
        Command::Train(_) => "train",
        Command::Classify(_) => "classify",
        Command::Inspect(_) => "inspect",
    };
    execute_command(args).with_context(|| format!("{name} failed"))
}
