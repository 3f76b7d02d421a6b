use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use rowstore::{Table, repl};

/// A single-table row store backed by one file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Database file, created if it doesn't exist
    filename: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut table = match Table::open(&args.filename) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Unable to open file {}: {e}", args.filename.display());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = repl::run(&mut table, io::stdin().lock(), io::stdout().lock()) {
        error!("input/output failed: {e}");
    }

    match table.close() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error closing database: {e}");
            ExitCode::FAILURE
        }
    }
}
