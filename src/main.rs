//! # hmsa
//!
//! Command-line tool for HMSA microanalysis documents.
//!
//! ## Usage
//!
//! ```bash
//! # Write a demonstration document (demo.xml + demo.hmsa)
//! hmsa demo demo.xml
//!
//! # Inspect it
//! hmsa info demo.xml
//! hmsa info demo.hmsa --json
//!
//! # Check the file pair
//! hmsa validate demo.xml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
