use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod info;
mod validate;

use config::Config;

/// hmsa - Hyper-dimensional Microanalysis Data Format tool
#[derive(Parser)]
#[command(name = "hmsa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file with [writer] and [reader] settings
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display header, conditions and data of an HMSA document
    Info {
        /// Either file of the pair (.xml or .hmsa)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the integrity of an HMSA file pair
    Validate {
        /// Either file of the pair (.xml or .hmsa)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write a demonstration document
    Demo {
        /// Output path; the .xml and .hmsa files share its stem
        #[arg(value_name = "OUTPUT", default_value = "demo.xml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Info { file, json } => info::run(file, json, config.reader_config()),
        Commands::Validate { file } => validate::run(file),
        Commands::Demo { output } => demo::run(output, config.writer_config()?),
    }
}
