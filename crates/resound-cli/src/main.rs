//! resound CLI - regression runs for a sound-synthesis engine.
//!
//! This binary drives the scenario catalog against the built-in probe
//! engine: `run` compares fresh renders to reference recordings, `capture`
//! writes new baselines, `list` shows the catalog. Real engines are driven
//! through the `resound-harness` library API instead.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use resound_cli::commands;

/// resound - audio regression reporting for a synthesis engine
#[derive(Parser)]
#[command(name = "resound")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario and report drift from reference recordings
    Run {
        /// Reference-recording directory (default: tests/ref)
        ref_dir: Option<String>,

        /// Output-recording directory (default: tests/tst)
        #[arg(long)]
        out_dir: Option<String>,
    },

    /// Render every scenario into the reference directory as new baselines
    Capture {
        /// Reference-recording directory (default: tests/ref)
        ref_dir: Option<String>,
    },

    /// List the scenario catalog
    List {
        /// Output the full scripts as machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { ref_dir, out_dir } => {
            commands::run::run(ref_dir.as_deref(), out_dir.as_deref())
        }
        Commands::Capture { ref_dir } => commands::capture::run(ref_dir.as_deref()),
        Commands::List { json } => commands::list::run(json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
