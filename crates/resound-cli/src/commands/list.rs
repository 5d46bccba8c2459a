//! The `list` command: print the scenario catalog.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use resound_scenario::catalog;

/// Prints the catalog, one scenario per line, or the full scripts as JSON.
pub fn run(json: bool) -> Result<ExitCode> {
    let scenarios = catalog();

    if json {
        let output =
            serde_json::to_string_pretty(&scenarios).context("failed to serialize catalog")?;
        println!("{output}");
    } else {
        for scenario in &scenarios {
            println!(
                "{:<16} {:>2} events, spans {:>4} ms",
                scenario.name(),
                scenario.events().len(),
                scenario.span_ms()
            );
        }
        println!();
        println!(
            "{} {} scenarios",
            "Catalog:".green().bold(),
            scenarios.len()
        );
    }

    Ok(ExitCode::SUCCESS)
}
