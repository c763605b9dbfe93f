//! CLI command implementations.

pub mod clean;
pub mod reorder;

use tabclean::{CleanObserver, CleanReport, NoopObserver};

use crate::reporter::ConsoleReporter;

/// Pick the observer for a run: quiet when printing JSON.
fn observer(json: bool, column: &str) -> Box<dyn CleanObserver> {
    if json {
        Box::new(NoopObserver)
    } else {
        Box::new(ConsoleReporter::new(column))
    }
}

fn print_json(report: &CleanReport) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
