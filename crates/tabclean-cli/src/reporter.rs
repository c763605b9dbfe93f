//! Colored console output for a cleaning run.

use std::path::Path;

use colored::Colorize;
use tabclean::{CleanObserver, ReorderOutcome, SourceMetadata};

/// Prints each pipeline step as it happens.
pub struct ConsoleReporter {
    column: String,
}

impl ConsoleReporter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl CleanObserver for ConsoleReporter {
    fn on_loaded(&mut self, source: &SourceMetadata) {
        println!(
            "{} {} ({})",
            "Loaded".cyan().bold(),
            source.path.display().to_string().white(),
            source.format
        );
        println!(
            "Original number of rows: {}",
            source.row_count.to_string().white().bold()
        );
    }

    fn on_filtered(&mut self, original_rows: usize, cleaned_rows: usize) {
        println!(
            "Number of rows after cleaning: {} ({} dropped)",
            cleaned_rows.to_string().white().bold(),
            (original_rows - cleaned_rows).to_string().yellow()
        );
    }

    fn on_reordered(&mut self, columns: &[String], outcome: ReorderOutcome) {
        if outcome == ReorderOutcome::ColumnNotFound {
            println!(
                "{} Column '{}' not found, column order unchanged.",
                "Warning:".yellow().bold(),
                self.column
            );
        }

        println!();
        println!("{}", "New column order:".yellow().bold());
        for (i, name) in columns.iter().enumerate() {
            if *name == self.column {
                println!("  {:>3}  {}", i + 1, name.green().bold());
            } else {
                println!("  {:>3}  {}", i + 1, name);
            }
        }
    }

    fn on_saved(&mut self, path: &Path) {
        println!();
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }
}
