//! tabclean: drop incomplete rows from a delimited table and move the
//! designated column to the end.
//!
//! A run loads one table, trims the designated column, removes every row
//! where that column is empty or missing, moves the column to the last
//! position and writes the result to a new file.
//!
//! # Example
//!
//! ```no_run
//! use tabclean::{CleanerConfig, TableCleaner};
//!
//! let config = CleanerConfig::new("accidents.csv", "accidents_clean.csv", "Investigation_Type");
//! let report = TableCleaner::new(config).clean_and_reorder().unwrap();
//!
//! println!("Rows: {} -> {}", report.original_rows, report.cleaned_rows);
//! println!("Columns: {:?}", report.columns);
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod table;
pub mod transform;

mod cleaner;

pub use crate::cleaner::{CleanObserver, CleanReport, CleanerConfig, NoopObserver, TableCleaner};
pub use error::{Result, TabcleanError};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use output::{TableWriter, WriterConfig};
pub use table::{Cell, DataTable};
pub use transform::{ReorderOutcome, drop_missing, move_column_to_end, normalize_column};
