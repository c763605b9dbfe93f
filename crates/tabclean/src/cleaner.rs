//! The cleaning pipeline: load, normalize, filter, reorder, write.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::output::{TableWriter, WriterConfig};
use crate::table::DataTable;
use crate::transform::{ReorderOutcome, drop_missing, move_column_to_end, normalize_column};

/// Configuration for one cleaning run.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Table to read.
    pub input: PathBuf,
    /// Where to write the cleaned table.
    pub output: PathBuf,
    /// The designated column.
    pub column: String,
    /// Extra tokens treated as missing in the designated column.
    pub na_values: Vec<String>,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Writer configuration.
    pub writer: WriterConfig,
}

impl CleanerConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            column: column.into(),
            na_values: Vec::new(),
            parser: ParserConfig::default(),
            writer: WriterConfig::default(),
        }
    }

    /// Treat these tokens as missing in addition to empty text.
    pub fn with_na_values(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.na_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// Result of a cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    /// Metadata about the input file.
    pub source: SourceMetadata,
    /// The designated column.
    pub column: String,
    /// Rows before filtering.
    pub original_rows: usize,
    /// Rows after filtering.
    pub cleaned_rows: usize,
    /// Rows removed because the designated column was empty.
    pub rows_dropped: usize,
    /// Final column order.
    pub columns: Vec<String>,
    /// What the reorder step did.
    pub reorder: ReorderOutcome,
    /// Where the result was written.
    pub output: PathBuf,
}

/// Receives progress as a run goes through its steps.
///
/// All methods default to doing nothing.
pub trait CleanObserver {
    /// The input was loaded and the designated column normalized;
    /// `source.row_count` is the pre-filter count.
    fn on_loaded(&mut self, _source: &SourceMetadata) {}

    /// Rows with a missing designated value were removed.
    fn on_filtered(&mut self, _original_rows: usize, _cleaned_rows: usize) {}

    /// The designated column was moved; `columns` is the final order.
    fn on_reordered(&mut self, _columns: &[String], _outcome: ReorderOutcome) {}

    /// The output file was written.
    fn on_saved(&mut self, _path: &Path) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CleanObserver for NoopObserver {}

/// Runs the cleaning pipeline for one table.
pub struct TableCleaner {
    config: CleanerConfig,
    parser: Parser,
    writer: TableWriter,
}

impl TableCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let writer = TableWriter::with_config(config.writer.clone());
        Self {
            config,
            parser,
            writer,
        }
    }

    /// Drop rows with an empty designated column, move it last and write
    /// the result.
    ///
    /// Fails without writing anything if the input cannot be read or the
    /// designated column does not exist.
    pub fn clean_and_reorder(&self) -> Result<CleanReport> {
        self.clean_and_reorder_with(&mut NoopObserver)
    }

    /// Like [`TableCleaner::clean_and_reorder`], reporting each step to `observer`.
    ///
    /// The pre-filter row count is reported only once the designated column
    /// has been normalized, so a missing column produces no progress events.
    pub fn clean_and_reorder_with(
        &self,
        observer: &mut dyn CleanObserver,
    ) -> Result<CleanReport> {
        let column = self.config.column.as_str();

        let (mut table, source) = self.load()?;
        let original_rows = table.row_count();

        normalize_column(&mut table, column, &self.config.na_values)?;
        observer.on_loaded(&source);

        let rows_dropped = drop_missing(&mut table, column)?;
        let cleaned_rows = table.row_count();
        info!(original_rows, cleaned_rows, "filtered rows");
        observer.on_filtered(original_rows, cleaned_rows);

        let reorder = self.reorder(&mut table, observer);
        self.save(&table, observer)?;

        Ok(CleanReport {
            source,
            column: column.to_string(),
            original_rows,
            cleaned_rows,
            rows_dropped,
            columns: table.headers(),
            reorder,
            output: self.config.output.clone(),
        })
    }

    /// Only move the designated column last and write the result.
    ///
    /// An absent column is not an error here: the table is written with
    /// its original column order.
    pub fn reorder_file_with(&self, observer: &mut dyn CleanObserver) -> Result<CleanReport> {
        let (mut table, source) = self.load()?;
        let rows = table.row_count();
        observer.on_loaded(&source);

        let reorder = self.reorder(&mut table, observer);
        self.save(&table, observer)?;

        Ok(CleanReport {
            source,
            column: self.config.column.clone(),
            original_rows: rows,
            cleaned_rows: rows,
            rows_dropped: 0,
            columns: table.headers(),
            reorder,
            output: self.config.output.clone(),
        })
    }

    /// Normalize the designated column and drop rows where it is missing.
    ///
    /// Returns the number of rows removed.
    pub fn clean(&self, table: &mut DataTable) -> Result<usize> {
        let column = self.config.column.as_str();
        normalize_column(table, column, &self.config.na_values)?;
        drop_missing(table, column)
    }

    fn load(&self) -> Result<(DataTable, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(&self.config.input)?;
        info!(
            path = %source.path.display(),
            rows = source.row_count,
            columns = source.column_count,
            "loaded table"
        );
        Ok((table, source))
    }

    fn reorder(&self, table: &mut DataTable, observer: &mut dyn CleanObserver) -> ReorderOutcome {
        let outcome = move_column_to_end(table, &self.config.column);
        let columns = table.headers();
        info!(?columns, ?outcome, "reordered columns");
        observer.on_reordered(&columns, outcome);
        outcome
    }

    fn save(&self, table: &DataTable, observer: &mut dyn CleanObserver) -> Result<()> {
        let path = self.config.output.as_path();
        self.writer.write_file(table, path)?;
        info!(path = %path.display(), "saved cleaned table");
        observer.on_saved(path);
        Ok(())
    }
}
