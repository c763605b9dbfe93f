//! Normalize, filter and reorder operations on a [`DataTable`].
//!
//! Normalizing and filtering require the designated column to exist and
//! fail with [`TabcleanError::ColumnNotFound`] otherwise. Reordering
//! tolerates an absent column and leaves the table untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TabcleanError};
use crate::table::{Cell, DataTable};

/// What [`move_column_to_end`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReorderOutcome {
    /// The column was moved from the given position.
    Moved { from: usize },
    /// The column was already last.
    AlreadyLast,
    /// No such column; the table is unchanged.
    ColumnNotFound,
}

fn column_not_found(table: &DataTable, column: &str) -> TabcleanError {
    TabcleanError::ColumnNotFound {
        column: column.to_string(),
        available: table.headers(),
    }
}

/// Trim every cell of `column` and turn empty results into [`Cell::Missing`].
///
/// Cells whose trimmed text equals one of `na_values` are treated as
/// missing too. Returns the number of missing cells after normalizing.
pub fn normalize_column(
    table: &mut DataTable,
    column: &str,
    na_values: &[String],
) -> Result<usize> {
    let cells = match table.column_mut(column) {
        Some(cells) => cells,
        None => return Err(column_not_found(table, column)),
    };

    let mut missing = 0;
    for cell in cells.iter_mut() {
        let normalized = match cell {
            Cell::Value(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || na_values.iter().any(|na| na == trimmed) {
                    Cell::Missing
                } else {
                    Cell::Value(trimmed.to_string())
                }
            }
            Cell::Missing => Cell::Missing,
        };
        if normalized.is_missing() {
            missing += 1;
        }
        *cell = normalized;
    }

    debug!(column, missing, "normalized column");
    Ok(missing)
}

/// Remove every row whose `column` cell is [`Cell::Missing`].
///
/// Row order of the remaining rows is preserved. Returns the number of
/// rows removed.
pub fn drop_missing(table: &mut DataTable, column: &str) -> Result<usize> {
    let keep: Vec<bool> = match table.column(column) {
        Some(cells) => cells.iter().map(|c| !c.is_missing()).collect(),
        None => return Err(column_not_found(table, column)),
    };

    let removed = table.retain_rows(|i| keep[i]);
    debug!(column, removed, "dropped rows with missing values");
    Ok(removed)
}

/// Move `column` to the last position.
///
/// Row count and the relative order of the other columns never change.
/// An absent column is reported with a warning and the table is returned
/// as is.
pub fn move_column_to_end(table: &mut DataTable, column: &str) -> ReorderOutcome {
    let Some(from) = table.column_index(column) else {
        warn!(column, "column not found, leaving column order unchanged");
        return ReorderOutcome::ColumnNotFound;
    };

    if from + 1 == table.column_count() {
        return ReorderOutcome::AlreadyLast;
    }

    table.move_to_end(column);
    ReorderOutcome::Moved { from }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accidents() -> DataTable {
        let rows = [
            ["1", "Accident", "2001-01-01"],
            ["2", "", "2001-01-02"],
            ["3", "Incident", "2001-01-03"],
            ["4", "  ", "2001-01-04"],
            ["5", "Accident", "2001-01-05"],
        ];
        DataTable::new(
            vec!["ID".into(), "Investigation_Type".into(), "Date".into()],
            rows.iter()
                .map(|r| r.iter().map(|&s| Cell::from(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_normalize_trims_and_marks_missing() {
        let mut table = DataTable::new(
            vec!["c".into()],
            vec![
                vec![Cell::from("  Accident ")],
                vec![Cell::from("\t")],
                vec![Cell::Missing],
                vec![Cell::from("NA")],
            ],
        );

        let missing = normalize_column(&mut table, "c", &[]).unwrap();

        assert_eq!(missing, 2);
        assert_eq!(
            table.column("c").unwrap(),
            &[
                Cell::from("Accident"),
                Cell::Missing,
                Cell::Missing,
                Cell::from("NA"),
            ]
        );
    }

    #[test]
    fn test_normalize_with_na_values() {
        let mut table = DataTable::new(
            vec!["c".into()],
            vec![vec![Cell::from(" NA ")], vec![Cell::from("na")]],
        );

        let missing = normalize_column(&mut table, "c", &["NA".to_string()]).unwrap();

        assert_eq!(missing, 1);
        assert_eq!(table.column("c").unwrap()[1], Cell::from("na"));
    }

    #[test]
    fn test_normalize_missing_column_fails() {
        let mut table = accidents();
        let err = normalize_column(&mut table, "Nope", &[]).unwrap_err();

        match err {
            TabcleanError::ColumnNotFound { column, available } => {
                assert_eq!(column, "Nope");
                assert_eq!(available, vec!["ID", "Investigation_Type", "Date"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_drop_missing_preserves_order() {
        let mut table = accidents();
        normalize_column(&mut table, "Investigation_Type", &[]).unwrap();
        let removed = drop_missing(&mut table, "Investigation_Type").unwrap();

        assert_eq!(removed, 2);
        let ids: Vec<&str> = table.column("ID").unwrap().iter().map(Cell::as_str).collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_drop_missing_without_column_fails() {
        let mut table = accidents();
        assert!(drop_missing(&mut table, "Nope").is_err());
        assert_eq!(table.row_count(), 5);
    }

    #[test]
    fn test_move_column_to_end() {
        let mut table = accidents();
        let outcome = move_column_to_end(&mut table, "Investigation_Type");

        assert_eq!(outcome, ReorderOutcome::Moved { from: 1 });
        assert_eq!(table.headers(), vec!["ID", "Date", "Investigation_Type"]);
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.get(2, 2), Some(&Cell::from("Incident")));
    }

    #[test]
    fn test_move_column_already_last_is_idempotent() {
        let mut table = accidents();
        move_column_to_end(&mut table, "Investigation_Type");
        let before = table.clone();

        assert_eq!(
            move_column_to_end(&mut table, "Investigation_Type"),
            ReorderOutcome::AlreadyLast
        );
        assert_eq!(table, before);
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_move_absent_column_logs_warning() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let mut table = accidents();
        tracing::subscriber::with_default(subscriber, || {
            move_column_to_end(&mut table, "Event_Type");
            move_column_to_end(&mut table, "Investigation_Type");
        });

        let output = logs.contents();
        assert_eq!(output.matches("WARN").count(), 1, "{output}");
        assert!(output.contains("column not found"));
        assert!(output.contains("Event_Type"));
    }

    #[test]
    fn test_move_absent_column_leaves_table_unchanged() {
        let mut table = accidents();
        let before = table.clone();

        assert_eq!(
            move_column_to_end(&mut table, "Nope"),
            ReorderOutcome::ColumnNotFound
        );
        assert_eq!(table, before);
    }
}
