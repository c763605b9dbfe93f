//! In-memory table: ordered, uniquely named columns of row-aligned cells.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Text as read from the file.
    Value(String),
    /// No value. Written back as an empty field.
    Missing,
}

impl Cell {
    /// The cell text, or `""` when missing.
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Value(s) => s,
            Cell::Missing => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Value(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Value(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents parsed tabular data in column-major order.
///
/// Column order is significant and names are unique. Every column holds
/// exactly [`DataTable::row_count`] cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    columns: IndexMap<String, Vec<Cell>>,
    row_count: usize,
}

impl DataTable {
    /// Build a table from a header row and row-major data.
    ///
    /// Duplicate header names get a `.1`, `.2`, ... suffix. Short rows are
    /// padded with [`Cell::Missing`] and long rows are truncated to the
    /// header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers = unique_headers(headers);
        let row_count = rows.len();

        let mut columns: IndexMap<String, Vec<Cell>> = headers
            .into_iter()
            .map(|h| (h, Vec::with_capacity(row_count)))
            .collect();

        for mut row in rows {
            row.resize(columns.len(), Cell::Missing);
            for (cells, cell) in columns.values_mut().zip(row) {
                cells.push(cell);
            }
        }

        Self { columns, row_count }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in table order.
    pub fn headers(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Get a column's position by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get_index_of(name)
    }

    /// Get a column's cells by name.
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut [Cell]> {
        self.columns.get_mut(name).map(|c| c.as_mut_slice())
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.columns.get_index(col).and_then(|(_, cells)| cells.get(row))
    }

    /// Iterate rows as cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count).map(move |i| self.columns.values().map(|c| &c[i]).collect())
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    ///
    /// Returns the number of rows removed.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(usize) -> bool) -> usize {
        let mask: Vec<bool> = (0..self.row_count).map(&mut keep).collect();
        let kept = mask.iter().filter(|&&k| k).count();

        for cells in self.columns.values_mut() {
            let mut flags = mask.iter();
            cells.retain(|_| flags.next().copied().unwrap_or(false));
        }

        let removed = self.row_count - kept;
        self.row_count = kept;
        removed
    }

    /// Move a column to the last position. Returns false if it is absent.
    pub(crate) fn move_to_end(&mut self, name: &str) -> bool {
        match self.columns.shift_remove_entry(name) {
            Some((key, cells)) => {
                self.columns.insert(key, cells);
                true
            }
            None => false,
        }
    }
}

/// Make header names unique by suffixing repeats with `.N`.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", header, n);
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|&s| Cell::from(s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_new_pads_and_truncates_rows() {
        let t = table(&["a", "b"], &[&["1"], &["2", "3", "4"]]);

        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column("b").unwrap(), &[Cell::Missing, Cell::from("3")]);
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn test_duplicate_headers_are_mangled() {
        let t = table(&["id", "id", "id.1", "name"], &[]);
        assert_eq!(t.headers(), vec!["id", "id.1", "id.1.1", "name"]);
    }

    #[test]
    fn test_retain_rows_keeps_alignment() {
        let mut t = table(&["a", "b"], &[&["1", "x"], &["2", "y"], &["3", "z"]]);
        let removed = t.retain_rows(|i| i != 1);

        assert_eq!(removed, 1);
        assert_eq!(t.row_count(), 2);
        let rows: Vec<Vec<&str>> = t
            .rows()
            .map(|r| r.into_iter().map(Cell::as_str).collect())
            .collect();
        assert_eq!(rows, vec![vec!["1", "x"], vec!["3", "z"]]);
    }

    #[test]
    fn test_move_to_end() {
        let mut t = table(&["a", "b", "c"], &[&["1", "2", "3"]]);

        assert!(t.move_to_end("a"));
        assert_eq!(t.headers(), vec!["b", "c", "a"]);
        assert_eq!(t.get(0, 2), Some(&Cell::from("1")));
        assert!(!t.move_to_end("missing"));
    }

    #[test]
    fn test_cell_as_str() {
        assert_eq!(Cell::Missing.as_str(), "");
        assert_eq!(Cell::from("x").to_string(), "x");
        assert!(Cell::Missing.is_missing());
    }
}
