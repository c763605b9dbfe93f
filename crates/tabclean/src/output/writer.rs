//! Delimited-file writer with atomic replacement of the target file.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::error::{Result, TabcleanError};
use crate::table::DataTable;

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character, used only when a field needs it.
    pub quote: u8,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Writes a [`DataTable`] with a header row and no index column.
pub struct TableWriter {
    config: WriterConfig,
}

impl TableWriter {
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Write the table to `path`.
    ///
    /// Data goes to a temporary file next to the target which is renamed
    /// into place once complete, so `path` is never left half written.
    /// Missing parent directories are created. The result keeps the mode of
    /// the file it replaces, or gets the usual umask-filtered mode.
    pub fn write_file(&self, table: &DataTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| TabcleanError::io(dir, e))?;
        }

        let mut builder = Builder::new();
        builder.prefix(".tabclean-");
        if let Some(permissions) = output_permissions(path) {
            builder.permissions(permissions);
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|e| TabcleanError::io(dir, e))?;
        self.write_to(table, tmp.as_file_mut())?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| TabcleanError::io(tmp.path(), e))?;

        tmp.persist(path)
            .map_err(|e| TabcleanError::io(path, e.error))?;

        debug!(path = %path.display(), rows = table.row_count(), "wrote table");
        Ok(())
    }

    /// Write the table to any writer.
    pub fn write_to<W: Write>(&self, table: &DataTable, writer: W) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        out.write_record(table.headers())?;
        for row in table.rows() {
            out.write_record(row.iter().map(|cell| cell.as_str()))?;
        }

        out.flush().map_err(|e| TabcleanError::io("<output>", e))?;
        Ok(())
    }

    /// Render the table to an in-memory buffer.
    pub fn to_bytes(&self, table: &DataTable) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(table, &mut buf)?;
        Ok(buf)
    }
}

/// Permissions for the temporary file that becomes `path`.
///
/// The mode is applied at creation, so the process umask still filters it.
#[cfg(unix)]
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => Some(fs::Permissions::from_mode(0o666)),
    }
}

#[cfg(not(unix))]
fn output_permissions(_path: &Path) -> Option<fs::Permissions> {
    None
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use tempfile::TempDir;

    fn sample() -> DataTable {
        DataTable::new(
            vec!["id".into(), "note".into()],
            vec![
                vec![Cell::from("1"), Cell::from("plain")],
                vec![Cell::from("2"), Cell::from("has, comma")],
                vec![Cell::from("3"), Cell::Missing],
            ],
        )
    }

    #[test]
    fn test_to_bytes_quotes_only_when_needed() {
        let bytes = TableWriter::new().to_bytes(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(text, "id,note\n1,plain\n2,\"has, comma\"\n3,\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let writer = TableWriter::with_config(WriterConfig {
            delimiter: b'\t',
            ..WriterConfig::default()
        });
        let text = String::from_utf8(writer.to_bytes(&sample()).unwrap()).unwrap();

        assert!(text.starts_with("id\tnote\n"));
        assert!(text.contains("2\thas, comma\n"));
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("out.csv");

        TableWriter::new().write_file(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,note\n"));
        // Only the output file remains, no temporary leftovers.
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_mode_matches_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let plain = dir.path().join("plain.csv");
        fs::write(&plain, "x\n").unwrap();
        let path = dir.path().join("out.csv");

        TableWriter::new().write_file(&sample(), &path).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_replacing_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out.csv");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        TableWriter::new().write_file(&sample(), &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert!(fs::read_to_string(&path).unwrap().starts_with("id,note\n"));
    }
}
