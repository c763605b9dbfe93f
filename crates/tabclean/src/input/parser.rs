//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{SourceMetadata, format_name};
use crate::error::{Result, TabcleanError};
use crate::table::{Cell, DataTable};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines inspected when auto-detecting.
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    ///
    /// A file that cannot be opened yields [`TabcleanError::InputNotFound`].
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| TabcleanError::InputNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| TabcleanError::io(path, e))?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };
        debug!(path = %path.display(), delimiter = %(delimiter as char), "parsing table");

        let table = self.parse_bytes(&contents, delimiter)?;

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format_name(delimiter).to_string(),
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() {
            return Err(TabcleanError::EmptyData("No columns found".to_string()));
        }

        let expected = headers.len();
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            // Short rows are padded later; extra fields would be lost.
            if record.len() > expected {
                let line = record.position().map_or(index + 2, |p| p.line() as usize);
                return Err(TabcleanError::Parse {
                    row: index + 1,
                    message: format!(
                        "line {} has {} fields, expected {}",
                        line,
                        record.len(),
                        expected
                    ),
                });
            }
            rows.push(record.iter().map(Cell::from).collect());
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a user-supplied delimiter such as `,`, `;` or `\t`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(TabcleanError::InvalidDelimiter(format!(
                "'{}' is not a single ASCII character",
                s
            ))),
        },
    }
}

/// Pick the delimiter that splits the first lines most consistently.
///
/// Delimiters inside `quote`d sections are not counted.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let sample: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(SAMPLE_LINES)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if sample.is_empty() {
        return Err(TabcleanError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .map(|&delim| (delim, delimiter_score(&sample, delim, quote)))
        .filter(|&(_, score)| score > 0)
        .fold(None, |best: Option<(u8, usize)>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        });

    Ok(best.map_or(b',', |(delim, _)| delim))
}

/// Score a delimiter over the sample lines; 0 means it never appears in
/// the header line.
fn delimiter_score(sample: &[String], delimiter: u8, quote: u8) -> usize {
    let counts: Vec<usize> = sample
        .iter()
        .map(|line| fields_separated(line.as_bytes(), delimiter, quote))
        .collect();

    let header = counts[0];
    if header == 0 {
        return 0;
    }

    if counts.iter().all(|&c| c == header) {
        // Tab rarely shows up inside values, so it wins ties.
        return header * 1000 + if delimiter == b'\t' { 100 } else { 0 };
    }

    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let variance =
        counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

    if variance < 1.0 { header * 100 } else { header }
}

/// Count unquoted `delimiter` bytes in one line.
fn fields_separated(line: &[u8], delimiter: u8, quote: u8) -> usize {
    line.iter()
        .scan(false, |quoted, &b| {
            if b == quote {
                *quoted = !*quoted;
            }
            Some(!*quoted && b == delimiter)
        })
        .filter(|&hit| hit)
        .count()
}
