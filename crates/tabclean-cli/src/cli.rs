//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use tabclean::input::parse_delimiter;
use tabclean::{CleanerConfig, ParserConfig, WriterConfig};

/// Column the tool was first written for.
const DEFAULT_COLUMN: &str = "Investigation_Type";

/// tabclean: drop rows with an empty column and move that column last
#[derive(Parser)]
#[command(name = "tabclean")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the run report as JSON instead of progress messages
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop rows where the column is empty, then move it to the end
    Clean {
        #[command(flatten)]
        table: TableArgs,

        /// Extra value treated as empty in the column (repeatable)
        #[arg(long = "na-value", value_name = "TOKEN")]
        na_values: Vec<String>,
    },

    /// Only move the column to the end, keeping every row
    Reorder {
        #[command(flatten)]
        table: TableArgs,
    },
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output path (default: <file>_cleaned.<ext> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Column to check and move
    #[arg(short, long, default_value = DEFAULT_COLUMN)]
    pub column: String,

    /// Input delimiter (default: auto-detect)
    #[arg(long, value_parser = delimiter)]
    pub input_delimiter: Option<u8>,

    /// Output delimiter
    #[arg(short, long, value_parser = delimiter, default_value = ",")]
    pub delimiter: u8,
}

impl TableArgs {
    /// Build the library configuration from the arguments.
    pub fn into_config(self) -> CleanerConfig {
        let output = self.output.unwrap_or_else(|| default_output(&self.input));

        let mut config = CleanerConfig::new(self.input, output, self.column);
        config.parser = ParserConfig {
            delimiter: self.input_delimiter,
            ..ParserConfig::default()
        };
        config.writer = WriterConfig {
            delimiter: self.delimiter,
            ..WriterConfig::default()
        };
        config
    }
}

/// `<dir>/<stem>_cleaned.<ext>`, falling back to `csv` without an extension.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    input.with_file_name(format!("{}_cleaned.{}", stem, ext))
}

fn delimiter(s: &str) -> Result<u8, String> {
    parse_delimiter(s).map_err(|e| e.to_string())
}
