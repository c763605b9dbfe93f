//! Reorder command - move a column to the end without dropping rows.

use tabclean::TableCleaner;

use crate::cli::TableArgs;

pub fn run(table: TableArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = table.into_config();
    let mut observer = super::observer(json, &config.column);

    let report = TableCleaner::new(config).reorder_file_with(observer.as_mut())?;

    if json {
        super::print_json(&report)?;
    }

    Ok(())
}
