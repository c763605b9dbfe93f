//! Clean command - drop rows with an empty column and move it last.

use tabclean::TableCleaner;

use crate::cli::TableArgs;

pub fn run(
    table: TableArgs,
    na_values: Vec<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = table.into_config().with_na_values(na_values);
    let mut observer = super::observer(json, &config.column);

    let report = TableCleaner::new(config).clean_and_reorder_with(observer.as_mut())?;

    if json {
        super::print_json(&report)?;
    }

    Ok(())
}
