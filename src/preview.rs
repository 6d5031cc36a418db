use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, load_dataset, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let loaded = load_dataset(&args.data, &args.keyword, args.data.header_row.unwrap_or(0))?;
    let shown = loaded.head(args.rows);
    table::print_table(&shown);
    info!(
        "Displayed {} of {} row(s) matching '{}'",
        shown.len(),
        loaded.len(),
        args.keyword
    );
    Ok(())
}
