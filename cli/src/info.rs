use anyhow::Result;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

use prism_core::RainbowTable;

use crate::Info;

pub fn info(inf: Info) -> Result<()> {
    let header = RainbowTable::inspect(&inf.table)?;
    let metadata = header.metadata;

    let mut display_table = Table::new();
    display_table.load_preset(UTF8_BORDERS_ONLY);
    display_table.set_header(vec!["Parameter", "Value"]);

    display_table.add_row(vec!["Hash function".to_owned(), metadata.hash_algorithm]);
    display_table.add_row(vec!["Charset".to_owned(), metadata.alphabet]);
    display_table.add_row(vec![
        "Password length".to_owned(),
        metadata.password_length.to_string(),
    ]);
    display_table.add_row(vec![
        "Chain length".to_owned(),
        metadata.chain_length.to_string(),
    ]);
    display_table.add_row(vec![
        "Reduction functions".to_owned(),
        metadata.reduction_version,
    ]);
    display_table.add_row(vec![
        "Distinct endpoints".to_owned(),
        header.endpoint_count.to_string(),
    ]);

    println!("{display_table}");

    Ok(())
}
