//! `ruled tables`: list detected tables with codes and dimensions.

use std::path::Path;

use ruled::extract_document;

use crate::shared;

pub fn run(file: &Path, pages: Option<&str>, frames: Option<&Path>) -> Result<(), i32> {
    let (document, config) = shared::load(file, pages, frames)?;
    let staged = extract_document(&document, &config);

    let mut count = 0;
    for page in &staged.pages {
        for table in &page.tables {
            let continued = if table.continued { "  (continued)" } else { "" };
            println!(
                "{}\t{}x{}{}",
                table.code,
                table.rows.len(),
                table.column_count(),
                continued
            );
            count += 1;
        }
    }
    if count == 0 {
        println!("No tables found.");
    }
    Ok(())
}
