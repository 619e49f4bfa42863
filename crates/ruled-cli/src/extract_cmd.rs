//! `ruled extract`: run the full pipeline and write data.json.

use std::fs::File;
use std::path::Path;

use ruled::{extract_document, write_document};

use crate::shared;

pub fn run(
    file: &Path,
    pages: Option<&str>,
    frames: Option<&Path>,
    output: &Path,
    pretty: bool,
) -> Result<(), i32> {
    let (document, config) = shared::load(file, pages, frames)?;
    let staged = extract_document(&document, &config);

    std::fs::create_dir_all(output).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    let path = output.join("data.json");
    let out = File::create(&path).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    write_document(&staged, out, pretty).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    println!("wrote {}", path.display());
    Ok(())
}
