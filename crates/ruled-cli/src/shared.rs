//! Input loading shared by the subcommands.
//!
//! Exit-code policy: configuration mistakes (bad page range, malformed
//! frame map) exit 2, I/O and input-data failures exit 1.

use std::path::Path;

use ruled::{Document, ExtractConfig, ExtractError, frames_from_json, read_document};

use crate::page_range::parse_page_range;

fn input_error(err: &ExtractError) -> i32 {
    eprintln!("error: {err}");
    1
}

/// Load the page dump and build the validated configuration, filtering
/// the document down to the selected pages.
pub fn load(
    file: &Path,
    pages: Option<&str>,
    frames: Option<&Path>,
) -> Result<(Document, ExtractConfig), i32> {
    let mut document = read_document(file).map_err(|e| input_error(&e))?;

    if let Some(range) = pages {
        let selected = parse_page_range(range, document.pages.len()).map_err(|msg| {
            eprintln!("error: {msg}");
            2
        })?;
        document.pages.retain(|p| selected.contains(&p.index));
    }

    let frame_map = match frames {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                eprintln!("error: {e}");
                1
            })?;
            frames_from_json(&text).map_err(|e| {
                eprintln!("error: {e}");
                2
            })?
        }
        None => Default::default(),
    };

    let config = ExtractConfig::new(frame_map, None).map_err(|e| {
        eprintln!("error: {e}");
        2
    })?;

    Ok((document, config))
}
