//! User-facing page range grammar: comma-separated pages and dashed
//! spans, 1-indexed. Parsed into sorted, deduplicated 0-based indices.

/// Parse a page range string like "1,3-5" against the document's page
/// count. Page 0, malformed numbers, and out-of-bounds pages are
/// errors; an empty selection is not.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let parse_one = |text: &str| -> Result<usize, String> {
        let page: usize = text
            .trim()
            .parse()
            .map_err(|_| format!("invalid page number: '{text}'"))?;
        if page == 0 {
            return Err("page 0 is invalid (pages start at 1)".to_string());
        }
        if page > page_count {
            return Err(format!(
                "page {page} exceeds document page count ({page_count})"
            ));
        }
        Ok(page - 1) // 0-indexed from here on
    };

    let mut pages = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_one(start)?, parse_one(end)?);
                pages.extend(start..=end);
            }
            None => pages.push(parse_one(part)?),
        }
    }

    pages.sort();
    pages.dedup();
    Ok(pages)
}
