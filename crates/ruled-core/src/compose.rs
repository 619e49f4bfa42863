//! Bottom-up text composition: glyph runs → chunks → words → lines →
//! blocks. Each level is an independent pure function so any stage can
//! be rerun from its inputs.

use crate::chunk::{ChunkClassifier, ChunkTag, TextChunk, Word};
use crate::geometry::Rect;
use crate::primitives::GlyphRun;

/// Spacing and grouping heuristics for text composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Chunk-internal gap limit, as a multiple of average char width.
    pub chunk_gap_factor: f64,
    /// Estimated inter-word space width, as a multiple of font size.
    pub space_width_factor: f64,
    /// Lower bound on the estimated space width.
    pub min_space_width: f64,
    /// Two boxes share a line when their vertical overlap exceeds this
    /// fraction of the smaller height.
    pub line_overlap_ratio: f64,
    /// Baseline drift allowed within a chunk.
    pub baseline_tolerance: f64,
    /// Allowed drift from a block's established line spacing.
    pub spacing_tolerance: f64,
    /// Allowed drift from a block's established left indent.
    pub indent_tolerance: f64,
    /// Font-size difference that signals a new block.
    pub font_size_jump: f64,
    /// First-gap limit before a block has established spacing, as a
    /// multiple of font size.
    pub max_block_gap_factor: f64,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            chunk_gap_factor: 0.5,
            space_width_factor: 0.25,
            min_space_width: 1.0,
            line_overlap_ratio: 0.5,
            baseline_tolerance: 2.0,
            spacing_tolerance: 2.0,
            indent_tolerance: 2.0,
            font_size_jump: 0.5,
            max_block_gap_factor: 1.5,
        }
    }
}

/// Estimated inter-word space width for a font size.
fn space_width(font_size: f64, opts: &ComposeOptions) -> f64 {
    (opts.space_width_factor * font_size).max(opts.min_space_width)
}

/// Split a glyph run at whitespace boundaries, dividing its rectangle
/// proportionally by character count. Whitespace stretches are kept as
/// blank pieces: they terminate words and carry the real space width.
fn explode_run(run: &GlyphRun) -> Vec<GlyphRun> {
    let total = run.text.chars().count();
    if total == 0 {
        return Vec::new();
    }
    let char_w = run.rect.width() / total as f64;

    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut buf = String::new();
    let mut blank = false;

    let flush = |pieces: &mut Vec<GlyphRun>, buf: &mut String, start: usize| {
        if buf.is_empty() {
            return;
        }
        let len = buf.chars().count();
        let left = run.rect.left + start as f64 * char_w;
        let mut piece = run.clone();
        piece.rect = Rect::new(left, run.rect.top, left + len as f64 * char_w, run.rect.bottom);
        piece.text = std::mem::take(buf);
        pieces.push(piece);
    };

    for (i, ch) in run.text.chars().enumerate() {
        if ch.is_whitespace() != blank && !buf.is_empty() {
            flush(&mut pieces, &mut buf, start);
            start = i;
        }
        if buf.is_empty() {
            start = i;
            blank = ch.is_whitespace();
        }
        buf.push(ch);
    }
    flush(&mut pieces, &mut buf, start);
    pieces
}

/// Compose maximal same-font chunks from one page's glyph runs.
///
/// Runs are taken in content-stream order, split at whitespace, and
/// grouped while the font face holds, the baseline stays level, and
/// the horizontal gap stays under `chunk_gap_factor` × the average
/// character width. Chunk text is the concatenation of its pieces;
/// word boundaries are resolved by [`split_words`].
pub fn compose_chunks(runs: &[GlyphRun], opts: &ComposeOptions) -> Vec<TextChunk> {
    let mut ordered: Vec<&GlyphRun> = runs.iter().collect();
    ordered.sort_by_key(|r| r.seq);

    let pieces: Vec<GlyphRun> = ordered.iter().flat_map(|r| explode_run(r)).collect();

    let mut chunks: Vec<Vec<GlyphRun>> = Vec::new();
    for piece in pieces {
        let start_new = match chunks.last().and_then(|c| c.last()) {
            None => true,
            Some(prev) => {
                let gap = piece.rect.left - prev.rect.right;
                let basis = prev.avg_char_width().max(piece.avg_char_width());
                let basis = if basis > 0.0 { basis } else { piece.font.size };
                !prev.font.same_face(&piece.font)
                    || (piece.rect.bottom - prev.rect.bottom).abs() > opts.baseline_tolerance
                    || gap > opts.chunk_gap_factor * basis && !piece.is_blank() && !prev.is_blank()
            }
        };
        if start_new {
            chunks.push(vec![piece]);
        } else {
            chunks.last_mut().unwrap().push(piece);
        }
    }

    chunks
        .into_iter()
        .filter_map(|members| chunk_from_pieces(&members))
        .collect()
}

fn chunk_from_pieces(pieces: &[GlyphRun]) -> Option<TextChunk> {
    let first = pieces.first()?;
    let rect = pieces
        .iter()
        .map(|p| p.rect)
        .reduce(|a, b| a.union(&b))
        .expect("non-empty pieces");
    let text: String = pieces.iter().map(|p| p.text.as_str()).collect();
    let words = pieces
        .iter()
        .map(|p| Word {
            rect: p.rect,
            text: p.text.clone(),
            font: p.font.clone(),
            tag: ChunkTag::Unknown,
            url: p.url.clone(),
            space_width: 0.0,
        })
        .collect();
    Some(TextChunk {
        rect,
        text,
        font: first.font.clone(),
        tag: ChunkTag::Unknown,
        words,
        id: 0,
    })
}

/// Split chunks into words at whitespace pieces and at gaps at least as
/// wide as the estimated inter-word space for the active font size.
/// The space width that ended each word is recorded on the word.
pub fn split_words(chunks: &[TextChunk], opts: &ComposeOptions) -> Vec<Word> {
    let mut words = Vec::new();

    for chunk in chunks {
        let mut pieces: Vec<&Word> = chunk.words.iter().collect();
        pieces.sort_by(|a, b| a.rect.left.partial_cmp(&b.rect.left).unwrap());

        let mut current: Vec<&Word> = Vec::new();
        let mut flush = |current: &mut Vec<&Word>, space: f64, out: &mut Vec<Word>| {
            if current.is_empty() {
                return;
            }
            let rect = current
                .iter()
                .map(|p| p.rect)
                .reduce(|a, b| a.union(&b))
                .expect("non-empty word pieces");
            let text: String = current.iter().map(|p| p.text.as_str()).collect();
            let url = current.iter().find_map(|p| p.url.clone());
            out.push(Word {
                rect,
                text,
                font: current[0].font.clone(),
                tag: ChunkTag::Unknown,
                url,
                space_width: space,
            });
            current.clear();
        };

        for piece in pieces {
            if piece.text.chars().all(char::is_whitespace) {
                flush(&mut current, piece.rect.width(), &mut words);
                continue;
            }
            if let Some(prev) = current.last() {
                let est = space_width(piece.font.size, opts);
                if piece.rect.left - prev.rect.right >= est {
                    flush(&mut current, est, &mut words);
                }
            }
            current.push(piece);
        }
        flush(&mut current, 0.0, &mut words);
    }

    words
}

/// Cluster words into lines by vertical overlap, then order each line
/// left-to-right. A line's rectangle is the union of its words.
pub fn compose_lines(words: &[Word], opts: &ComposeOptions) -> Vec<TextChunk> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap()
            .then_with(|| a.rect.left.partial_cmp(&b.rect.left).unwrap())
    });

    let mut lines: Vec<(Rect, Vec<Word>)> = Vec::new();
    for word in sorted {
        let joined = lines.iter_mut().find(|(rect, _)| {
            let overlap = rect.bottom.min(word.rect.bottom) - rect.top.max(word.rect.top);
            overlap > opts.line_overlap_ratio * rect.height().min(word.rect.height())
        });
        match joined {
            Some((rect, members)) => {
                *rect = rect.union(&word.rect);
                members.push(word.clone());
            }
            None => lines.push((word.rect, vec![word.clone()])),
        }
    }

    let mut result: Vec<TextChunk> = lines
        .into_iter()
        .filter_map(|(_, mut members)| {
            members.sort_by(|a, b| a.rect.left.partial_cmp(&b.rect.left).unwrap());
            TextChunk::from_words(members)
        })
        .collect();
    result.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap()
            .then_with(|| a.rect.left.partial_cmp(&b.rect.left).unwrap())
    });
    result
}

/// Group lines into paragraph blocks.
///
/// A line extends the current block while its spacing stays within
/// tolerance of the block's established spacing, its left indent stays
/// put, and its font size does not jump. Any of those changing starts
/// a new block.
pub fn compose_blocks(lines: &[TextChunk], opts: &ComposeOptions) -> Vec<TextChunk> {
    let mut blocks: Vec<TextChunk> = Vec::new();
    let mut current: Vec<TextChunk> = Vec::new();
    let mut established_spacing: Option<f64> = None;

    let mut flush = |current: &mut Vec<TextChunk>, blocks: &mut Vec<TextChunk>| {
        if let Some(block) = TextChunk::from_members(current) {
            blocks.push(block);
        }
        current.clear();
    };

    for line in lines {
        let accept = match current.last() {
            None => true,
            Some(prev) => {
                let spacing = line.rect.top - prev.rect.bottom;
                let first = &current[0];
                let size_ok = (line.font.size - first.font.size).abs() <= opts.font_size_jump;
                let indent_ok = (line.rect.left - first.rect.left).abs() <= opts.indent_tolerance;
                let spacing_ok = match established_spacing {
                    Some(est) => (spacing - est).abs() <= opts.spacing_tolerance,
                    None => spacing <= opts.max_block_gap_factor * first.font.size,
                };
                size_ok && indent_ok && spacing_ok
            }
        };

        if accept {
            if let Some(prev) = current.last() {
                if established_spacing.is_none() {
                    established_spacing = Some(line.rect.top - prev.rect.bottom);
                }
            }
            current.push(line.clone());
        } else {
            flush(&mut current, &mut blocks);
            established_spacing = None;
            current.push(line.clone());
        }
    }
    flush(&mut current, &mut blocks);
    blocks
}

/// Tag blocks (and their words) through the pluggable classifier.
pub fn classify_blocks(
    blocks: Vec<TextChunk>,
    classifier: &dyn ChunkClassifier,
) -> Vec<TextChunk> {
    blocks
        .into_iter()
        .map(|mut block| {
            let tag = classifier.classify(&block);
            block.tag = tag;
            for word in &mut block.words {
                word.tag = tag;
            }
            block
        })
        .collect()
}

/// Assign page-scoped sequential block ids, 1-based, in reading order.
pub fn assign_block_ids(mut blocks: Vec<TextChunk>) -> Vec<TextChunk> {
    blocks.sort_by(|a, b| {
        a.rect
            .top
            .partial_cmp(&b.rect.top)
            .unwrap()
            .then_with(|| a.rect.left.partial_cmp(&b.rect.left).unwrap())
    });
    for (i, block) in blocks.iter_mut().enumerate() {
        block.id = i + 1;
    }
    blocks
}

/// Document-global reading-order key for a block.
///
/// Page ids are bounded well below the multiplier, so keys cannot
/// collide across pages. The bound is asserted in debug builds.
pub fn reading_order(page_index: usize, block_id: usize) -> u64 {
    debug_assert!(block_id < 10_000, "block id overflows reading-order key");
    10_000 * (page_index as u64 + 1) + block_id as u64
}
