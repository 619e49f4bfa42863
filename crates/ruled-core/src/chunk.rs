//! Text hierarchy entities: words and chunk-shaped aggregates.
//!
//! Every level above the raw glyph run (chunk, line, block) is a
//! [`TextChunk`]: a rectangle that is the union of its members, the
//! joined text, and the ordered member words.

use crate::geometry::Rect;
use crate::primitives::FontSpec;

/// Closed classification for a chunk of text. `Unknown` is the
/// default; tag rules live behind [`ChunkClassifier`] so they can
/// change without touching the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkTag {
    Heading,
    Paragraph,
    ListItem,
    Caption,
    Footer,
    #[default]
    Unknown,
}

impl ChunkTag {
    /// Lowercase tag string used in serialized metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkTag::Heading => "heading",
            ChunkTag::Paragraph => "paragraph",
            ChunkTag::ListItem => "list_item",
            ChunkTag::Caption => "caption",
            ChunkTag::Footer => "footer",
            ChunkTag::Unknown => "unknown",
        }
    }
}

/// A word: the smallest text unit carried through to output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub rect: Rect,
    pub text: String,
    pub font: FontSpec,
    pub tag: ChunkTag,
    /// Hyperlink target, when the word sits inside a link annotation.
    pub url: Option<String>,
    /// The inter-word space width that ended this word. Zero for the
    /// last word of its chunk. Downstream consumers use it to extend
    /// underlines and URL regions.
    pub space_width: f64,
}

/// A chunk-shaped aggregate: chunk, line, or block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextChunk {
    pub rect: Rect,
    pub text: String,
    pub font: FontSpec,
    pub tag: ChunkTag,
    pub words: Vec<Word>,
    /// Page-scoped sequential id; assigned to blocks only, 1-based.
    pub id: usize,
}

impl TextChunk {
    /// Aggregate words into a chunk. The rectangle is the union of the
    /// members' rectangles; the text joins members with single spaces.
    pub fn from_words(words: Vec<Word>) -> Option<TextChunk> {
        let first = words.first()?;
        let rect = words
            .iter()
            .map(|w| w.rect)
            .reduce(|a, b| a.union(&b))
            .expect("non-empty words");
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(TextChunk {
            rect,
            text,
            font: first.font.clone(),
            tag: ChunkTag::Unknown,
            words,
            id: 0,
        })
    }

    /// Aggregate lower-level chunks into a higher-level one, flattening
    /// member words and joining texts with single spaces.
    pub fn from_members(members: &[TextChunk]) -> Option<TextChunk> {
        let first = members.first()?;
        let rect = members
            .iter()
            .map(|m| m.rect)
            .reduce(|a, b| a.union(&b))
            .expect("non-empty members");
        let text = members
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let words = members.iter().flat_map(|m| m.words.clone()).collect();
        Some(TextChunk {
            rect,
            text,
            font: first.font.clone(),
            tag: ChunkTag::Unknown,
            words,
            id: 0,
        })
    }
}

/// Pluggable tag policy for composed chunks.
pub trait ChunkClassifier {
    fn classify(&self, chunk: &TextChunk) -> ChunkTag;
}

/// Baseline classifier: bold text is a heading, bullet or enumerated
/// prefixes are list items, everything else stays unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ChunkClassifier for DefaultClassifier {
    fn classify(&self, chunk: &TextChunk) -> ChunkTag {
        let text = chunk.text.trim_start();
        if text.starts_with('\u{2022}') || text.starts_with("- ") {
            return ChunkTag::ListItem;
        }
        let mut chars = text.chars();
        if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
            if a.is_ascii_digit() && (b == '.' || b == ')') {
                return ChunkTag::ListItem;
            }
        }
        if chunk.font.bold && !chunk.words.is_empty() {
            return ChunkTag::Heading;
        }
        ChunkTag::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: f64, top: f64, right: f64, bottom: f64) -> Word {
        Word {
            rect: Rect::new(left, top, right, bottom),
            text: text.to_string(),
            font: FontSpec::new("Times", 10.0),
            tag: ChunkTag::Unknown,
            url: None,
            space_width: 0.0,
        }
    }

    #[test]
    fn test_from_words_unions_rect_and_joins_text() {
        let chunk = TextChunk::from_words(vec![
            word("Hello", 0.0, 0.0, 30.0, 10.0),
            word("world", 35.0, 0.0, 60.0, 10.0),
        ])
        .unwrap();
        assert_eq!(chunk.text, "Hello world");
        assert_eq!(chunk.rect, Rect::new(0.0, 0.0, 60.0, 10.0));
        assert_eq!(chunk.words.len(), 2);
    }

    #[test]
    fn test_from_words_empty() {
        assert!(TextChunk::from_words(Vec::new()).is_none());
    }

    #[test]
    fn test_from_members_flattens_words() {
        let a = TextChunk::from_words(vec![word("a", 0.0, 0.0, 5.0, 10.0)]).unwrap();
        let b = TextChunk::from_words(vec![word("b", 10.0, 0.0, 15.0, 10.0)]).unwrap();
        let line = TextChunk::from_members(&[a, b]).unwrap();
        assert_eq!(line.text, "a b");
        assert_eq!(line.words.len(), 2);
    }

    #[test]
    fn test_default_classifier() {
        let plain = TextChunk::from_words(vec![word("plain text", 0.0, 0.0, 40.0, 10.0)]).unwrap();
        assert_eq!(DefaultClassifier.classify(&plain), ChunkTag::Unknown);

        let mut bullet = TextChunk::from_words(vec![word("\u{2022} item", 0.0, 0.0, 40.0, 10.0)])
            .unwrap();
        bullet.text = "\u{2022} item".to_string();
        assert_eq!(DefaultClassifier.classify(&bullet), ChunkTag::ListItem);

        let mut heading = plain.clone();
        heading.font.bold = true;
        assert_eq!(DefaultClassifier.classify(&heading), ChunkTag::Heading);

        let mut numbered = plain.clone();
        numbered.text = "1. Scope".to_string();
        assert_eq!(DefaultClassifier.classify(&numbered), ChunkTag::ListItem);
    }

    #[test]
    fn test_tag_strings() {
        assert_eq!(ChunkTag::Unknown.as_str(), "unknown");
        assert_eq!(ChunkTag::ListItem.as_str(), "list_item");
    }
}
