//! # Plain Text Fragments
//!
//! Splits pasted text into block-sized segments and stamps every character
//! with the style and entity active at the selection.

use scribe_model::{
    Block, BlockType, CharacterMetadata, EditorState, EntityKey, Fragment, InlineStyle,
    KeyGenerator,
};
use serde::{Deserialize, Serialize};

/// Splits text into one segment per future block
pub trait TextSplitter: Send + Sync {
    fn split_text_into_blocks(&self, text: &str) -> Vec<String>;
}

/// One block per line (`\r\n`, `\r` or `\n`)
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSplitter;

impl TextSplitter for LineSplitter {
    fn split_text_into_blocks(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        lines(text).map(str::to_string).collect()
    }
}

/// One block per blank-line separated paragraph; inner line breaks are kept
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphSplitter;

impl TextSplitter for ParagraphSplitter {
    fn split_text_into_blocks(&self, text: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in lines(text) {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }

        paragraphs
    }
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').flat_map(|line| {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.split('\r')
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    #[default]
    Lines,
    Paragraphs,
}

impl SplitMode {
    pub fn splitter(&self) -> Box<dyn TextSplitter> {
        match self {
            SplitMode::Lines => Box::new(LineSplitter),
            SplitMode::Paragraphs => Box::new(ParagraphSplitter),
        }
    }
}

/// Style and entity applied to every character of pasted plain text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterStamp {
    pub style: InlineStyle,
    pub entity: Option<EntityKey>,
}

impl CharacterStamp {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            style: state.current_inline_style(),
            entity: state.entity_key_at_selection(),
        }
    }

    pub fn metadata(&self) -> CharacterMetadata {
        CharacterMetadata::new(self.style.clone(), self.entity.clone())
    }
}

/// Build a fragment with one `block_type` block per segment
///
/// Returns `None` when there are no segments.
pub fn build_text_fragment(
    segments: &[String],
    stamp: &CharacterStamp,
    block_type: BlockType,
    keys: &mut KeyGenerator,
) -> Option<Fragment> {
    if segments.is_empty() {
        return None;
    }

    let metadata = stamp.metadata();
    let blocks = segments
        .iter()
        .map(|segment| Block::stamped(keys.next_block_key(), block_type, segment.as_str(), metadata.clone()));

    Some(Fragment::from_blocks(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_splitter() {
        let splitter = LineSplitter;
        assert_eq!(
            splitter.split_text_into_blocks("a\r\nb\rc\nd"),
            vec!["a", "b", "c", "d"]
        );
        assert_eq!(splitter.split_text_into_blocks("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(splitter.split_text_into_blocks("single"), vec!["single"]);
    }

    #[test]
    fn test_whitespace_only_text_has_no_blocks() {
        assert!(LineSplitter.split_text_into_blocks("").is_empty());
        assert!(LineSplitter.split_text_into_blocks(" \n\t ").is_empty());
        assert!(ParagraphSplitter.split_text_into_blocks("\n\n").is_empty());
    }

    #[test]
    fn test_paragraph_splitter() {
        let text = "first line\nsecond line\n\n\nnext paragraph\r\n  \r\nlast";
        assert_eq!(
            ParagraphSplitter.split_text_into_blocks(text),
            vec!["first line\nsecond line", "next paragraph", "last"]
        );
    }

    #[test]
    fn test_build_text_fragment_stamps_every_character() {
        let mut keys = KeyGenerator::new("text");
        let stamp = CharacterStamp {
            style: InlineStyle::from(["BOLD".to_string()]),
            entity: Some(EntityKey::new("link")),
        };
        let segments = vec!["ab".to_string(), "".to_string(), "c".to_string()];

        let fragment = build_text_fragment(&segments, &stamp, BlockType::Blockquote, &mut keys).unwrap();
        assert_eq!(fragment.len(), 3);
        assert!(fragment.blocks().iter().all(|b| b.block_type == BlockType::Blockquote));
        for c in fragment.blocks().iter().flat_map(|b| &b.characters) {
            assert!(c.has_style("BOLD"));
            assert_eq!(c.entity, Some(EntityKey::new("link")));
        }

        assert!(build_text_fragment(&[], &stamp, BlockType::Unstyled, &mut keys).is_none());
    }

    #[test]
    fn test_split_mode_from_json() {
        let mode: SplitMode = serde_json::from_str("\"paragraphs\"").unwrap();
        assert_eq!(mode, SplitMode::Paragraphs);
        assert_eq!(mode.splitter().split_text_into_blocks("a\nb"), vec!["a\nb"]);
    }
}
