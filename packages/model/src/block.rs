//! # Blocks
//!
//! A block is one paragraph-equivalent unit of the document. Its text is
//! paired with a per-character metadata list: `characters[i]` describes the
//! i-th `char` of `text`.

use crate::{EditorError, EntityKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of inline style names (e.g. `BOLD`, `ITALIC`)
pub type InlineStyle = BTreeSet<String>;

/// Unique key of a block within a document or fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
    Atomic,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::Paragraph => "paragraph",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
            BlockType::Atomic => "atomic",
        }
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, BlockType::UnorderedListItem | BlockType::OrderedListItem)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style and entity attached to a single character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CharacterMetadata {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub style: InlineStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: InlineStyle, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }

    /// Add a style name
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style.insert(style.into());
        self
    }

    pub fn with_entity(mut self, entity: EntityKey) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.style.contains(style)
    }
}

/// Maximal run of characters sharing identical metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRun<'a> {
    pub start: usize,
    pub end: usize,
    pub metadata: &'a CharacterMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub key: BlockKey,

    #[serde(rename = "type", default)]
    pub block_type: BlockType,

    #[serde(default)]
    pub text: String,

    /// One entry per `char` of `text`; may be omitted in serialized form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<CharacterMetadata>,

    #[serde(default)]
    pub depth: u8,
}

impl Block {
    /// Create a block whose characters carry no style or entity
    pub fn new(key: BlockKey, block_type: BlockType, text: impl Into<String>) -> Self {
        Self::stamped(key, block_type, text, CharacterMetadata::default())
    }

    /// Create a block whose characters all carry `metadata`
    pub fn stamped(
        key: BlockKey,
        block_type: BlockType,
        text: impl Into<String>,
        metadata: CharacterMetadata,
    ) -> Self {
        let text = text.into();
        let characters = vec![metadata; text.chars().count()];
        Self {
            key,
            block_type,
            text,
            characters,
            depth: 0,
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn character_at(&self, offset: usize) -> Option<&CharacterMetadata> {
        self.characters.get(offset)
    }

    pub fn style_at(&self, offset: usize) -> Option<&InlineStyle> {
        self.characters.get(offset).map(|c| &c.style)
    }

    pub fn entity_at(&self, offset: usize) -> Option<&EntityKey> {
        self.characters.get(offset).and_then(|c| c.entity.as_ref())
    }

    /// Fill in missing character metadata and check the text/metadata pairing
    pub fn normalized(mut self) -> Result<Self, EditorError> {
        let len = self.len();
        if self.characters.is_empty() && len > 0 {
            self.characters = vec![CharacterMetadata::default(); len];
        }
        if self.characters.len() != len {
            return Err(EditorError::CharacterCountMismatch {
                key: self.key,
                characters: self.characters.len(),
                len,
            });
        }
        Ok(self)
    }

    /// Split text and metadata at a character offset
    pub fn split_at(&self, offset: usize) -> Result<(Segment, Segment), EditorError> {
        let len = self.len();
        if offset > len {
            return Err(EditorError::OffsetOutOfRange {
                key: self.key.clone(),
                offset,
                len,
            });
        }

        let byte = self
            .text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        let (head, tail) = self.text.split_at(byte);
        let split = offset.min(self.characters.len());

        Ok((
            Segment {
                text: head.to_string(),
                characters: self.characters[..split].to_vec(),
            },
            Segment {
                text: tail.to_string(),
                characters: self.characters[split..].to_vec(),
            },
        ))
    }

    /// Maximal runs of identical character metadata
    pub fn style_runs(&self) -> Vec<StyleRun<'_>> {
        let mut runs: Vec<StyleRun<'_>> = Vec::new();

        for (i, meta) in self.characters.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.metadata == meta => run.end = i + 1,
                _ => runs.push(StyleRun {
                    start: i,
                    end: i + 1,
                    metadata: meta,
                }),
            }
        }

        runs
    }
}

/// Text with its character metadata, detached from any block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    pub text: String,
    pub characters: Vec<CharacterMetadata>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn append(&mut self, text: &str, characters: &[CharacterMetadata]) {
        self.text.push_str(text);
        self.characters.extend_from_slice(characters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> CharacterMetadata {
        CharacterMetadata::default().with_style("BOLD")
    }

    #[test]
    fn test_stamped_block_has_one_entry_per_char() {
        let block = Block::stamped(BlockKey::new("a"), BlockType::Unstyled, "héllo", bold());
        assert_eq!(block.len(), 5);
        assert_eq!(block.characters.len(), 5);
        assert!(block.characters.iter().all(|c| c.has_style("BOLD")));
    }

    #[test]
    fn test_split_at_uses_char_offsets() {
        let block = Block::new(BlockKey::new("a"), BlockType::Unstyled, "añb");
        let (head, tail) = block.split_at(2).unwrap();
        assert_eq!(head.text, "añ");
        assert_eq!(tail.text, "b");
        assert_eq!(head.len(), 2);
        assert_eq!(tail.len(), 1);
    }

    #[test]
    fn test_split_past_end_fails() {
        let block = Block::new(BlockKey::new("a"), BlockType::Unstyled, "ab");
        assert!(matches!(
            block.split_at(3),
            Err(EditorError::OffsetOutOfRange { offset: 3, len: 2, .. })
        ));
    }

    #[test]
    fn test_style_runs() {
        let mut block = Block::new(BlockKey::new("a"), BlockType::Unstyled, "abcd");
        block.characters[1] = bold();
        block.characters[2] = bold();

        let runs = block.style_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[1].start, runs[1].end), (1, 3));
        assert!(runs[1].metadata.has_style("BOLD"));
    }

    #[test]
    fn test_normalized_fills_missing_metadata() {
        let block = Block {
            key: BlockKey::new("a"),
            block_type: BlockType::Unstyled,
            text: "abc".to_string(),
            characters: vec![],
            depth: 0,
        };
        assert_eq!(block.normalized().unwrap().characters.len(), 3);
    }

    #[test]
    fn test_normalized_rejects_mismatch() {
        let block = Block {
            key: BlockKey::new("a"),
            block_type: BlockType::Unstyled,
            text: "abc".to_string(),
            characters: vec![bold()],
            depth: 0,
        };
        assert!(matches!(
            block.normalized(),
            Err(EditorError::CharacterCountMismatch { characters: 1, len: 3, .. })
        ));
    }

    #[test]
    fn test_block_type_serializes_kebab_case() {
        let json = serde_json::to_string(&BlockType::UnorderedListItem).unwrap();
        assert_eq!(json, "\"unordered-list-item\"");
    }
}
