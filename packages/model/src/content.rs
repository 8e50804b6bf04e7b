//! # Content State
//!
//! Immutable document content: an ordered list of blocks plus the entity map
//! their characters reference.
//!
//! ## Fragment insertion
//!
//! ```text
//! target: [ head | selected ... | tail ]
//!
//! 1 block fragment:   [ head + f0 + tail ]                      (target key and type)
//! n block fragment:   [ head + f0 ] [ f1 ] ... [ fn + tail ]    (fresh keys after the first)
//! ```
//!
//! The first merged block keeps the target key. When the head is empty it
//! adopts the type and depth of the first pasted block.

use crate::block::Segment;
use crate::{Block, BlockKey, EditorError, Entity, EntityKey, EntityMap, Fragment, KeyGenerator, SelectionState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContentSnapshot")]
pub struct ContentState {
    blocks: Vec<Block>,

    #[serde(skip_serializing_if = "EntityMap::is_empty")]
    entities: EntityMap,

    #[serde(rename = "selectionBefore", skip_serializing_if = "Option::is_none")]
    selection_before: Option<SelectionState>,

    #[serde(rename = "selectionAfter", skip_serializing_if = "Option::is_none")]
    selection_after: Option<SelectionState>,
}

/// Serialized document shape accepted on load
#[derive(Deserialize)]
struct ContentSnapshot {
    blocks: Vec<Block>,

    #[serde(default)]
    entities: EntityMap,
}

impl TryFrom<ContentSnapshot> for ContentState {
    type Error = EditorError;

    fn try_from(snapshot: ContentSnapshot) -> Result<Self, Self::Error> {
        Ok(Self::from_blocks(snapshot.blocks)?.with_entities(snapshot.entities))
    }
}

impl ContentState {
    /// Create content from blocks (must be non-empty with unique keys)
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, EditorError> {
        if blocks.is_empty() {
            return Err(EditorError::EmptyDocument);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(blocks.len());
        for block in blocks {
            if !seen.insert(block.key.clone()) {
                return Err(EditorError::DuplicateBlockKey(block.key));
            }
            normalized.push(block.normalized()?);
        }

        Ok(Self {
            blocks: normalized,
            entities: EntityMap::new(),
            selection_before: None,
            selection_after: None,
        })
    }

    /// Create unstyled content with one block per line of `text`
    pub fn from_text(text: &str, keys: &mut KeyGenerator) -> Self {
        let blocks = text
            .split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                Block::new(keys.next_block_key(), Default::default(), line)
            })
            .collect();

        Self {
            blocks,
            entities: EntityMap::new(),
            selection_before: None,
            selection_after: None,
        }
    }

    /// Content holding a single empty block
    pub fn empty(keys: &mut KeyGenerator) -> Self {
        Self::from_text("", keys)
    }

    pub fn with_entities(mut self, entities: EntityMap) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_entity(mut self, key: EntityKey, entity: Entity) -> Self {
        self.entities.insert(key, entity);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub fn block_index(&self, key: &BlockKey) -> Option<usize> {
        self.blocks.iter().position(|b| &b.key == key)
    }

    pub fn first_block(&self) -> &Block {
        // Non-empty by construction
        &self.blocks[0]
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    pub fn entity(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn selection_before(&self) -> Option<&SelectionState> {
        self.selection_before.as_ref()
    }

    pub fn selection_after(&self) -> Option<&SelectionState> {
        self.selection_after.as_ref()
    }

    /// Block texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve a selection point to a block index, checking the offset
    pub fn locate(&self, key: &BlockKey, offset: usize) -> Result<usize, EditorError> {
        let index = self
            .block_index(key)
            .ok_or_else(|| EditorError::BlockNotFound(key.clone()))?;

        let len = self.blocks[index].len();
        if offset > len {
            return Err(EditorError::OffsetOutOfRange {
                key: key.clone(),
                offset,
                len,
            });
        }

        Ok(index)
    }

    /// Replace the selected range with the blocks of `fragment`
    ///
    /// Pasted blocks after the first receive fresh keys from `keys`, so the
    /// same fragment can be inserted any number of times. Fragment entities are
    /// merged into the entity map.
    pub fn replace_with_fragment(
        &self,
        selection: &SelectionState,
        fragment: &Fragment,
        keys: &mut KeyGenerator,
    ) -> Result<ContentState, EditorError> {
        if fragment.is_empty() {
            return Err(EditorError::EmptyFragment);
        }

        let pasted = fragment
            .blocks()
            .iter()
            .cloned()
            .map(Block::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        let anchor = (
            self.locate(&selection.anchor_key, selection.anchor_offset)?,
            selection.anchor_offset,
        );
        let focus = (
            self.locate(&selection.focus_key, selection.focus_offset)?,
            selection.focus_offset,
        );
        let ((start_index, start_offset), (end_index, end_offset)) = if focus < anchor {
            (focus, anchor)
        } else {
            (anchor, focus)
        };

        let target = &self.blocks[start_index];
        let (head, _) = target.split_at(start_offset)?;
        let (_, tail) = self.blocks[end_index].split_at(end_offset)?;

        let mut inserted = Vec::with_capacity(pasted.len());
        let selection_after;

        if let [only] = pasted.as_slice() {
            let mut merged = head;
            merged.append(&only.text, &only.characters);
            let caret = merged.len();
            merged.append(&tail.text, &tail.characters);

            inserted.push(Block {
                key: target.key.clone(),
                block_type: target.block_type,
                text: merged.text,
                characters: merged.characters,
                depth: target.depth,
            });
            selection_after = SelectionState::collapsed(target.key.clone(), caret);
        } else {
            let first = &pasted[0];
            let last = &pasted[pasted.len() - 1];

            let (block_type, depth) = if head.is_empty() {
                (first.block_type, first.depth)
            } else {
                (target.block_type, target.depth)
            };
            let mut merged = head;
            merged.append(&first.text, &first.characters);
            inserted.push(Block {
                key: target.key.clone(),
                block_type,
                text: merged.text,
                characters: merged.characters,
                depth,
            });

            for block in &pasted[1..pasted.len() - 1] {
                inserted.push(Block {
                    key: keys.next_block_key(),
                    ..block.clone()
                });
            }

            let key = keys.next_block_key();
            let mut merged = Segment {
                text: last.text.clone(),
                characters: last.characters.clone(),
            };
            let caret = merged.len();
            merged.append(&tail.text, &tail.characters);
            inserted.push(Block {
                key: key.clone(),
                block_type: last.block_type,
                text: merged.text,
                characters: merged.characters,
                depth: last.depth,
            });
            selection_after = SelectionState::collapsed(key, caret);
        }

        let mut blocks = Vec::with_capacity(self.blocks.len() + inserted.len());
        blocks.extend_from_slice(&self.blocks[..start_index]);
        blocks.extend(inserted);
        blocks.extend_from_slice(&self.blocks[end_index + 1..]);

        let mut entities = self.entities.clone();
        entities.extend(
            fragment
                .entities()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Ok(ContentState {
            blocks,
            entities,
            selection_before: Some(selection.clone()),
            selection_after: Some(selection_after),
        })
    }
}
