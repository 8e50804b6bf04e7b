//! # Fragments
//!
//! An ordered, key-unique collection of blocks (plus the entities they
//! reference) that has not yet been merged into a document.

use crate::{Block, BlockKey, EntityMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fragment {
    blocks: Vec<Block>,

    #[serde(default, skip_serializing_if = "EntityMap::is_empty")]
    entities: EntityMap,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fragment from blocks in order
    ///
    /// A block whose key is already present replaces the earlier block in place.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut fragment = Self::new();
        for block in blocks {
            fragment.insert(block);
        }
        fragment
    }

    pub fn with_entities(mut self, entities: EntityMap) -> Self {
        self.entities = entities;
        self
    }

    /// Insert a block at the end, or replace the block with the same key
    pub fn insert(&mut self, block: Block) {
        match self.blocks.iter_mut().find(|b| b.key == block.key) {
            Some(existing) => *existing = block,
            None => self.blocks.push(block),
        }
    }

    pub fn get(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn keys(&self) -> impl Iterator<Item = &BlockKey> {
        self.blocks.iter().map(|b| &b.key)
    }

    pub fn first(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Block>, EntityMap) {
        (self.blocks, self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockType;

    #[test]
    fn test_fragment_preserves_order() {
        let fragment = Fragment::from_blocks(vec![
            Block::new(BlockKey::new("b"), BlockType::Unstyled, "second?"),
            Block::new(BlockKey::new("a"), BlockType::Unstyled, "first?"),
        ]);

        let keys: Vec<&str> = fragment.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let fragment = Fragment::from_blocks(vec![
            Block::new(BlockKey::new("a"), BlockType::Unstyled, "one"),
            Block::new(BlockKey::new("b"), BlockType::Unstyled, "two"),
            Block::new(BlockKey::new("a"), BlockType::Unstyled, "three"),
        ]);

        assert_eq!(fragment.len(), 2);
        assert_eq!(fragment.blocks()[0].text, "three");
        assert_eq!(fragment.get(&BlockKey::new("b")).unwrap().text, "two");
    }
}
