//! # Block Render Rules
//!
//! Maps HTML element names to the block type they open. Elements that are
//! not listed are treated as inline (transparent) unless they are void.
//!
//! List containers (`ul`, `ol`) are listed by the block type their `li`
//! children receive.

use scribe_model::BlockType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockRenderRules {
    elements: BTreeMap<String, BlockType>,
}

impl Default for BlockRenderRules {
    fn default() -> Self {
        let elements = [
            ("p", BlockType::Unstyled),
            ("div", BlockType::Unstyled),
            ("h1", BlockType::HeaderOne),
            ("h2", BlockType::HeaderTwo),
            ("h3", BlockType::HeaderThree),
            ("h4", BlockType::HeaderFour),
            ("h5", BlockType::HeaderFive),
            ("h6", BlockType::HeaderSix),
            ("blockquote", BlockType::Blockquote),
            ("pre", BlockType::CodeBlock),
            ("figure", BlockType::Atomic),
            ("ul", BlockType::UnorderedListItem),
            ("ol", BlockType::OrderedListItem),
        ]
        .into_iter()
        .map(|(tag, block_type)| (tag.to_string(), block_type))
        .collect();

        Self { elements }
    }
}

impl BlockRenderRules {
    /// Rules with no elements at all (every tag is inline)
    pub fn empty() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }

    /// Add or override the mapping for `tag`
    pub fn with_element(mut self, tag: &str, block_type: BlockType) -> Self {
        self.elements.insert(tag.to_ascii_lowercase(), block_type);
        self
    }

    pub fn block_type(&self, tag: &str) -> Option<BlockType> {
        self.elements.get(tag).copied()
    }

    pub fn is_list_container(&self, tag: &str) -> bool {
        matches!(tag, "ul" | "ol") && self.elements.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = BlockRenderRules::default();
        assert_eq!(rules.block_type("h2"), Some(BlockType::HeaderTwo));
        assert_eq!(rules.block_type("pre"), Some(BlockType::CodeBlock));
        assert_eq!(rules.block_type("span"), None);
        assert!(rules.is_list_container("ol"));
        assert!(!rules.is_list_container("p"));
    }

    #[test]
    fn test_rules_from_json() {
        let rules: BlockRenderRules =
            serde_json::from_str(r#"{"p": "paragraph", "aside": "blockquote"}"#).unwrap();
        assert_eq!(rules.block_type("p"), Some(BlockType::Paragraph));
        assert_eq!(rules.block_type("aside"), Some(BlockType::Blockquote));
        assert_eq!(rules.block_type("h1"), None);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_with_element_overrides() {
        let rules = BlockRenderRules::default().with_element("DIV", BlockType::Blockquote);
        assert_eq!(rules.block_type("div"), Some(BlockType::Blockquote));
    }
}
