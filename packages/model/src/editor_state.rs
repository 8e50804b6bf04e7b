//! # Editor State
//!
//! Content, selection and undo history at one point in time. Edits go through
//! [`EditorState::push`], which records exactly one history entry.

use crate::{Block, BlockType, ContentState, EntityKey, InlineStyle, SelectionState, UndoStack};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change recorded with each history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    InsertFragment,
    InsertCharacters,
    RemoveRange,
    ChangeInlineStyle,
    Undo,
    Redo,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::InsertFragment => "insert-fragment",
            ChangeType::InsertCharacters => "insert-characters",
            ChangeType::RemoveRange => "remove-range",
            ChangeType::ChangeInlineStyle => "change-inline-style",
            ChangeType::Undo => "undo",
            ChangeType::Redo => "redo",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    content: ContentState,
    selection: SelectionState,

    /// Styles toggled at a collapsed caret, applied to the next insertion
    inline_style_override: Option<InlineStyle>,

    last_change_type: Option<ChangeType>,
    history: UndoStack,
}

impl EditorState {
    /// Create a state with the caret at the start of the first block
    pub fn new(content: ContentState) -> Self {
        let selection = SelectionState::collapsed(content.first_block().key.clone(), 0);
        Self {
            content,
            selection,
            inline_style_override: None,
            last_change_type: None,
            history: UndoStack::new(),
        }
    }

    pub fn content(&self) -> &ContentState {
        &self.content
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Replace the selection without recording history
    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self.inline_style_override = None;
        self
    }

    pub fn with_inline_style_override(mut self, style: Option<InlineStyle>) -> Self {
        self.inline_style_override = style;
        self
    }

    /// Commit new content as one history entry
    ///
    /// The selection moves to the content's `selection_after` when present.
    pub fn push(&self, content: ContentState, change_type: ChangeType) -> EditorState {
        let mut history = self.history.clone();
        history.record(self.content.clone(), change_type);

        let selection = content
            .selection_after()
            .cloned()
            .unwrap_or_else(|| self.selection.clone());

        tracing::debug!(
            "[EditorState] push change={} blocks={} undo_levels={}",
            change_type,
            content.blocks().len(),
            history.undo_levels()
        );

        EditorState {
            content,
            selection,
            inline_style_override: None,
            last_change_type: Some(change_type),
            history,
        }
    }

    /// Restore the previous content; `None` when there is nothing to undo
    pub fn undo(&self) -> Option<EditorState> {
        let mut history = self.history.clone();
        let restored = history.undo(self.content.clone())?;
        let selection = self
            .content
            .selection_before()
            .cloned()
            .unwrap_or_else(|| SelectionState::collapsed(restored.first_block().key.clone(), 0));

        Some(EditorState {
            content: restored,
            selection,
            inline_style_override: None,
            last_change_type: Some(ChangeType::Undo),
            history,
        })
    }

    /// Reapply undone content; `None` when there is nothing to redo
    pub fn redo(&self) -> Option<EditorState> {
        let mut history = self.history.clone();
        let restored = history.redo(self.content.clone())?;
        let selection = restored
            .selection_after()
            .cloned()
            .unwrap_or_else(|| SelectionState::collapsed(restored.first_block().key.clone(), 0));

        Some(EditorState {
            content: restored,
            selection,
            inline_style_override: None,
            last_change_type: Some(ChangeType::Redo),
            history,
        })
    }

    /// Style that newly typed or pasted characters should carry
    ///
    /// An explicit override wins. Otherwise a collapsed caret inherits from the
    /// character before it, and a range inherits from its first character.
    /// At the start of a block the nearest preceding non-empty block's last
    /// character is used.
    pub fn current_inline_style(&self) -> InlineStyle {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }

        let key = self.selection.start_key();
        let offset = self.selection.start_offset();
        let Some(index) = self.content.block_index(key) else {
            return InlineStyle::new();
        };
        let block = &self.content.blocks()[index];

        if self.selection.is_collapsed() {
            if offset > 0 {
                return style_at(block, offset - 1);
            }
            if !block.is_empty() {
                return style_at(block, 0);
            }
        } else if offset < block.len() {
            return style_at(block, offset);
        }

        self.content.blocks()[..index]
            .iter()
            .rev()
            .find(|b| !b.is_empty())
            .map(|b| style_at(b, b.len() - 1))
            .unwrap_or_default()
    }

    /// Entity that inserted characters should continue, if any
    ///
    /// Only mutable entities are continued. A caret inside an entity continues
    /// it; a caret at an entity boundary does not.
    pub fn entity_key_at_selection(&self) -> Option<EntityKey> {
        let content = &self.content;
        let key = self.selection.start_key();
        let offset = self.selection.start_offset();
        let block = content.block(key)?;

        let entity = if self.selection.is_collapsed() {
            if offset == 0 {
                return None;
            }
            let before = block.entity_at(offset - 1);
            if before != block.entity_at(offset) {
                return None;
            }
            before?
        } else {
            if offset == block.len() {
                return None;
            }
            block.entity_at(offset)?
        };

        content
            .entity(entity)
            .filter(|e| e.is_mutable())
            .map(|_| entity.clone())
    }

    /// Type of the block holding the selection start
    pub fn block_type_at_selection(&self) -> BlockType {
        self.content
            .block(self.selection.start_key())
            .map(|b| b.block_type)
            .unwrap_or_default()
    }
}

fn style_at(block: &Block, offset: usize) -> InlineStyle {
    block.style_at(offset).cloned().unwrap_or_default()
}
