//! # Edit Session Management
//!
//! An EditorSession is one live editor: its current state, the internal
//! clipboard captured by the last in-editor copy/cut, and the mode gate that
//! keeps edits out while a paste is suspended.
//!
//! The internal clipboard is written only through
//! [`EditorSession::store_internal_clipboard`] (the copy/cut path). The paste
//! path reads it and may clear it.

use crate::{
    get_editor_key, ChangeType, ContentState, EditorError, EditorState, Fragment, KeyGenerator,
    SelectionState,
};

/// Whether the session accepts edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Edit,
    /// A native paste is landing in an off-screen capture target; edits are rejected
    Paste,
}

pub struct EditorSession {
    /// Stable key identifying this editor in copied markup
    editor_key: String,

    state: EditorState,

    /// Blocks captured by the last in-editor copy/cut
    internal_clipboard: Option<Fragment>,

    mode: EditorMode,
    keys: KeyGenerator,
}

impl EditorSession {
    /// Create a session named `name` editing `content`
    pub fn new(name: &str, content: ContentState) -> Self {
        let editor_key = get_editor_key(name);
        let mut keys = KeyGenerator::from_seed(editor_key.clone());
        reserve_keys(&mut keys, &content);
        Self {
            editor_key,
            state: EditorState::new(content),
            internal_clipboard: None,
            mode: EditorMode::Edit,
            keys,
        }
    }

    pub fn editor_key(&self) -> &str {
        &self.editor_key
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn keys_mut(&mut self) -> &mut KeyGenerator {
        &mut self.keys
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_suspended(&self) -> bool {
        self.mode == EditorMode::Paste
    }

    /// Suspend edits while a native paste lands elsewhere
    pub fn enter_paste_mode(&mut self) -> Result<(), EditorError> {
        if self.is_suspended() {
            return Err(EditorError::AlreadySuspended);
        }
        tracing::debug!("[Session] {} entering paste mode", self.editor_key);
        self.mode = EditorMode::Paste;
        Ok(())
    }

    pub fn exit_paste_mode(&mut self) {
        if self.is_suspended() {
            tracing::debug!("[Session] {} leaving paste mode", self.editor_key);
        }
        self.mode = EditorMode::Edit;
    }

    pub fn internal_clipboard(&self) -> Option<&Fragment> {
        self.internal_clipboard.as_ref()
    }

    /// Record the blocks of an in-editor copy/cut
    pub fn store_internal_clipboard(&mut self, fragment: Fragment) {
        self.internal_clipboard = Some(fragment);
    }

    pub fn clear_internal_clipboard(&mut self) {
        if self.internal_clipboard.take().is_some() {
            tracing::debug!("[Session] {} internal clipboard cleared", self.editor_key);
        }
    }

    /// Move the selection (rejected while suspended)
    pub fn set_selection(&mut self, selection: SelectionState) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let content = self.state.content();
        content.locate(&selection.anchor_key, selection.anchor_offset)?;
        content.locate(&selection.focus_key, selection.focus_offset)?;
        self.state = self.state.clone().with_selection(selection);
        Ok(())
    }

    /// Replace the whole editor state (rejected while suspended)
    pub fn update(&mut self, state: EditorState) -> Result<(), EditorError> {
        self.ensure_editable()?;
        reserve_keys(&mut self.keys, state.content());
        self.state = state;
        Ok(())
    }

    /// Commit new content as one history entry (rejected while suspended)
    pub fn commit(&mut self, content: ContentState, change_type: ChangeType) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.state = self.state.push(content, change_type);
        Ok(())
    }

    /// Replace the selection with `fragment` and push an `insert-fragment` entry
    pub fn insert_fragment(&mut self, fragment: &Fragment) -> Result<(), EditorError> {
        self.ensure_editable()?;
        let content = self.state.content().replace_with_fragment(
            self.state.selection(),
            fragment,
            &mut self.keys,
        )?;
        self.commit(content, ChangeType::InsertFragment)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        match self.state.undo() {
            Some(state) => {
                self.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        match self.state.redo() {
            Some(state) => {
                self.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of undoable steps
    pub fn history_len(&self) -> usize {
        self.state.history().undo_levels()
    }

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.is_suspended() {
            return Err(EditorError::Suspended);
        }
        Ok(())
    }
}

/// Documents saved by an earlier session may already hold generated keys
fn reserve_keys(keys: &mut KeyGenerator, content: &ContentState) {
    for block in content.blocks() {
        keys.reserve(block.key.as_str());
    }
    for key in content.entities().keys() {
        keys.reserve(key.as_str());
    }
}
