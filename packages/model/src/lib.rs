//! # Scribe Model
//!
//! Document model for the Scribe rich-text editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditorSession                               │
//! │  - editor key + key generator               │
//! │  - internal clipboard (last copy/cut)       │
//! │  - edit / paste mode gate                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ EditorState: content + selection + history  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ ContentState: ordered blocks + entity map   │
//! │  - replace_with_fragment                    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Content is immutable**: every edit produces a new `ContentState`
//! 2. **One commit, one history entry**: `EditorState::push` records exactly one undo step
//! 3. **Character-level metadata**: every character carries its own style set and entity
//! 4. **Offsets are character offsets**, never byte offsets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scribe_model::{ContentState, EditorSession, Fragment};
//!
//! let content = ContentState::from_text("Hello world", &mut keys);
//! let mut session = EditorSession::new("main-editor", content);
//!
//! // Replace the current selection with a fragment and record it for undo
//! session.insert_fragment(&fragment)?;
//!
//! session.undo()?;
//! ```

mod block;
mod content;
mod editor_state;
mod entity;
mod errors;
mod fragment;
mod history;
mod keys;
mod selection;
mod session;

pub use block::{Block, BlockKey, BlockType, CharacterMetadata, InlineStyle, Segment, StyleRun};
pub use content::ContentState;
pub use editor_state::{ChangeType, EditorState};
pub use entity::{Entity, EntityKey, EntityMap, Mutability};
pub use errors::EditorError;
pub use fragment::Fragment;
pub use history::{HistoryEntry, UndoStack};
pub use keys::{get_editor_key, KeyGenerator};
pub use selection::SelectionState;
pub use session::{EditorMode, EditorSession};
