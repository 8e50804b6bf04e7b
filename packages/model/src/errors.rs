//! Error types for the document model

use crate::BlockKey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockKey),

    #[error("Offset {offset} out of range for block {key} (length {len})")]
    OffsetOutOfRange {
        key: BlockKey,
        offset: usize,
        len: usize,
    },

    #[error("Block {key} has {characters} character entries for {len} characters of text")]
    CharacterCountMismatch {
        key: BlockKey,
        characters: usize,
        len: usize,
    },

    #[error("Duplicate block key: {0}")]
    DuplicateBlockKey(BlockKey),

    #[error("Document must contain at least one block")]
    EmptyDocument,

    #[error("Fragment has no blocks")]
    EmptyFragment,

    #[error("Editor is suspended in paste mode")]
    Suspended,

    #[error("Editor is already suspended in paste mode")]
    AlreadySuspended,
}
