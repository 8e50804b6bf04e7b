use crate::payload::FileHandle;
use scribe_model::EditorState;

/// Result of a host override hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleValue {
    /// The host dealt with the paste; no further processing
    Handled,
    #[default]
    NotHandled,
}

/// Text and markup after host formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPaste {
    pub text: String,
    pub html: Option<String>,
}

/// Host overrides, each checked before the built-in handling of its branch
///
/// All methods default to "not handled" / "unchanged".
pub trait PasteHooks: Send + Sync {
    fn handle_pasted_files(&self, _files: &[FileHandle], _state: &EditorState) -> HandleValue {
        HandleValue::NotHandled
    }

    fn handle_pasted_text(
        &self,
        _text: Option<&str>,
        _html: Option<&str>,
        _state: &EditorState,
    ) -> HandleValue {
        HandleValue::NotHandled
    }

    /// Rewrite text and markup before resolution
    ///
    /// Returning `Some` disables internal clipboard reuse for the paste.
    fn format_pasted_text(&self, _text: &str, _html: Option<&str>) -> Option<FormattedPaste> {
        None
    }
}

/// No overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PasteHooks for NoHooks {}
