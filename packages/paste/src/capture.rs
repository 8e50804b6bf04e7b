//! # Capture Shim
//!
//! Some hosts only expose pasted markup after a real, unintercepted native
//! paste has landed in an editable element. For those the paste is deferred:
//!
//! ```text
//! on_paste ──▶ focus capture target ──▶ session enters paste mode
//!                       │
//!              native paste lands here
//!                       │
//!          (next scheduler tick)
//!                       ▼
//! resume ──▶ take markup ──▶ clear + hide ──▶ refocus editor ──▶ exit paste mode ──▶ resolve
//! ```
//!
//! While in paste mode the session rejects every edit, so the selection at
//! resumption is the selection at paste time.

use crate::context::PasteContext;
use scribe_model::SelectionState;

/// Off-screen editable element that receives the native paste
pub trait CaptureTarget: Send {
    /// Move keyboard focus into the target and make it receptive
    fn focus(&mut self);

    /// The platform's native paste landing in the target
    fn receive_native_paste(&mut self, html: &str);

    fn has_focus(&self) -> bool;

    /// Markup captured since the last `focus`
    fn take_html(&mut self) -> Option<String>;

    fn clear_and_hide(&mut self);

    fn restore_editor_focus(&mut self);
}

/// In-memory capture target
#[derive(Debug, Default)]
pub struct MemoryCaptureTarget {
    focused: bool,
    visible: bool,
    content: Option<String>,
    editor_focused: bool,
}

impl MemoryCaptureTarget {
    pub fn new() -> Self {
        Self {
            editor_focused: true,
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn editor_has_focus(&self) -> bool {
        self.editor_focused
    }
}

impl CaptureTarget for MemoryCaptureTarget {
    fn focus(&mut self) {
        self.content = None;
        self.visible = true;
        self.focused = true;
        self.editor_focused = false;
    }

    fn receive_native_paste(&mut self, html: &str) {
        if !self.focused {
            tracing::debug!("[Capture] native paste ignored: target not focused");
            return;
        }
        self.content
            .get_or_insert_with(String::new)
            .push_str(html);
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn take_html(&mut self) -> Option<String> {
        self.content.take()
    }

    fn clear_and_hide(&mut self) {
        self.content = None;
        self.visible = false;
    }

    fn restore_editor_focus(&mut self) {
        self.focused = false;
        self.editor_focused = true;
    }
}

/// A paste waiting for the native paste to land in the capture target
///
/// Consumed by exactly one resumption.
#[derive(Debug)]
#[must_use = "a deferred paste leaves the editor suspended until it is resumed"]
pub struct CaptureResumption {
    pub(crate) context: PasteContext,
    pub(crate) editor_key: String,
    pub(crate) selection: SelectionState,
}

impl CaptureResumption {
    /// Text read from the clipboard at paste time
    pub fn text(&self) -> Option<&str> {
        self.context.text()
    }

    pub fn editor_key(&self) -> &str {
        &self.editor_key
    }

    /// Selection at paste time
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }
}
