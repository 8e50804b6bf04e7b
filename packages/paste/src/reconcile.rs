//! # Internal Clipboard Reconciliation
//!
//! Decides whether an external paste is really this editor's own copy coming
//! back through the system clipboard. When it is, the session's internal
//! clipboard is inserted verbatim and the lossy external payload is ignored.
//!
//! Comparisons skip blank lines on both sides: platforms often drop empty
//! lines when serializing a selection.

use crate::context::PasteContext;
use crate::text::TextSplitter;
use scribe_model::Fragment;
use std::fmt;

/// Markup attribute that identifies the editor a copy came from
pub fn editor_marker(editor_key: &str) -> String {
    format!("data-editor=\"{}\"", editor_key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReuseReason {
    /// The markup carries this editor's marker
    EditorMarker,
    /// One pasted line equals the single internal block
    SingleBlockMatch,
    /// Vendor archive paste whose lines equal the internal blocks
    VendorArchiveMatch,
}

impl fmt::Display for ReuseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReuseReason::EditorMarker => write!(f, "editor marker"),
            ReuseReason::SingleBlockMatch => write!(f, "single block match"),
            ReuseReason::VendorArchiveMatch => write!(f, "vendor archive match"),
        }
    }
}

pub struct InternalClipboardReconciler<'a> {
    splitter: &'a dyn TextSplitter,
    legacy_vendor_archive: bool,
}

impl<'a> InternalClipboardReconciler<'a> {
    pub fn new(splitter: &'a dyn TextSplitter, legacy_vendor_archive: bool) -> Self {
        Self {
            splitter,
            legacy_vendor_archive,
        }
    }

    /// Why `snapshot` should be reused for this paste, if it should
    pub fn reconcile(
        &self,
        context: &PasteContext,
        editor_key: &str,
        snapshot: Option<&Fragment>,
    ) -> Option<ReuseReason> {
        let snapshot = snapshot.filter(|s| !s.is_empty())?;

        if context
            .html()
            .is_some_and(|html| html.contains(&editor_marker(editor_key)))
        {
            return Some(ReuseReason::EditorMarker);
        }

        let text = context.text()?;
        let pasted = self.non_blank_lines(text);
        let internal = non_blank_blocks(snapshot);

        if pasted.len() == 1 && internal.len() == 1 && pasted[0] == internal[0] {
            return Some(ReuseReason::SingleBlockMatch);
        }

        if self.legacy_vendor_archive && context.via_vendor_archive() && pasted == internal {
            return Some(ReuseReason::VendorArchiveMatch);
        }

        None
    }

    fn non_blank_lines(&self, text: &str) -> Vec<String> {
        self.splitter
            .split_text_into_blocks(text)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

fn non_blank_blocks(snapshot: &Fragment) -> Vec<String> {
    snapshot
        .blocks()
        .iter()
        .filter(|b| !b.text.trim().is_empty())
        .map(|b| b.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LineSplitter;
    use scribe_model::{Block, BlockKey, BlockType};

    fn snapshot(texts: &[&str]) -> Fragment {
        Fragment::from_blocks(texts.iter().enumerate().map(|(i, t)| {
            Block::new(BlockKey::new(format!("s{}", i)), BlockType::Unstyled, *t)
        }))
    }

    fn reconcile(context: &PasteContext, snap: Option<&Fragment>) -> Option<ReuseReason> {
        InternalClipboardReconciler::new(&LineSplitter, true).reconcile(context, "abc123", snap)
    }

    #[test]
    fn test_no_snapshot_never_reuses() {
        let context = PasteContext::new(Some("Hello".into()), None);
        assert_eq!(reconcile(&context, None), None);
        assert_eq!(reconcile(&context, Some(&Fragment::new())), None);
    }

    #[test]
    fn test_editor_marker() {
        let snap = snapshot(&["one", "two"]);
        let context = PasteContext::new(
            Some("different".into()),
            Some(r#"<div data-editor="abc123"><p>one</p></div>"#.into()),
        );
        assert_eq!(reconcile(&context, Some(&snap)), Some(ReuseReason::EditorMarker));

        let foreign = PasteContext::new(
            Some("different".into()),
            Some(r#"<div data-editor="zzz"><p>one</p></div>"#.into()),
        );
        assert_eq!(reconcile(&foreign, Some(&snap)), None);
    }

    #[test]
    fn test_single_block_match_ignores_blank_lines() {
        let snap = snapshot(&["", "Hello", ""]);
        let context = PasteContext::new(Some("Hello\n".into()), None);
        assert_eq!(reconcile(&context, Some(&snap)), Some(ReuseReason::SingleBlockMatch));

        let other = PasteContext::new(Some("Hello!".into()), None);
        assert_eq!(reconcile(&other, Some(&snap)), None);
    }

    #[test]
    fn test_multi_block_text_needs_marker() {
        let snap = snapshot(&["a", "b"]);
        let context = PasteContext::new(Some("a\nb".into()), None);
        assert_eq!(reconcile(&context, Some(&snap)), None);
    }

    #[test]
    fn test_vendor_archive_match() {
        let snap = snapshot(&["a", "", "b"]);
        let raw = crate::payload::RawClipboard::new()
            .with_text("a\nb")
            .with_type(crate::payload::VENDOR_ARCHIVE);
        let context = PasteContext::from_payload(&crate::payload::ClipboardPayload::from_handle(&raw));

        assert_eq!(reconcile(&context, Some(&snap)), Some(ReuseReason::VendorArchiveMatch));

        let disabled = InternalClipboardReconciler::new(&LineSplitter, false);
        assert_eq!(disabled.reconcile(&context, "abc123", Some(&snap)), None);
    }
}
