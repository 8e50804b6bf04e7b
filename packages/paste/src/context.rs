use crate::payload::{ClipboardPayload, PayloadKind};
use std::borrow::Cow;

/// Text and markup threaded through one paste resolution
///
/// Built once from the payload; later steps receive it by value instead of
/// re-reading the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteContext {
    text: Option<String>,
    html: Option<String>,

    /// Only the vendor archive type carried the markup
    via_vendor_archive: bool,

    /// A host formatter rewrote the text; the internal clipboard no longer applies
    formatted: bool,
}

impl PasteContext {
    pub fn new(text: Option<String>, html: Option<String>) -> Self {
        let mut context = Self {
            text,
            html,
            via_vendor_archive: false,
            formatted: false,
        };
        context.discard_echoed_html();
        context
    }

    pub fn from_payload(payload: &ClipboardPayload) -> Self {
        let mut context = Self::new(
            payload.text().map(str::to_string),
            payload.html().map(str::to_string),
        );
        context.via_vendor_archive = payload.kind() == PayloadKind::HtmlViaVendorArchive;
        context
    }

    /// Markup recovered by the capture target
    pub fn with_recovered_html(mut self, html: Option<String>) -> Self {
        self.html = html;
        self.discard_echoed_html();
        self
    }

    /// Text and markup rewritten by a host formatter
    pub fn reformatted(mut self, text: String, html: Option<String>) -> Self {
        self.text = Some(text);
        self.html = html;
        self.formatted = true;
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_html(&self) -> bool {
        self.html.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn via_vendor_archive(&self) -> bool {
        self.via_vendor_archive
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    /// Some platforms echo plain text as "markup"; such html carries nothing
    fn discard_echoed_html(&mut self) {
        let echoed = match (&self.text, &self.html) {
            (Some(text), Some(html)) => normalize_line_endings(text) == normalize_line_endings(html),
            _ => false,
        };
        if echoed {
            tracing::debug!("[Paste] markup echoes plain text, discarding it");
            self.html = None;
        }
    }
}

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
