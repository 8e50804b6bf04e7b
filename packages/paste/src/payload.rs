//! # Clipboard Payload
//!
//! Normalizes a platform clipboard handle into a read-only [`ClipboardPayload`].
//!
//! ```text
//! ClipboardHandle (platform)          ClipboardPayload (snapshot)
//!   types() -> Option<[mime]>   ──▶     types: None = type list unavailable
//!   data(mime)                  ──▶     text / html
//!   files()                     ──▶     files
//! ```
//!
//! A missing type list is a known platform defect. It makes `html()` report
//! "unavailable" (`None`), which is distinct from explicitly empty markup
//! (`Some("")`).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_RTF: &str = "text/rtf";

/// Vendor archive type some platforms advertise instead of `text/html`
pub const VENDOR_ARCHIVE: &str = "com.apple.webarchive";

const RICH_TEXT_TYPES: &[&str] = &[TEXT_HTML, TEXT_RTF];

/// Raw platform clipboard access
pub trait ClipboardHandle {
    /// Advertised MIME types; `None` when the platform reports no type list
    fn types(&self) -> Option<Vec<String>>;

    fn data(&self, mime: &str) -> Option<String>;

    fn files(&self) -> Vec<FileHandle>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileSource {
    Path(PathBuf),
    /// File contents already in memory
    Inline(String),
}

/// A pasted or dropped file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,

    /// MIME type as reported by the platform; `None` when untyped
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,

    pub source: FileSource,
}

impl FileHandle {
    pub fn inline(name: impl Into<String>, mime: Option<&str>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            source: FileSource::Inline(contents.into()),
        }
    }

    pub fn path(path: impl Into<PathBuf>, mime: Option<&str>) -> Self {
        let path = path.into();
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime: mime.map(str::to_string),
            source: FileSource::Path(path),
        }
    }
}

/// Serializable clipboard contents, used for fixtures and the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawClipboard {
    #[serde(default)]
    pub types: Option<Vec<String>>,

    #[serde(default)]
    pub data: BTreeMap<String, String>,

    #[serde(default)]
    pub files: Vec<FileHandle>,
}

impl RawClipboard {
    /// An empty clipboard with an (empty) type list
    pub fn new() -> Self {
        Self {
            types: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, mime: &str, value: impl Into<String>) -> Self {
        self = self.with_type(mime);
        self.data.insert(mime.to_string(), value.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_data(TEXT_PLAIN, text)
    }

    pub fn with_html(self, html: impl Into<String>) -> Self {
        self.with_data(TEXT_HTML, html)
    }

    /// Advertise a type without data
    pub fn with_type(mut self, mime: &str) -> Self {
        let types = self.types.get_or_insert_with(Vec::new);
        if !types.iter().any(|t| t == mime) {
            types.push(mime.to_string());
        }
        self
    }

    pub fn with_file(mut self, file: FileHandle) -> Self {
        self = self.with_type("Files");
        self.files.push(file);
        self
    }

    /// Drop the type list, as platforms with the missing-types defect do
    pub fn without_types(mut self) -> Self {
        self.types = None;
        self
    }
}

impl ClipboardHandle for RawClipboard {
    fn types(&self) -> Option<Vec<String>> {
        self.types.clone()
    }

    fn data(&self, mime: &str) -> Option<String> {
        self.data.get(mime).cloned()
    }

    fn files(&self) -> Vec<FileHandle> {
        self.files.clone()
    }
}

/// What a payload can offer, most capable first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Markup is available
    Html,
    /// Only the vendor archive type is advertised; markup is not readable
    HtmlViaVendorArchive,
    /// Files and no markup
    Files,
    PlainText,
    Empty,
}

/// Immutable view of one paste event's clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    text: Option<String>,
    html: Option<String>,
    files: Vec<FileHandle>,
    types: Option<BTreeSet<String>>,
}

impl ClipboardPayload {
    pub fn from_handle(handle: &dyn ClipboardHandle) -> Self {
        let types: Option<BTreeSet<String>> = handle
            .types()
            .filter(|types| !types.is_empty())
            .map(|types| types.into_iter().collect());

        let text = handle.data(TEXT_PLAIN).or_else(|| handle.data("text"));
        let html = match types {
            Some(_) => handle.data(TEXT_HTML),
            None => None,
        };

        Self {
            text,
            html,
            files: handle.files(),
            types,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Markup; `None` when absent or undeterminable
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.as_ref().is_some_and(|types| types.contains(name))
    }

    /// Whether the platform reported a usable type list
    pub fn has_type_list(&self) -> bool {
        self.types.is_some()
    }

    /// True when the payload carries markup beyond plain text
    ///
    /// Files alone do not count, so a file paste without markup reaches the
    /// file branch.
    pub fn is_rich_text(&self) -> bool {
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_html = self.html.as_deref().is_some_and(|h| !h.is_empty());
        if has_text && has_html {
            return true;
        }
        RICH_TEXT_TYPES.iter().any(|t| self.has_type(t))
    }

    pub fn kind(&self) -> PayloadKind {
        if !self.is_rich_text() && !self.files.is_empty() {
            PayloadKind::Files
        } else if self.has_type(VENDOR_ARCHIVE) && !self.has_type(TEXT_HTML) {
            PayloadKind::HtmlViaVendorArchive
        } else if self.html.as_deref().is_some_and(|h| !h.is_empty()) {
            PayloadKind::Html
        } else if self.text.as_deref().is_some_and(|t| !t.is_empty()) {
            PayloadKind::PlainText
        } else {
            PayloadKind::Empty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_payload() {
        let payload = ClipboardPayload::from_handle(&RawClipboard::new().with_text("hello"));
        assert_eq!(payload.text(), Some("hello"));
        assert_eq!(payload.html(), None);
        assert!(!payload.is_rich_text());
        assert_eq!(payload.kind(), PayloadKind::PlainText);
    }

    #[test]
    fn test_rich_payload() {
        let payload = ClipboardPayload::from_handle(
            &RawClipboard::new().with_text("hi").with_html("<b>hi</b>"),
        );
        assert!(payload.is_rich_text());
        assert!(payload.has_type(TEXT_HTML));
        assert_eq!(payload.kind(), PayloadKind::Html);

        // Advertised rich type without readable markup
        let rtf = ClipboardPayload::from_handle(&RawClipboard::new().with_type(TEXT_RTF));
        assert!(rtf.is_rich_text());
    }

    #[test]
    fn test_missing_type_list_makes_html_unavailable() {
        let raw = RawClipboard::new()
            .with_text("hi")
            .with_html("<b>hi</b>")
            .without_types();
        let payload = ClipboardPayload::from_handle(&raw);
        assert_eq!(payload.html(), None);
        assert_eq!(payload.text(), Some("hi"));
        assert!(!payload.has_type_list());
    }

    #[test]
    fn test_empty_markup_is_not_unavailable() {
        let payload =
            ClipboardPayload::from_handle(&RawClipboard::new().with_text("x").with_html(""));
        assert_eq!(payload.html(), Some(""));
    }

    #[test]
    fn test_files_alone_are_not_rich() {
        let raw = RawClipboard::new().with_file(FileHandle::inline("a.txt", Some(TEXT_PLAIN), "x"));
        let payload = ClipboardPayload::from_handle(&raw);
        assert!(!payload.is_rich_text());
        assert_eq!(payload.kind(), PayloadKind::Files);

        let with_markup = ClipboardPayload::from_handle(&raw.with_text("x").with_html("<p>x</p>"));
        assert_eq!(with_markup.kind(), PayloadKind::Html);
    }

    #[test]
    fn test_vendor_archive_kind() {
        let payload = ClipboardPayload::from_handle(
            &RawClipboard::new().with_text("x").with_type(VENDOR_ARCHIVE),
        );
        assert_eq!(payload.kind(), PayloadKind::HtmlViaVendorArchive);
    }

    #[test]
    fn test_classification_is_pure() {
        let payload = ClipboardPayload::from_handle(
            &RawClipboard::new().with_text("a").with_html("<i>a</i>"),
        );
        for _ in 0..3 {
            assert!(payload.is_rich_text());
            assert_eq!(payload.html(), Some("<i>a</i>"));
            assert_eq!(payload.kind(), PayloadKind::Html);
        }
    }

    #[test]
    fn test_raw_clipboard_from_json() {
        let json = r#"{
            "types": ["text/plain", "Files"],
            "data": {"text/plain": "notes"},
            "files": [{"name": "notes.txt", "type": "text/plain", "source": {"inline": "file body"}}]
        }"#;
        let raw: RawClipboard = serde_json::from_str(json).unwrap();
        assert_eq!(raw.files[0].source, FileSource::Inline("file body".to_string()));

        let payload = ClipboardPayload::from_handle(&raw);
        assert_eq!(payload.files().len(), 1);
        assert_eq!(payload.kind(), PayloadKind::Files);
    }
}
