//! # Scribe Paste
//!
//! Turns a clipboard paste into exactly one `insert-fragment` edit (or none).
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────────────────────┐
//! │ PasteEvent   │──▶│ ClipboardPayload│──▶│ PasteHandler::on_paste       │
//! │ (host)       │   │ text/html/files │   │  files ─▶ PendingFileImport  │
//! └──────────────┘   └────────────────┘   │  no sync html ─▶ Capture     │
//!                                         │  otherwise ─▶ resolve        │
//!                                         └──────────────┬───────────────┘
//!                                                        ▼
//!                     internal reuse ─▶ html import ─▶ plain text import
//!                                                        ▼
//!                                   EditorSession::insert_fragment (one commit)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scribe_paste::{PasteConfig, PasteEvent, PasteHandler, RawClipboard};
//!
//! let mut handler = PasteHandler::new(PasteConfig::load(&cwd)?);
//! let mut event = PasteEvent::from_handle(&RawClipboard::new().with_text("Hello"));
//! let resolution = handler.handle_paste(&mut session, &mut event).await?;
//! ```

pub mod capture;
pub mod config;
pub mod context;
pub mod error;
pub mod files;
pub mod hooks;
pub mod html_import;
pub mod orchestrator;
pub mod payload;
pub mod reconcile;
pub mod text;

pub use capture::{CaptureResumption, CaptureTarget, MemoryCaptureTarget};
pub use config::{PasteConfig, DEFAULT_CONFIG_NAME, DEFAULT_FILE_TEXT_LIMIT};
pub use context::{normalize_line_endings, PasteContext};
pub use error::PasteError;
pub use files::{FileTextExtractor, FsTextExtractor};
pub use hooks::{FormattedPaste, HandleValue, NoHooks, PasteHooks};
pub use html_import::{DefaultHtmlImporter, HtmlImporter};
pub use orchestrator::{PasteEvent, PasteHandler, PasteOutcome, PasteResolution, PendingFileImport};
pub use payload::{
    ClipboardHandle, ClipboardPayload, FileHandle, FileSource, PayloadKind, RawClipboard,
    TEXT_HTML, TEXT_PLAIN, TEXT_RTF, VENDOR_ARCHIVE,
};
pub use reconcile::{editor_marker, InternalClipboardReconciler, ReuseReason};
pub use text::{
    build_text_fragment, CharacterStamp, LineSplitter, ParagraphSplitter, SplitMode, TextSplitter,
};
