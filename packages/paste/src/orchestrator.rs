//! # Paste Orchestrator
//!
//! Sequences classification, reconciliation and import, and commits at most
//! one `insert-fragment` edit per paste event.
//!
//! ```text
//! Start ─▶ Classify ─┬─▶ FileBranch ─▶ (extract files) ─▶ Commit | NoOp
//!                    │
//!                    └─▶ RichTextBranch ─┬─▶ Resolve ─▶ Commit | NoOp
//!                                        │
//!                                        └─▶ Defer ─▶ (capture, next tick) ─▶ Resolve ─▶ Commit | NoOp
//!
//! Resolve: internal reuse ─▶ html import ─▶ plain text import   (first success wins)
//! ```
//!
//! The two suspend points are explicit values: [`PendingFileImport`] and
//! [`CaptureResumption`]. Hosts drive them, or call
//! [`PasteHandler::handle_paste`] to run the whole paste to completion.

use crate::capture::{CaptureResumption, CaptureTarget};
use crate::config::PasteConfig;
use crate::context::PasteContext;
use crate::error::PasteError;
use crate::files::{FileTextExtractor, FsTextExtractor};
use crate::hooks::{HandleValue, NoHooks, PasteHooks};
use crate::html_import::{DefaultHtmlImporter, HtmlImporter};
use crate::payload::{ClipboardHandle, ClipboardPayload, PayloadKind};
use crate::reconcile::{InternalClipboardReconciler, ReuseReason};
use crate::text::{build_text_fragment, CharacterStamp, TextSplitter};
use futures::future::BoxFuture;
use scribe_model::{EditorSession, Fragment};
use std::fmt;

/// How a paste was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteResolution {
    InternalReuse(ReuseReason),
    HtmlImport,
    PlainTextImport,
    FileImport,
    /// Waiting for the capture target; nothing committed yet
    DeferredCapture,
    NoOp,
}

impl PasteResolution {
    /// Whether the resolution committed an edit
    pub fn committed(&self) -> bool {
        !matches!(self, PasteResolution::DeferredCapture | PasteResolution::NoOp)
    }
}

impl fmt::Display for PasteResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteResolution::InternalReuse(reason) => write!(f, "internal-reuse ({})", reason),
            PasteResolution::HtmlImport => write!(f, "html-import"),
            PasteResolution::PlainTextImport => write!(f, "plain-text-import"),
            PasteResolution::FileImport => write!(f, "file-import"),
            PasteResolution::DeferredCapture => write!(f, "deferred-capture"),
            PasteResolution::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of [`PasteHandler::on_paste`]
#[must_use]
pub enum PasteOutcome {
    Resolved(PasteResolution),
    /// File text is being extracted; finish with [`PendingFileImport::finish`]
    AwaitingFiles(PendingFileImport),
    /// Native paste must land first; resume with [`PasteHandler::resume_capture_after_tick`]
    AwaitingCapture(CaptureResumption),
}

impl PasteOutcome {
    /// Resolution known so far (`None` while files are still being read)
    pub fn resolution(&self) -> Option<PasteResolution> {
        match self {
            PasteOutcome::Resolved(resolution) => Some(*resolution),
            PasteOutcome::AwaitingFiles(_) => None,
            PasteOutcome::AwaitingCapture(_) => Some(PasteResolution::DeferredCapture),
        }
    }
}

impl fmt::Debug for PasteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteOutcome::Resolved(resolution) => f.debug_tuple("Resolved").field(resolution).finish(),
            PasteOutcome::AwaitingFiles(_) => f.write_str("AwaitingFiles"),
            PasteOutcome::AwaitingCapture(resumption) => {
                f.debug_tuple("AwaitingCapture").field(resumption).finish()
            }
        }
    }
}

/// A paste event as delivered by the host
#[derive(Debug)]
pub struct PasteEvent {
    payload: ClipboardPayload,
    default_prevented: bool,
}

impl PasteEvent {
    pub fn new(payload: ClipboardPayload) -> Self {
        Self {
            payload,
            default_prevented: false,
        }
    }

    pub fn from_handle(handle: &dyn ClipboardHandle) -> Self {
        Self::new(ClipboardPayload::from_handle(handle))
    }

    pub fn payload(&self) -> &ClipboardPayload {
        &self.payload
    }

    /// Stop the platform's native paste
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// File text extraction in flight
///
/// The session stays in paste mode until the import is finished.
#[must_use = "the editor stays suspended until the file import is finished"]
pub struct PendingFileImport {
    extraction: BoxFuture<'static, String>,
    fallback_text: Option<String>,
    editor_key: String,
}

impl PendingFileImport {
    pub fn editor_key(&self) -> &str {
        &self.editor_key
    }

    /// Wait for extraction and insert the text (or the payload text when extraction found none)
    pub async fn finish(
        self,
        handler: &PasteHandler,
        session: &mut EditorSession,
    ) -> Result<PasteResolution, PasteError> {
        if self.editor_key != session.editor_key() {
            return Err(PasteError::ForeignResumption {
                expected: self.editor_key,
                actual: session.editor_key().to_string(),
            });
        }

        let extracted = self.extraction.await;
        session.exit_paste_mode();

        let text = if extracted.is_empty() {
            self.fallback_text.unwrap_or_default()
        } else {
            extracted
        };
        handler.import_file_text(session, &text)
    }
}

pub struct PasteHandler {
    config: PasteConfig,
    hooks: Box<dyn PasteHooks>,
    importer: Box<dyn HtmlImporter>,
    splitter: Box<dyn TextSplitter>,
    extractor: Box<dyn FileTextExtractor>,
    capture_target: Option<Box<dyn CaptureTarget>>,
}

impl PasteHandler {
    /// Create a handler with the built-in services selected by `config`
    pub fn new(config: PasteConfig) -> Self {
        let splitter = config.split_mode.splitter();
        let extractor = Box::new(FsTextExtractor::new(config.file_text_limit));
        Self {
            config,
            hooks: Box::new(NoHooks),
            importer: Box::new(DefaultHtmlImporter),
            splitter,
            extractor,
            capture_target: None,
        }
    }

    pub fn with_hooks(mut self, hooks: impl PasteHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn with_importer(mut self, importer: impl HtmlImporter + 'static) -> Self {
        self.importer = Box::new(importer);
        self
    }

    pub fn with_splitter(mut self, splitter: impl TextSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    pub fn with_extractor(mut self, extractor: impl FileTextExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Register the off-screen target used when the host lacks synchronous HTML
    pub fn with_capture_target(mut self, target: impl CaptureTarget + 'static) -> Self {
        self.capture_target = Some(Box::new(target));
        self
    }

    pub fn config(&self) -> &PasteConfig {
        &self.config
    }

    pub fn capture_target_mut(&mut self) -> Option<&mut (dyn CaptureTarget + 'static)> {
        self.capture_target.as_deref_mut()
    }

    /// Handle a native paste event
    pub fn on_paste(
        &mut self,
        session: &mut EditorSession,
        event: &mut PasteEvent,
    ) -> Result<PasteOutcome, PasteError> {
        if session.is_suspended() {
            tracing::warn!(
                "[Paste] {} is waiting on a deferred paste, ignoring event",
                session.editor_key()
            );
            return Ok(PasteOutcome::Resolved(PasteResolution::NoOp));
        }

        let kind = event.payload().kind();
        tracing::debug!(
            "[Paste] {} payload kind={:?} rich={}",
            session.editor_key(),
            kind,
            event.payload().is_rich_text()
        );

        if kind == PayloadKind::Files {
            return self.file_branch(session, event);
        }

        let context = PasteContext::from_payload(event.payload());

        if self.config.lacks_sync_html && context.has_text() && !context.has_html() {
            if self.capture_target.is_some() {
                return self.defer(session, context).map(PasteOutcome::AwaitingCapture);
            }
            tracing::debug!("[Capture] no capture target registered, resolving synchronously");
        }

        event.prevent_default();
        self.resolve(session, context).map(PasteOutcome::Resolved)
    }

    /// Run a paste to completion, driving both suspend points
    pub async fn handle_paste(
        &mut self,
        session: &mut EditorSession,
        event: &mut PasteEvent,
    ) -> Result<PasteResolution, PasteError> {
        match self.on_paste(session, event)? {
            PasteOutcome::Resolved(resolution) => Ok(resolution),
            PasteOutcome::AwaitingFiles(pending) => pending.finish(self, session).await,
            PasteOutcome::AwaitingCapture(resumption) => {
                self.resume_capture_after_tick(session, resumption).await
            }
        }
    }

    /// Resume a deferred paste at the next scheduler tick
    pub async fn resume_capture_after_tick(
        &mut self,
        session: &mut EditorSession,
        resumption: CaptureResumption,
    ) -> Result<PasteResolution, PasteError> {
        tokio::task::yield_now().await;
        self.resume_capture(session, resumption)
    }

    /// Resume a deferred paste with whatever markup the capture target received
    pub fn resume_capture(
        &mut self,
        session: &mut EditorSession,
        resumption: CaptureResumption,
    ) -> Result<PasteResolution, PasteError> {
        if resumption.editor_key != session.editor_key() {
            return Err(PasteError::ForeignResumption {
                expected: resumption.editor_key,
                actual: session.editor_key().to_string(),
            });
        }

        let Some(target) = self.capture_target.as_deref_mut() else {
            session.exit_paste_mode();
            return Err(PasteError::NoCaptureTarget);
        };

        let html = target.take_html();
        target.clear_and_hide();
        target.restore_editor_focus();
        session.exit_paste_mode();

        if session.state().selection() != &resumption.selection {
            tracing::warn!(
                "[Capture] {} selection moved while the paste was deferred",
                session.editor_key()
            );
            return Err(PasteError::SelectionMoved);
        }

        tracing::info!(
            "[Capture] resumed {} with {} bytes of recovered markup",
            session.editor_key(),
            html.as_ref().map_or(0, String::len)
        );

        let context = resumption.context.with_recovered_html(html);
        self.resolve(session, context)
    }

    fn file_branch(
        &self,
        session: &mut EditorSession,
        event: &mut PasteEvent,
    ) -> Result<PasteOutcome, PasteError> {
        let files = event.payload().files();
        if self.hooks.handle_pasted_files(files, session.state()) == HandleValue::Handled {
            tracing::debug!("[Paste] files handled by host");
            return Ok(PasteOutcome::Resolved(PasteResolution::NoOp));
        }

        session.enter_paste_mode()?;
        tracing::debug!(
            "[Paste] {} extracting text from {} file(s)",
            session.editor_key(),
            files.len()
        );

        let extraction = self.extractor.extract_text(files);
        let fallback_text = event.payload().text().map(str::to_string);
        event.prevent_default();

        Ok(PasteOutcome::AwaitingFiles(PendingFileImport {
            extraction,
            fallback_text,
            editor_key: session.editor_key().to_string(),
        }))
    }

    fn import_file_text(
        &self,
        session: &mut EditorSession,
        text: &str,
    ) -> Result<PasteResolution, PasteError> {
        if text.is_empty() {
            tracing::debug!("[Paste] files produced no text");
            return Ok(PasteResolution::NoOp);
        }

        let segments = self.splitter.split_text_into_blocks(text);
        let resolution = self.insert_plain_text(session, &segments, PasteResolution::FileImport)?;
        if resolution.committed() {
            session.clear_internal_clipboard();
        }
        Ok(resolution)
    }

    fn defer(
        &mut self,
        session: &mut EditorSession,
        context: PasteContext,
    ) -> Result<CaptureResumption, PasteError> {
        let selection = session.state().selection().clone();
        session.enter_paste_mode()?;
        if let Some(target) = self.capture_target.as_deref_mut() {
            target.focus();
        }

        tracing::info!(
            "[Capture] {} deferring paste until the native paste lands",
            session.editor_key()
        );

        Ok(CaptureResumption {
            context,
            editor_key: session.editor_key().to_string(),
            selection,
        })
    }

    /// Internal reuse, then html import, then plain text import
    fn resolve(
        &self,
        session: &mut EditorSession,
        context: PasteContext,
    ) -> Result<PasteResolution, PasteError> {
        let mut context = context;
        if let Some(formatted) = self
            .hooks
            .format_pasted_text(context.text().unwrap_or_default(), context.html())
        {
            context = context.reformatted(formatted.text, formatted.html);
        }

        if self
            .hooks
            .handle_pasted_text(context.text(), context.html(), session.state())
            == HandleValue::Handled
        {
            tracing::debug!("[Paste] text handled by host");
            return Ok(PasteResolution::NoOp);
        }

        let segments = context
            .text()
            .map(|text| self.splitter.split_text_into_blocks(text))
            .unwrap_or_default();

        if self.config.strip_pasted_styles {
            session.clear_internal_clipboard();
        } else {
            if !context.is_formatted() {
                if let Some(resolution) = self.reuse_internal(session, &context)? {
                    return Ok(resolution);
                }
            }

            if let Some(html) = context.html().filter(|html| !html.is_empty()) {
                let fragment = self.importer.convert_html_to_blocks(
                    html,
                    &self.config.block_render_rules,
                    session.keys_mut(),
                );
                match fragment {
                    Some(fragment) => {
                        self.commit(session, &fragment, PasteResolution::HtmlImport)?;
                        session.clear_internal_clipboard();
                        return Ok(PasteResolution::HtmlImport);
                    }
                    None => {
                        tracing::debug!("[Paste] markup produced no blocks, using plain text");
                    }
                }
            }
        }

        let resolution =
            self.insert_plain_text(session, &segments, PasteResolution::PlainTextImport)?;
        if resolution.committed() {
            session.clear_internal_clipboard();
        }
        Ok(resolution)
    }

    fn reuse_internal(
        &self,
        session: &mut EditorSession,
        context: &PasteContext,
    ) -> Result<Option<PasteResolution>, PasteError> {
        let Some(snapshot) = session.internal_clipboard().cloned() else {
            return Ok(None);
        };

        let reconciler =
            InternalClipboardReconciler::new(self.splitter.as_ref(), self.config.legacy_vendor_archive);
        let Some(reason) = reconciler.reconcile(context, session.editor_key(), Some(&snapshot)) else {
            return Ok(None);
        };

        let resolution = PasteResolution::InternalReuse(reason);
        self.commit(session, &snapshot, resolution)?;
        Ok(Some(resolution))
    }

    fn insert_plain_text(
        &self,
        session: &mut EditorSession,
        segments: &[String],
        resolution: PasteResolution,
    ) -> Result<PasteResolution, PasteError> {
        let stamp = CharacterStamp::from_state(session.state());
        let block_type = session.state().block_type_at_selection();

        match build_text_fragment(segments, &stamp, block_type, session.keys_mut()) {
            Some(fragment) => {
                self.commit(session, &fragment, resolution)?;
                Ok(resolution)
            }
            None => {
                tracing::debug!("[Paste] nothing to insert");
                Ok(PasteResolution::NoOp)
            }
        }
    }

    fn commit(
        &self,
        session: &mut EditorSession,
        fragment: &Fragment,
        resolution: PasteResolution,
    ) -> Result<(), PasteError> {
        session.insert_fragment(fragment)?;
        tracing::info!(
            "[Paste] {} committed {} block(s) via {}",
            session.editor_key(),
            fragment.len(),
            resolution
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::RawClipboard;
    use scribe_model::{Block, BlockKey, BlockType, ContentState, SelectionState};

    fn session(text: &str) -> EditorSession {
        let content = ContentState::from_blocks(vec![Block::new(
            BlockKey::new("a"),
            BlockType::Unstyled,
            text,
        )])
        .unwrap();
        let mut session = EditorSession::new("orchestrator", content);
        let len = text.chars().count();
        session
            .set_selection(SelectionState::collapsed(BlockKey::new("a"), len))
            .unwrap();
        session
    }

    #[test]
    fn test_plain_text_paste_prevents_default() {
        let mut handler = PasteHandler::new(PasteConfig::default());
        let mut session = session("x");
        let mut event = PasteEvent::from_handle(&RawClipboard::new().with_text("yz"));

        let outcome = handler.on_paste(&mut session, &mut event).unwrap();
        assert_eq!(outcome.resolution(), Some(PasteResolution::PlainTextImport));
        assert!(event.is_default_prevented());
        assert_eq!(session.state().content().plain_text(), "xyz");
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(PasteResolution::HtmlImport.to_string(), "html-import");
        assert_eq!(
            PasteResolution::InternalReuse(ReuseReason::EditorMarker).to_string(),
            "internal-reuse (editor marker)"
        );
        assert!(!PasteResolution::NoOp.committed());
        assert!(PasteResolution::FileImport.committed());
    }

    #[test]
    fn test_deferral_without_target_resolves_synchronously() {
        let config = PasteConfig {
            lacks_sync_html: true,
            ..Default::default()
        };
        let mut handler = PasteHandler::new(config);
        let mut session = session("");
        let mut event = PasteEvent::from_handle(&RawClipboard::new().with_text("now"));

        let outcome = handler.on_paste(&mut session, &mut event).unwrap();
        assert_eq!(outcome.resolution(), Some(PasteResolution::PlainTextImport));
        assert!(!session.is_suspended());
    }
}
