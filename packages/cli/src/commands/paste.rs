use super::{read_json, resolve};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use scribe_model::{BlockKey, ContentState, EditorSession, Fragment, SelectionState};
use scribe_paste::{
    MemoryCaptureTarget, PasteConfig, PasteEvent, PasteHandler, PasteOutcome, PasteResolution,
    RawClipboard,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PasteArgs {
    /// Document JSON ({"blocks": [...], "entities": {...}})
    #[arg(short, long)]
    pub document: PathBuf,

    /// Recorded clipboard JSON ({"types": [...], "data": {...}, "files": [...]})
    #[arg(short, long)]
    pub payload: PathBuf,

    /// Fragment JSON standing in for the last in-editor copy
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Markup the capture target receives when the paste is deferred
    #[arg(long)]
    pub captured_html: Option<PathBuf>,

    /// Config file (defaults to scribe.config.json in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Paste as plain text regardless of config
    #[arg(long)]
    pub strip_styles: bool,

    /// Treat the host as lacking synchronous HTML regardless of config
    #[arg(long)]
    pub lacks_sync_html: bool,

    /// Block holding the caret (defaults to the last block)
    #[arg(long)]
    pub block: Option<String>,

    /// Caret offset in characters (defaults to the end of the block)
    #[arg(long)]
    pub offset: Option<usize>,

    /// Editor name used to derive the editor key
    #[arg(long, default_value = "scribe-cli")]
    pub editor: String,

    /// Write the resulting document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn paste(args: PasteArgs, cwd: &str) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => PasteConfig::from_file(&resolve(cwd, path))?,
        None => PasteConfig::load(cwd)?,
    };
    config.strip_pasted_styles |= args.strip_styles;
    config.lacks_sync_html |= args.lacks_sync_html;

    let content: ContentState = read_json(&resolve(cwd, &args.document))?;
    let clipboard: RawClipboard = read_json(&resolve(cwd, &args.payload))?;

    tracing::debug!(
        "[Cli] loaded {} blocks, clipboard types {:?}",
        content.blocks().len(),
        clipboard.types
    );

    let mut session = EditorSession::new(&args.editor, content);
    let selection = caret(&session, &args)?;
    session.set_selection(selection)?;

    if let Some(path) = &args.snapshot {
        let snapshot: Fragment = read_json(&resolve(cwd, path))?;
        session.store_internal_clipboard(snapshot);
    }

    let captured_html = match &args.captured_html {
        Some(path) => {
            let path = resolve(cwd, path);
            Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        }
        None => None,
    };

    eprintln!("{}", "📋 Pasting recorded clipboard...".bright_blue().bold());

    let mut handler = PasteHandler::new(config).with_capture_target(MemoryCaptureTarget::new());
    let mut event = PasteEvent::from_handle(&clipboard);

    let resolution = match handler.on_paste(&mut session, &mut event)? {
        PasteOutcome::Resolved(resolution) => resolution,
        PasteOutcome::AwaitingFiles(pending) => pending.finish(&handler, &mut session).await?,
        PasteOutcome::AwaitingCapture(resumption) => {
            eprintln!("  {} paste deferred to the capture target", "…".yellow());
            if let (Some(html), Some(target)) = (&captured_html, handler.capture_target_mut()) {
                target.receive_native_paste(html);
            }
            handler
                .resume_capture_after_tick(&mut session, resumption)
                .await?
        }
    };

    report(resolution, &session);

    let document = serde_json::to_string_pretty(session.state().content())?;
    match &args.output {
        Some(path) => {
            let path = resolve(cwd, path);
            fs::write(&path, document)?;
            eprintln!("  {} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", document),
    }

    Ok(())
}

fn caret(session: &EditorSession, args: &PasteArgs) -> Result<SelectionState> {
    let content = session.state().content();
    let block = match &args.block {
        Some(key) => content
            .block(&BlockKey::new(key.as_str()))
            .ok_or_else(|| anyhow!("Block not found in document: {}", key))?,
        None => content
            .blocks()
            .last()
            .ok_or_else(|| anyhow!("Document has no blocks"))?,
    };
    let offset = args.offset.unwrap_or_else(|| block.len());
    Ok(SelectionState::collapsed(block.key.clone(), offset))
}

fn report(resolution: PasteResolution, session: &EditorSession) {
    if resolution.committed() {
        eprintln!(
            "  {} {} ({} blocks, {} undo step)",
            "✓".green(),
            resolution.to_string().bright_white(),
            session.state().content().blocks().len(),
            session.history_len()
        );
    } else {
        eprintln!("  {} nothing pasted", "⚠️".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &std::path::Path) -> PasteArgs {
        PasteArgs {
            document: dir.join("doc.json"),
            payload: dir.join("clipboard.json"),
            snapshot: None,
            captured_html: None,
            config: None,
            strip_styles: false,
            lacks_sync_html: false,
            block: None,
            offset: None,
            editor: "cli-test".to_string(),
            output: Some(dir.join("out.json")),
        }
    }

    #[tokio::test]
    async fn test_paste_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("doc.json"),
            r#"{"blocks": [{"key": "a", "type": "unstyled", "text": "Hi "}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("clipboard.json"),
            r#"{"types": ["text/plain"], "data": {"text/plain": "there"}}"#,
        )
        .unwrap();

        let cwd = dir.path().display().to_string();
        paste(args(dir.path()), &cwd).await.unwrap();

        let out: ContentState = read_json(&dir.path().join("out.json")).unwrap();
        assert_eq!(out.plain_text(), "Hi there");
    }

    #[tokio::test]
    async fn test_deferred_paste_uses_captured_markup() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("doc.json"),
            r#"{"blocks": [{"key": "a", "type": "unstyled", "text": ""}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("clipboard.json"),
            r#"{"types": ["text/plain"], "data": {"text/plain": "One\nTwo"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("captured.html"), "<h1>One</h1><p>Two</p>").unwrap();
        fs::write(
            dir.path().join("scribe.config.json"),
            r#"{"lacksSyncHtml": true}"#,
        )
        .unwrap();

        let mut args = args(dir.path());
        args.captured_html = Some(dir.path().join("captured.html"));

        let cwd = dir.path().display().to_string();
        paste(args, &cwd).await.unwrap();

        let out: ContentState = read_json(&dir.path().join("out.json")).unwrap();
        assert_eq!(out.plain_text(), "One\nTwo");
        assert_eq!(out.blocks()[0].block_type, scribe_model::BlockType::HeaderOne);
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let content = ContentState::from_blocks(vec![scribe_model::Block::new(
            BlockKey::new("a"),
            scribe_model::BlockType::Unstyled,
            "x",
        )])
        .unwrap();
        let session = EditorSession::new("cli-test", content);
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.block = Some("missing".to_string());

        assert!(caret(&session, &args).is_err());
    }
}
