//! # File Text Extraction
//!
//! Reads text out of pasted files. Extraction is asynchronous and resolves
//! exactly once; failures contribute nothing instead of erroring.

use crate::config::DEFAULT_FILE_TEXT_LIMIT;
use crate::payload::{FileHandle, FileSource, TEXT_HTML, TEXT_PLAIN, TEXT_RTF};
use futures::future::BoxFuture;
use futures::FutureExt;

const TEXT_TYPES: &[&str] = &[TEXT_PLAIN, TEXT_HTML, TEXT_RTF];

/// Separator between the texts of several files
const FILE_SEPARATOR: &str = "\r";

pub trait FileTextExtractor: Send + Sync {
    /// Combined text of `files`, possibly empty
    fn extract_text(&self, files: &[FileHandle]) -> BoxFuture<'static, String>;
}

/// Reads inline contents or files on disk with `tokio::fs`
#[derive(Debug, Clone)]
pub struct FsTextExtractor {
    limit: usize,
}

impl FsTextExtractor {
    /// Keep at most `limit` characters of each file
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for FsTextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_TEXT_LIMIT)
    }
}

impl FileTextExtractor for FsTextExtractor {
    fn extract_text(&self, files: &[FileHandle]) -> BoxFuture<'static, String> {
        let files = files.to_vec();
        let limit = self.limit;

        async move {
            let mut texts = Vec::with_capacity(files.len());
            for file in &files {
                let text = read_file_text(file).await;
                if !text.is_empty() {
                    texts.push(text.chars().take(limit).collect::<String>());
                }
            }
            tracing::debug!(
                "[Paste] extracted text from {} of {} files",
                texts.len(),
                files.len()
            );
            texts.join(FILE_SEPARATOR)
        }
        .boxed()
    }
}

async fn read_file_text(file: &FileHandle) -> String {
    match file.mime.as_deref() {
        None | Some("") => {
            // Untyped entries are usually dragged links
            if looks_like_uri(&file.name) {
                file.name.clone()
            } else {
                String::new()
            }
        }
        Some(mime) if TEXT_TYPES.contains(&mime) => match &file.source {
            FileSource::Inline(contents) => contents.clone(),
            FileSource::Path(path) => match tokio::fs::read_to_string(path).await {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("[Paste] could not read {}: {}", path.display(), e);
                    String::new()
                }
            },
        },
        Some(mime) => {
            tracing::debug!("[Paste] skipping {} ({})", file.name, mime);
            String::new()
        }
    }
}

/// `scheme:rest` with an RFC 3986 scheme
fn looks_like_uri(name: &str) -> bool {
    let Some((scheme, rest)) = name.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inline_text_files_are_joined() {
        let files = vec![
            FileHandle::inline("a.txt", Some(TEXT_PLAIN), "first"),
            FileHandle::inline("b.png", Some("image/png"), "binary"),
            FileHandle::inline("c.html", Some(TEXT_HTML), "<p>second</p>"),
        ];
        let text = FsTextExtractor::default().extract_text(&files).await;
        assert_eq!(text, "first\r<p>second</p>");
    }

    #[tokio::test]
    async fn test_limit_is_applied_per_file() {
        let files = vec![
            FileHandle::inline("a.txt", Some(TEXT_PLAIN), "abcdef"),
            FileHandle::inline("b.txt", Some(TEXT_PLAIN), "ghijkl"),
        ];
        let text = FsTextExtractor::new(3).extract_text(&files).await;
        assert_eq!(text, "abc\rghi");
    }

    #[tokio::test]
    async fn test_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "from disk").unwrap();

        let files = vec![
            FileHandle::path(&path, Some(TEXT_PLAIN)),
            FileHandle::path(dir.path().join("missing.txt"), Some(TEXT_PLAIN)),
        ];
        let text = FsTextExtractor::default().extract_text(&files).await;
        assert_eq!(text, "from disk");
    }

    #[tokio::test]
    async fn test_untyped_uri_files() {
        let files = vec![
            FileHandle::inline("https://example.com/page", None, ""),
            FileHandle::inline("plain name", None, "ignored"),
        ];
        let text = FsTextExtractor::default().extract_text(&files).await;
        assert_eq!(text, "https://example.com/page");
    }

    #[test]
    fn test_looks_like_uri() {
        assert!(looks_like_uri("mailto:someone@example.com"));
        assert!(!looks_like_uri("notes.txt"));
        assert!(!looks_like_uri("1http://x"));
        assert!(!looks_like_uri("http:"));
    }
}
