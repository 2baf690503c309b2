//! Text extraction: read the text layer of every page via pdfium.
//!
//! pdfium keeps thread-local state and must not run on the async workers,
//! so the work is moved to `tokio::task::spawn_blocking`. Pages come back in
//! document order; each page with any text contributes that text followed by
//! a newline, and pages without a text layer (scans, blank pages)
//! contribute nothing.
//!
//! Failures here are fatal: a corrupt, encrypted or unreadable document ends
//! the run with a [`MindMapError`].

use crate::error::MindMapError;
use crate::outcome::{ExtractOutcome, ExtractedText};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or the directory holding it.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Extract the text of every page of `pdf_path`.
pub async fn extract_text(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractOutcome, MindMapError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_text_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| MindMapError::Internal(format!("Extraction task panicked: {}", e)))?
}

fn extract_text_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<ExtractOutcome, MindMapError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                MindMapError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                MindMapError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            MindMapError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;

    let mut page_texts = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| MindMapError::ExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Page {}: {} chars", idx + 1, text.chars().count());
        page_texts.push(text);
    }

    let extracted = join_pages(page_texts);
    info!(
        "Extracted text from {}/{} pages ({} chars)",
        extracted.pages_with_text,
        extracted.page_count,
        extracted.text.chars().count()
    );
    Ok(ExtractOutcome::from_text(extracted))
}

/// Join per-page texts in order, skipping pages that produced no text.
pub fn join_pages<I>(pages: I) -> ExtractedText
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    let mut page_count = 0;
    let mut pages_with_text = 0;

    for page in pages {
        page_count += 1;
        if page.is_empty() {
            continue;
        }
        pages_with_text += 1;
        text.push_str(&page);
        text.push('\n');
    }

    ExtractedText {
        text,
        page_count,
        pages_with_text,
    }
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` first, then the system library.
fn bind_pdfium() -> Result<Pdfium, MindMapError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(raw) if !raw.is_empty() => {
            let path = library_path(PathBuf::from(raw));
            debug!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(&path)
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| MindMapError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Accept either the library file itself or the directory containing it.
fn library_path(path: PathBuf) -> PathBuf {
    if path.is_dir() {
        path.join(Pdfium::pdfium_platform_library_name())
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_pages_without_text() {
        let joined = join_pages(vec![
            "Capítulo 1".to_string(),
            String::new(),
            "Capítulo 2".to_string(),
        ]);
        assert_eq!(joined.text, "Capítulo 1\nCapítulo 2\n");
        assert_eq!(joined.page_count, 3);
        assert_eq!(joined.pages_with_text, 2);
    }

    #[test]
    fn join_of_scanned_document_is_empty() {
        let joined = join_pages(vec![String::new(), String::new()]);
        assert!(joined.text.is_empty());
        assert!(matches!(
            ExtractOutcome::from_text(joined),
            ExtractOutcome::EmptyExtraction { page_count: 2 }
        ));
    }

    #[test]
    fn whitespace_only_page_still_counts() {
        let joined = join_pages(vec!["  ".to_string()]);
        assert_eq!(joined.text, "  \n");
        assert_eq!(joined.pages_with_text, 1);
    }

    #[test]
    fn library_path_keeps_files() {
        let p = PathBuf::from("/opt/pdfium/libpdfium.so");
        assert_eq!(library_path(p.clone()), p);
    }
}
