//! Input resolution: check that the selected path is a readable PDF.
//!
//! Selections must carry a `.pdf` extension, as a file picker filtered to
//! PDFs would enforce, and must start with the `%PDF` magic bytes before the
//! extractor is allowed to see them.

use crate::error::MindMapError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `true` when `path` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Resolve the selection to a PDF file on disk.
pub fn resolve_input(selection: &str) -> Result<PathBuf, MindMapError> {
    let path = PathBuf::from(selection);

    if !path.exists() {
        return Err(MindMapError::FileNotFound { path });
    }
    if !has_pdf_extension(&path) {
        return Err(MindMapError::NotPdfExtension { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(MindMapError::PermissionDenied { path });
        }
        Err(_) => return Err(MindMapError::FileNotFound { path }),
    };

    // Shorter files fall through to pdfium, which reports them as corrupt.
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(MindMapError::NotAPdf { path, magic });
    }

    debug!("Selected PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("notes.PDF")));
        assert!(has_pdf_extension(Path::new("/a/b/notes.pdf")));
        assert!(!has_pdf_extension(Path::new("notes.txt")));
        assert!(!has_pdf_extension(Path::new("pdf")));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = resolve_input("/definitely/not/here.pdf").err();
        assert!(matches!(err, Some(MindMapError::FileNotFound { .. })));
    }

    #[test]
    fn urls_are_treated_as_paths() {
        let err = resolve_input("https://arxiv.org/pdf/1706.03762.pdf").err();
        assert!(matches!(err, Some(MindMapError::FileNotFound { .. })));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        let err = resolve_input(path.to_str().unwrap()).err();
        assert!(matches!(err, Some(MindMapError::NotPdfExtension { .. })));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"GIF89a").unwrap();
        let err = resolve_input(path.to_str().unwrap()).err();
        assert!(matches!(
            err,
            Some(MindMapError::NotAPdf { magic, .. }) if &magic == b"GIF8"
        ));
    }

    #[test]
    fn valid_header_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        assert_eq!(resolve_input(path.to_str().unwrap()).unwrap(), path);
    }
}
