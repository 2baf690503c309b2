//! Error types for the pdf2mindmap library.
//!
//! Only conditions that stop the run outright live here. Everything the
//! pipeline can degrade around (a cancelled selection, a model that produced
//! nothing useful, a missing `dot` binary) is reported through the stage
//! outcomes in [`crate::outcome`] instead, so callers can see each
//! "continue anyway" branch explicitly.
//!
//! Text extraction is fail-fast: an unreadable or corrupt PDF surfaces as
//! [`MindMapError`] rather than as an empty extraction.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2mindmap library.
#[derive(Debug, Error)]
pub enum MindMapError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("No such PDF: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Cannot read '{path}': permission denied")]
    PermissionDenied { path: PathBuf },

    /// The selected file does not carry a `.pdf` extension.
    #[error("'{path}' is not a .pdf file")]
    NotPdfExtension { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("'{path}' does not start with a PDF header (got {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("'{path}' is password protected; pass it with --password")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("The password given for '{path}' was rejected")]
    WrongPassword { path: PathBuf },

    /// pdfium could not read the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. Either:\n\
  • install it where the system loader can find it, or\n\
  • set PDFIUM_LIB_PATH=/path/to/libpdfium (file or containing directory).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Model errors ──────────────────────────────────────────────────────
    /// The configured provider could not be created (missing API key etc.).
    #[error("Cannot use provider '{provider}': {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Unexpected failure: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_required_mentions_flag() {
        let e = MindMapError::PasswordRequired {
            path: PathBuf::from("/tmp/locked.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("--password"), "got: {msg}");
        assert!(msg.contains("locked.pdf"), "got: {msg}");
    }

    #[test]
    fn extraction_failed_display() {
        let e = MindMapError::ExtractionFailed {
            page: 4,
            detail: "bad text object".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(e.to_string().contains("bad text object"));
    }

    #[test]
    fn binding_failed_mentions_env_var() {
        let e = MindMapError::PdfiumBindingFailed("libpdfium.so: not found".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }
}
