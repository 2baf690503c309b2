//! Per-stage outcomes threaded through a run.
//!
//! Each stage that may "carry on anyway" reports which branch it took, so a
//! caller (or a test) can see that a selection was cancelled, that the model
//! only produced a diagnostic, or that rendering was skipped, instead of
//! inferring it from console output.

use crate::outline::Outline;
use std::path::PathBuf;

/// Result of asking the user for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A path was chosen.
    Selected(String),
    /// Nothing was chosen; the run ends here without error.
    Cancelled,
}

/// Text pulled out of the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Page texts joined with `\n` after each page that had any text.
    pub text: String,
    /// Pages in the document.
    pub page_count: usize,
    /// Pages that contributed text.
    pub pages_with_text: usize,
}

/// Result of the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Extracted(ExtractedText),
    /// No page had extractable text (scanned or empty document).
    /// The run continues with an empty excerpt.
    EmptyExtraction { page_count: usize },
}

impl ExtractOutcome {
    /// Build from joined text, choosing the variant by whether any text came out.
    pub fn from_text(extracted: ExtractedText) -> Self {
        if extracted.pages_with_text == 0 {
            Self::EmptyExtraction {
                page_count: extracted.page_count,
            }
        } else {
            Self::Extracted(extracted)
        }
    }

    /// The text to send to the model (empty for [`Self::EmptyExtraction`]).
    pub fn text(&self) -> &str {
        match self {
            Self::Extracted(e) => &e.text,
            Self::EmptyExtraction { .. } => "",
        }
    }

    pub fn page_count(&self) -> usize {
        match self {
            Self::Extracted(e) => e.page_count,
            Self::EmptyExtraction { page_count } => *page_count,
        }
    }
}

/// Where the text of a [`ModelReply`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOrigin {
    /// The model answered.
    Model,
    /// The model could not be reached or said nothing; the text is a
    /// placeholder message.
    Diagnostic,
}

/// Raw reply handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub origin: ReplyOrigin,
}

impl ModelReply {
    pub fn from_model(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ReplyOrigin::Model,
        }
    }

    pub fn diagnostic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: ReplyOrigin::Diagnostic,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        self.origin == ReplyOrigin::Diagnostic
    }
}

/// Result of parsing the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(Outline),
    /// No topic line was recognised; rendering is skipped.
    EmptyOutline,
}

impl ParseOutcome {
    pub fn from_outline(outline: Outline) -> Self {
        if outline.is_empty() {
            Self::EmptyOutline
        } else {
            Self::Parsed(outline)
        }
    }

    pub fn outline(&self) -> Option<&Outline> {
        match self {
            Self::Parsed(o) => Some(o),
            Self::EmptyOutline => None,
        }
    }
}

/// Result of the render stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The diagram was written to `path`.
    Rendered { path: PathBuf },
    /// The rendering toolchain is not installed; nothing was written.
    Skipped { reason: String },
    /// `dot` ran but failed, or an output file could not be written.
    Failed { reason: String },
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The path that was processed.
    pub input: String,
    pub extraction: ExtractOutcome,
    pub reply: ModelReply,
    pub parse: ParseOutcome,
    /// `None` when the outline was empty and rendering never started.
    pub render: Option<RenderOutcome>,
}
