//! # pdf2mindmap
//!
//! Turn a PDF into a mind map: extract its text, ask a language model for a
//! topic outline, and draw that outline with Graphviz.
//!
//! ## Why this crate?
//!
//! Study notes and lecture slides usually arrive as PDFs, and the quickest
//! way to review one is a picture of its structure. A local model is good at
//! naming the topics of a text but bad at drawing; Graphviz is the reverse.
//! This crate sits between the two: it asks for the outline in a fixed,
//! line-oriented template, parses it leniently, and hands the result to
//! `dot` as a rooted tree.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the selected file is a readable PDF
//!  ├─ 2. Extract  per-page text via pdfium (spawn_blocking)
//!  ├─ 3. Request  prompt a local Ollama model (or any edgequake-llm provider)
//!  ├─ 4. Parse    "* Tópico" / "+ Subtópico" lines → ordered outline
//!  ├─ 5. Diagram  root → topics → subtopics, positional node keys
//!  └─ 6. Render   `dot -Tpdf -o mapa_mental.pdf`
//! ```
//!
//! Only steps 1 and 2 can fail the run. A model that cannot be reached, an
//! empty outline or a missing Graphviz install are reported in the
//! [`RunReport`] and the run still completes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2mindmap::{run, MindMapConfig, RenderOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Runs `ollama run codellama` and `dot` from PATH
//!     let config = MindMapConfig::default();
//!     let report = run("aula.pdf", &config).await?;
//!     println!("{}", report.reply.text);
//!     if let Some(RenderOutcome::Rendered { path }) = &report.render {
//!         eprintln!("mind map: {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2mindmap` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2mindmap = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod outcome;
pub mod outline;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;
pub mod select;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{MindMapConfig, MindMapConfigBuilder, OutputFormat};
pub use error::MindMapError;
pub use outcome::{
    ExtractOutcome, ExtractedText, ModelReply, ParseOutcome, RenderOutcome, ReplyOrigin,
    RunReport, Selection,
};
pub use outline::Outline;
pub use parser::{classify_line, parse_outline, reply_lines, OutlineLine};
pub use pipeline::diagram::{to_dot, DiagramNode, DiagramTree};
pub use pipeline::extract::extract_text;
pub use pipeline::render::render_mind_map;
pub use pipeline::request::{
    request_outline, resolve_source, OllamaProcess, OutlineSource, ProviderSource, SourceFailure,
};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback, Stage};
pub use run::{outline_from_text, render_outline, run, run_sync};
pub use select::select_pdf;
