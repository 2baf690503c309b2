//! Pipeline stages for PDF-to-mind-map conversion.
//!
//! Each submodule implements exactly one step; [`crate::run`] strings them
//! together in order.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ request ──▶ parser ──▶ diagram ──▶ render
//!  (path)    (pdfium)   (model)     (outline)  (tree/DOT)  (dot)
//! ```
//!
//! 1. [`input`]   — validate the selected path
//! 2. [`extract`] — read each page's text layer; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`request`] — prompt the model; failures become diagnostic replies
//! 4. [`crate::parser`] — classify reply lines and fold them into an outline
//! 5. [`diagram`] — build the keyed tree and its DOT source
//! 6. [`render`]  — run Graphviz, or report why it was skipped

pub mod diagram;
pub mod extract;
pub mod input;
pub mod render;
pub mod request;
