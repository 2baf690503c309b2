//! Whole-run entry points.
//!
//! [`run`] walks the pipeline once, in order: resolve the input, extract
//! its text, ask for an outline, parse it, and render it when it is not
//! empty. Only input and extraction problems are fatal; every other stage
//! reports its branch in the returned [`RunReport`].
//!
//! [`outline_from_text`] and [`render_outline`] expose the middle and last
//! stages on their own, for callers that already have text or an outline.

use crate::config::MindMapConfig;
use crate::error::MindMapError;
use crate::outcome::{ExtractOutcome, ModelReply, ParseOutcome, RenderOutcome, RunReport};
use crate::outline::Outline;
use crate::parser::parse_outline;
use crate::pipeline::request::{self, OutlineSource};
use crate::pipeline::{extract, input, render};
use crate::progress::{RunProgressCallback, Stage};
use std::time::Instant;
use tracing::{debug, info};

/// Turn the PDF at `input` into a rendered mind map.
///
/// # Errors
/// Returns `Err(MindMapError)` only for fatal problems:
/// - file not found, not a `.pdf`, not a PDF
/// - unreadable, corrupt or encrypted document, or pdfium unavailable
/// - a named provider that cannot be created
///
/// A model that cannot be reached, an empty outline, a missing `dot` and a
/// failed render are all reported through the [`RunReport`] instead.
pub async fn run(input: impl AsRef<str>, config: &MindMapConfig) -> Result<RunReport, MindMapError> {
    let total_start = Instant::now();
    let input_str = input.as_ref();
    info!("Starting run: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input_str)?;

    // ── Step 2: Get outline source ───────────────────────────────────────
    let source = request::resolve_source(config)?;

    // ── Step 3: Extract text ─────────────────────────────────────────────
    notify(config, |cb| cb.on_stage_start(Stage::Extract));
    let extraction = extract::extract_text(&pdf_path, config.password.as_deref()).await?;
    let summary = match &extraction {
        ExtractOutcome::Extracted(e) => format!(
            "{} chars from {}/{} pages",
            e.text.chars().count(),
            e.pages_with_text,
            e.page_count
        ),
        ExtractOutcome::EmptyExtraction { page_count } => {
            format!("no text in {page_count} pages")
        }
    };
    notify(config, |cb| cb.on_stage_complete(Stage::Extract, &summary));

    // ── Steps 4–5: Request and parse outline ─────────────────────────────
    let (reply, parse) = outline_from_text(extraction.text(), source.as_ref(), config).await;

    // ── Step 6: Render ───────────────────────────────────────────────────
    let render = match parse.outline() {
        Some(outline) => Some(render_outline(outline, config).await),
        None => {
            info!("Outline is empty; nothing to render");
            None
        }
    };

    info!("Run complete in {}ms", total_start.elapsed().as_millis());

    Ok(RunReport {
        input: input_str.to_string(),
        extraction,
        reply,
        parse,
        render,
    })
}

/// Ask `source` for an outline of `text` and parse the reply.
///
/// Never fails: an unreachable model yields a diagnostic reply and an
/// empty outline.
pub async fn outline_from_text(
    text: &str,
    source: &dyn OutlineSource,
    config: &MindMapConfig,
) -> (ModelReply, ParseOutcome) {
    notify(config, |cb| cb.on_stage_start(Stage::Request));
    let request_start = Instant::now();
    let reply = request::request_outline(text, source, config).await;
    debug!(
        "Reply: {} chars in {}ms ({:?})",
        reply.text.chars().count(),
        request_start.elapsed().as_millis(),
        reply.origin
    );
    let summary = if reply.is_diagnostic() {
        "no usable reply".to_string()
    } else {
        format!("{} chars", reply.text.chars().count())
    };
    notify(config, |cb| cb.on_stage_complete(Stage::Request, &summary));
    notify(config, |cb| cb.on_reply(&reply));

    notify(config, |cb| cb.on_stage_start(Stage::Parse));
    let outline = parse_outline(&reply.text);
    let summary = format!(
        "{} topics, {} subtopics",
        outline.len(),
        outline.subtopic_count()
    );
    info!("Parsed {}", summary);
    let parse = ParseOutcome::from_outline(outline);
    notify(config, |cb| cb.on_stage_complete(Stage::Parse, &summary));

    (reply, parse)
}

/// Render `outline` under `config.title`.
pub async fn render_outline(outline: &Outline, config: &MindMapConfig) -> RenderOutcome {
    notify(config, |cb| cb.on_stage_start(Stage::Render));
    let outcome = render::render_mind_map(&config.title, outline, config).await;
    let summary = match &outcome {
        RenderOutcome::Rendered { path } => format!("written to {}", path.display()),
        RenderOutcome::Skipped { .. } => "skipped".to_string(),
        RenderOutcome::Failed { .. } => "failed".to_string(),
    };
    notify(config, |cb| cb.on_stage_complete(Stage::Render, &summary));
    notify(config, |cb| cb.on_render(&outcome));
    outcome
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(input: impl AsRef<str>, config: &MindMapConfig) -> Result<RunReport, MindMapError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| MindMapError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run(input, config))
}

fn notify(config: &MindMapConfig, event: impl FnOnce(&dyn RunProgressCallback)) {
    if let Some(ref cb) = config.progress_callback {
        event(cb.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::request::SourceFailure;
    use async_trait::async_trait;

    struct Silent;

    #[async_trait]
    impl OutlineSource for Silent {
        fn label(&self) -> &str {
            "Silent"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, SourceFailure> {
            Ok("   \n".to_string())
        }
    }

    #[test]
    fn run_sync_surfaces_input_errors() {
        let err = run_sync("/no/such/dir/aula.pdf", &MindMapConfig::default()).unwrap_err();
        assert!(matches!(err, MindMapError::FileNotFound { .. }), "{err:?}");
    }

    #[test]
    fn whitespace_reply_parses_to_empty_outline() {
        let config = MindMapConfig::default();
        let (reply, parse) = tokio_test::block_on(outline_from_text("texto", &Silent, &config));
        assert_eq!(reply.text, "⚠️ Nenhuma resposta foi gerada pelo Silent.");
        assert_eq!(parse, ParseOutcome::EmptyOutline);
    }
}
