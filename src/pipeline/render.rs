//! Diagram rendering: lay out the mind map with Graphviz `dot`.
//!
//! The `dot` executable is looked up on `PATH` before anything is written;
//! when it is missing the stage reports [`RenderOutcome::Skipped`]. Any
//! failure after that point (spawn error, non-zero exit, unwritable DOT
//! file) is reported as [`RenderOutcome::Failed`]. Neither ends the run.
//!
//! The graph is printed and piped to `dot` by graphviz-rust on a blocking
//! thread; the output file is overwritten without asking.

use crate::config::{MindMapConfig, OutputFormat};
use crate::outcome::RenderOutcome;
use crate::outline::Outline;
use crate::pipeline::diagram::DiagramTree;
use graphviz_rust::cmd::{CommandArg, Format};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The Graphviz layout program graphviz-rust runs.
pub const DOT_PROGRAM: &str = "dot";

/// Find `program` the way a shell would.
///
/// A name containing a path separator is checked directly; a bare name is
/// searched in each `PATH` entry (with `.exe` appended on Windows).
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    find_in_path(program, &path_var)
}

fn find_in_path(program: &str, path_var: &OsString) -> Option<PathBuf> {
    let names: Vec<String> = if cfg!(windows) {
        vec![program.to_string(), format!("{program}.exe")]
    } else {
        vec![program.to_string()]
    };

    std::env::split_paths(path_var)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|full| full.is_file())
}

/// Render `outline` under `title` to `config.output_path`.
pub async fn render_mind_map(
    title: &str,
    outline: &Outline,
    config: &MindMapConfig,
) -> RenderOutcome {
    render_with(find_executable(DOT_PROGRAM), title, outline, config).await
}

/// Render with an already-resolved `dot` (or none).
async fn render_with(
    dot_path: Option<PathBuf>,
    title: &str,
    outline: &Outline,
    config: &MindMapConfig,
) -> RenderOutcome {
    let Some(dot_path) = dot_path else {
        warn!("'{}' not found on PATH; skipping render", DOT_PROGRAM);
        return RenderOutcome::Skipped {
            reason: "❌ Graphviz não encontrado. Instale Graphviz e adicione 'bin' ao PATH."
                .to_string(),
        };
    };

    let tree = DiagramTree::from_outline(title, outline);
    debug!(
        "Diagram has {} nodes; using {}",
        tree.node_count(),
        dot_path.display()
    );
    let graph = tree.to_graph();

    if config.emit_dot {
        let dot_file = config.output_path.with_extension("dot");
        let source = graph.print(&mut PrinterContext::default());
        if let Err(e) = tokio::fs::write(&dot_file, source).await {
            return failed(format!("{}: {}", dot_file.display(), e));
        }
        info!("DOT source written to {}", dot_file.display());
    }

    let args = vec![
        output_format(config.format).into(),
        CommandArg::Output(config.output_path.to_string_lossy().into_owned()),
    ];
    let rendered = tokio::task::spawn_blocking(move || {
        graphviz_rust::exec(graph, &mut PrinterContext::default(), args)
    })
    .await;

    match rendered {
        Ok(Ok(_)) => {
            info!("Mind map written to {}", config.output_path.display());
            RenderOutcome::Rendered {
                path: config.output_path.clone(),
            }
        }
        Ok(Err(e)) => failed(e.to_string()),
        Err(e) => failed(format!("render task panicked: {e}")),
    }
}

fn output_format(format: OutputFormat) -> Format {
    match format {
        OutputFormat::Pdf => Format::Pdf,
        OutputFormat::Png => Format::Png,
        OutputFormat::Svg => Format::Svg,
    }
}

fn failed(detail: String) -> RenderOutcome {
    warn!("Render failed: {}", detail);
    RenderOutcome::Failed {
        reason: format!("❌ Erro ao gerar o mapa mental: {detail}"),
    }
}
