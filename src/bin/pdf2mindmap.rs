//! CLI binary for pdf2mindmap.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `MindMapConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2mindmap::{
    run, select_pdf, MindMapConfig, ModelReply, OutputFormat, ParseOutcome, ProgressCallback,
    RenderOutcome, RunProgressCallback, RunReport, Selection, Stage,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: prints one status line per stage and, unless
/// `--no-progress` is given, keeps a spinner running while a stage works.
struct CliProgressCallback {
    /// Spinner anchored at the bottom of the terminal, if enabled.
    bar: Option<ProgressBar>,
    /// Model name shown in the request status line.
    model: String,
    /// Who answers the request ("Ollama" or a provider name).
    source_label: String,
}

impl CliProgressCallback {
    fn new(spinner: bool, model: String, source_label: String) -> Arc<Self> {
        let bar = spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            model,
            source_label,
        })
    }

    /// Print a status line above the spinner (or plainly when there is none).
    fn line(&self, msg: String) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        match stage {
            Stage::Extract => self.line("🔍 Extraindo texto do PDF...".to_string()),
            Stage::Request => self.line(format!(
                "🤖 Gerando tópicos automáticos com {} via {}...",
                bold(&self.model),
                self.source_label
            )),
            Stage::Parse | Stage::Render => {}
        }
        if let Some(bar) = &self.bar {
            bar.set_prefix(stage.to_string());
            bar.set_message("…");
        }
    }

    fn on_stage_complete(&self, stage: Stage, summary: &str) {
        self.line(format!("  {} {:<8} {}", green("✓"), stage, dim(summary)));
    }

    fn on_reply(&self, reply: &ModelReply) {
        let print = || {
            println!("\n=== Tópicos gerados ===\n");
            println!("{}", reply.text);
        };
        match &self.bar {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ask for the PDF interactively, render mapa_mental.pdf
  pdf2mindmap

  # Give the PDF up front
  pdf2mindmap aula.pdf

  # Another local model, SVG output, custom root title
  pdf2mindmap --model llama3 --format svg --title "Redes" notas.pdf

  # Keep the DOT source next to the rendered map
  pdf2mindmap --emit-dot -o redes.pdf notas.pdf

  # Use a hosted provider instead of the local ollama executable
  pdf2mindmap --provider openai --model gpt-4.1-nano aula.pdf

  # Outline as JSON on stdout
  pdf2mindmap --json aula.pdf > outline.json

REQUIREMENTS:
  ollama     local model runner, invoked as `ollama run <model>` (default)
  dot        Graphviz layout engine, found on PATH; without it no map is drawn
  libpdfium  PDF text extraction; found via PDFIUM_LIB_PATH or the system

ENVIRONMENT VARIABLES:
  PDF2MINDMAP_MODEL      Override model name (default: codellama, or
                         gpt-4.1-nano with a provider)
  PDF2MINDMAP_PROVIDER   Use an edgequake-llm provider (openai, anthropic, gemini, ...)
  PDFIUM_LIB_PATH        Path to libpdfium, or the directory holding it
  RUST_LOG               Tracing filter, e.g. pdf2mindmap=debug
"#;

/// Turn a PDF into a mind map using a local LLM and Graphviz.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2mindmap",
    version,
    about = "Turn a PDF into a mind map using a local LLM and Graphviz",
    long_about = "Extract the text of a PDF, ask a language model for a \
topic outline, and draw it as a mind map with Graphviz. By default the model is run through \
the local `ollama` executable.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file path. Asked for interactively when omitted.
    input: Option<String>,

    /// Model name (passed to `ollama run`, or to the provider).
    #[arg(long, env = "PDF2MINDMAP_MODEL")]
    model: Option<String>,

    /// edgequake-llm provider to use instead of the local ollama executable.
    #[arg(long, env = "PDF2MINDMAP_PROVIDER")]
    provider: Option<String>,

    /// The ollama executable.
    #[arg(long, env = "PDF2MINDMAP_OLLAMA_BIN", default_value = "ollama")]
    ollama_bin: String,

    /// Label of the root node.
    #[arg(long, env = "PDF2MINDMAP_TITLE", default_value = "Meu Estudo")]
    title: String,

    /// Where to write the map. Default: mapa_mental.<format>
    #[arg(short, long, env = "PDF2MINDMAP_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendered file format.
    #[arg(long, env = "PDF2MINDMAP_FORMAT", value_enum, default_value = "pdf")]
    format: FormatArg,

    /// Characters of document text sent to the model.
    #[arg(long, env = "PDF2MINDMAP_MAX_CHARS", default_value_t = 4000)]
    max_chars: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2MINDMAP_PASSWORD")]
    password: Option<String>,

    /// Also write the DOT source next to the output.
    #[arg(long)]
    emit_dot: bool,

    /// Print the parsed outline as JSON on stdout instead of the reply.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF2MINDMAP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MINDMAP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MINDMAP_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Png,
    Svg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The status lines already tell the user what is happening; library
    // INFO logs only show up with --verbose or RUST_LOG.
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let chatty = !cli.quiet && !cli.json;

    // ── Select document ──────────────────────────────────────────────────
    let selection = {
        let stdin = io::stdin();
        select_pdf(cli.input.as_deref(), stdin.lock(), io::stderr())
            .context("Failed to read the PDF selection")?
    };
    let input = match selection {
        Selection::Selected(input) => input,
        Selection::Cancelled => {
            if !cli.quiet {
                eprintln!("{}", yellow("⚠️ Nenhum PDF selecionado. Saindo..."));
            }
            return Ok(());
        }
    };
    if chatty {
        eprintln!("📄 PDF selecionado: {}", bold(&input));
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut config = build_config(&cli)?;
    let progress = chatty.then(|| {
        let label = cli.provider.clone().unwrap_or_else(|| "Ollama".to_string());
        CliProgressCallback::new(!cli.no_progress, config.model().to_string(), label)
    });
    config.progress_callback = progress.clone().map(|cb| cb as ProgressCallback);

    // ── Run ──────────────────────────────────────────────────────────────
    let result = run(&input, &config).await;
    if let Some(cb) = &progress {
        cb.finish();
    }
    let report = result.context("Failed to build the mind map")?;

    {
        let stdout = io::stdout();
        write_stdout(&report, cli.json, cli.quiet, &mut stdout.lock())?;
    }

    if !cli.quiet {
        if let Some(message) = final_message(&report) {
            eprintln!("{message}");
        }
    }

    Ok(())
}

/// Write what belongs on stdout: the outline as JSON with `--json`, the
/// reply text with `--quiet`. Otherwise the progress callback has already
/// printed the reply and nothing is written.
fn write_stdout<W: Write>(report: &RunReport, json: bool, quiet: bool, out: &mut W) -> Result<()> {
    if json {
        let json = match &report.parse {
            ParseOutcome::Parsed(outline) => {
                serde_json::to_string_pretty(outline).context("Failed to serialise outline")?
            }
            ParseOutcome::EmptyOutline => "{}".to_string(),
        };
        writeln!(out, "{json}").context("Failed to write to stdout")?;
    } else if quiet {
        // Reply text still goes to stdout; it is the main product.
        writeln!(out, "{}", report.reply.text).context("Failed to write to stdout")?;
    }
    Ok(())
}

/// The closing status line for stderr, if the run has one.
fn final_message(report: &RunReport) -> Option<String> {
    match (&report.parse, &report.render) {
        (ParseOutcome::EmptyOutline, _) => Some(yellow(
            "⚠️ Não foi possível criar o mapa mental. Nenhum tópico detectado.",
        )),
        (_, Some(RenderOutcome::Rendered { path })) => Some(green(&format!(
            "✅ Mapa mental salvo como '{}'",
            path.display()
        ))),
        (_, Some(RenderOutcome::Skipped { reason } | RenderOutcome::Failed { reason })) => {
            Some(red(reason))
        }
        (_, None) => None,
    }
}

/// Map CLI args to `MindMapConfig`.
fn build_config(cli: &Cli) -> Result<MindMapConfig> {
    let format = OutputFormat::from(cli.format);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| format.default_output_path());

    let mut builder = MindMapConfig::builder()
        .ollama_bin(&cli.ollama_bin)
        .title(&cli.title)
        .format(format)
        .output_path(output)
        .max_excerpt_chars(cli.max_chars)
        .emit_dot(cli.emit_dot);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password);
    }

    builder.build().context("Invalid configuration")
}
