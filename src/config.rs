//! Configuration types for a PDF-to-mind-map run.
//!
//! Every knob lives in [`MindMapConfig`], built through
//! [`MindMapConfigBuilder`]. The defaults reproduce the plain behaviour of
//! the tool: ask `ollama run codellama` for an outline of the first 4000
//! characters, title the map "Meu Estudo", and write `mapa_mental.pdf` into
//! the current directory.

use crate::error::MindMapError;
use crate::pipeline::request::OutlineSource;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Model asked for the outline when none is configured.
pub const DEFAULT_MODEL: &str = "codellama";
/// Model used with a named provider when none is configured.
pub const DEFAULT_PROVIDER_MODEL: &str = "gpt-4.1-nano";
/// Executable used to run local models.
pub const DEFAULT_OLLAMA_BIN: &str = "ollama";
/// Label of the diagram's root node.
pub const DEFAULT_TITLE: &str = "Meu Estudo";
/// Stem of the rendered file.
pub const DEFAULT_OUTPUT_STEM: &str = "mapa_mental";
/// Characters of extracted text embedded in the prompt.
pub const DEFAULT_MAX_EXCERPT_CHARS: usize = 4000;

/// Configuration for a run.
///
/// Built via [`MindMapConfig::builder()`] or [`MindMapConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2mindmap::{MindMapConfig, OutputFormat};
///
/// let config = MindMapConfig::builder()
///     .model("llama3")
///     .title("Redes de Computadores")
///     .format(OutputFormat::Svg)
///     .build()
///     .unwrap();
/// assert_eq!(config.model(), "llama3");
/// ```
#[derive(Clone)]
pub struct MindMapConfig {
    /// Model name. `None` means [`DEFAULT_MODEL`].
    pub model: Option<String>,

    /// Executable spawned as `<ollama_bin> run <model>`. Default: `ollama`.
    pub ollama_bin: String,

    /// LLM provider name for edgequake-llm (e.g. "openai", "anthropic",
    /// "ollama"). When set, the outline comes from that provider instead of
    /// the local process.
    pub provider_name: Option<String>,

    /// Pre-built outline source. Takes precedence over `provider_name` and
    /// the local process.
    pub source: Option<Arc<dyn OutlineSource>>,

    /// Sampling temperature for provider calls. Default: 0.2.
    pub temperature: f32,

    /// Maximum tokens a provider may generate. Default: 2048.
    pub max_tokens: usize,

    /// Characters of document text embedded in the prompt. Default: 4000.
    pub max_excerpt_chars: usize,

    /// Replacement for the instructions placed before the excerpt.
    pub prompt_preamble: Option<String>,

    /// Root label of the diagram. Default: "Meu Estudo".
    pub title: String,

    /// Where the rendered diagram is written. Default: `mapa_mental.pdf`.
    /// Existing files are overwritten.
    pub output_path: PathBuf,

    /// Graphviz output format. Default: PDF.
    pub format: OutputFormat,

    /// Also write the DOT source next to the output. Default: false.
    pub emit_dot: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives stage events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            model: None,
            ollama_bin: DEFAULT_OLLAMA_BIN.to_string(),
            provider_name: None,
            source: None,
            temperature: 0.2,
            max_tokens: 2048,
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
            prompt_preamble: None,
            title: DEFAULT_TITLE.to_string(),
            output_path: OutputFormat::default().default_output_path(),
            format: OutputFormat::default(),
            emit_dot: false,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for MindMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MindMapConfig")
            .field("model", &self.model)
            .field("ollama_bin", &self.ollama_bin)
            .field("provider_name", &self.provider_name)
            .field("source", &self.source.as_ref().map(|s| s.label().to_string()))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_excerpt_chars", &self.max_excerpt_chars)
            .field("title", &self.title)
            .field("output_path", &self.output_path)
            .field("format", &self.format)
            .field("emit_dot", &self.emit_dot)
            .finish()
    }
}

impl MindMapConfig {
    /// Create a new builder for `MindMapConfig`.
    pub fn builder() -> MindMapConfigBuilder {
        MindMapConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model name in effect: the configured one, else `gpt-4.1-nano`
    /// for a named provider and `codellama` for the local executable.
    pub fn model(&self) -> &str {
        match (&self.model, &self.provider_name) {
            (Some(model), _) => model,
            (None, Some(_)) => DEFAULT_PROVIDER_MODEL,
            (None, None) => DEFAULT_MODEL,
        }
    }

    /// The prompt preamble in effect.
    pub fn prompt_preamble(&self) -> &str {
        self.prompt_preamble
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_PROMPT_PREAMBLE)
    }
}

/// Builder for [`MindMapConfig`].
#[derive(Debug)]
pub struct MindMapConfigBuilder {
    config: MindMapConfig,
}

impl MindMapConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn ollama_bin(mut self, bin: impl Into<String>) -> Self {
        self.config.ollama_bin = bin.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn source(mut self, source: Arc<dyn OutlineSource>) -> Self {
        self.config.source = Some(source);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_excerpt_chars(mut self, n: usize) -> Self {
        self.config.max_excerpt_chars = n;
        self
    }

    pub fn prompt_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.config.prompt_preamble = Some(preamble.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn emit_dot(mut self, v: bool) -> Self {
        self.config.emit_dot = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MindMapConfig, MindMapError> {
        let c = &self.config;
        if c.max_excerpt_chars == 0 {
            return Err(MindMapError::InvalidConfig(
                "Excerpt length must be ≥ 1 character".into(),
            ));
        }
        if c.title.trim().is_empty() {
            return Err(MindMapError::InvalidConfig("Title must not be empty".into()));
        }
        if c.ollama_bin.trim().is_empty() {
            return Err(MindMapError::InvalidConfig(
                "Ollama executable must not be empty".into(),
            ));
        }
        if c.output_path.as_os_str().is_empty() {
            return Err(MindMapError::InvalidConfig(
                "Output path must not be empty".into(),
            ));
        }
        if c.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(MindMapError::InvalidConfig("Model must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// File format Graphviz renders the diagram to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Png,
    Svg,
}

impl OutputFormat {
    /// Value passed to `dot -T`, also used as the file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }

    /// `mapa_mental.<ext>` in the current directory.
    pub fn default_output_path(self) -> PathBuf {
        PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{}", self.as_str()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plain_run() {
        let c = MindMapConfig::default();
        assert_eq!(c.model(), "codellama");
        assert_eq!(c.ollama_bin, "ollama");
        assert_eq!(c.title, "Meu Estudo");
        assert_eq!(c.output_path, PathBuf::from("mapa_mental.pdf"));
        assert_eq!(c.max_excerpt_chars, 4000);
        assert_eq!(c.format, OutputFormat::Pdf);
        assert!(c.provider_name.is_none());
    }

    #[test]
    fn provider_without_model_uses_provider_default() {
        let c = MindMapConfig::builder().provider_name("openai").build().unwrap();
        assert_eq!(c.model(), DEFAULT_PROVIDER_MODEL);

        let c = MindMapConfig::builder()
            .provider_name("openai")
            .model("gpt-4o")
            .build()
            .unwrap();
        assert_eq!(c.model(), "gpt-4o");
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = MindMapConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn builder_rejects_zero_excerpt() {
        let err = MindMapConfig::builder().max_excerpt_chars(0).build();
        assert!(matches!(err, Err(MindMapError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_blank_title() {
        assert!(MindMapConfig::builder().title("   ").build().is_err());
    }

    #[test]
    fn builder_rejects_blank_model() {
        assert!(MindMapConfig::builder().model("").build().is_err());
    }

    #[test]
    fn format_paths() {
        assert_eq!(
            OutputFormat::Svg.default_output_path(),
            PathBuf::from("mapa_mental.svg")
        );
        assert_eq!(OutputFormat::Png.to_string(), "png");
    }
}
