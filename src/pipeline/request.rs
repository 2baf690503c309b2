//! Outline request: ask a model to structure the document text.
//!
//! Where the reply comes from is abstracted behind [`OutlineSource`]:
//!
//! * [`OllamaProcess`] (default) spawns `ollama run <model>`, writes the
//!   prompt to its stdin and reads the whole of stdout.
//! * [`ProviderSource`] sends the prompt through any edgequake-llm provider.
//! * Tests plug in canned sources.
//!
//! [`request_outline`] never fails. A source error or an empty answer is
//! turned into a diagnostic [`ModelReply`], which the parser treats like any
//! other text without bullets. There are no retries and no timeout.

use crate::config::MindMapConfig;
use crate::error::MindMapError;
use crate::outcome::ModelReply;
use crate::prompts::{build_outline_prompt, call_failed, no_reply, not_found};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::process::Stdio;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Why a source produced no text.
#[derive(Debug, Error)]
pub enum SourceFailure {
    /// The executable behind the source could not be located.
    #[error("executable '{program}' not found")]
    NotFound { program: String },

    /// Anything else that went wrong while invoking the model.
    #[error("{0}")]
    Invocation(String),
}

/// Something that can answer a prompt with free text.
#[async_trait]
pub trait OutlineSource: Send + Sync {
    /// Human name used in diagnostics and logs, e.g. "Ollama".
    fn label(&self) -> &str;

    /// Model the source asks, when it knows.
    fn model(&self) -> Option<&str> {
        None
    }

    /// Send `prompt` and return the raw answer.
    async fn complete(&self, prompt: &str) -> Result<String, SourceFailure>;
}

// ── Local model process ──────────────────────────────────────────────────

/// Runs `<program> run <model>` and talks to it over stdin/stdout.
///
/// The exit status is not inspected: only the captured output matters.
#[derive(Debug, Clone)]
pub struct OllamaProcess {
    program: String,
    model: String,
}

impl OllamaProcess {
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl OutlineSource for OllamaProcess {
    fn label(&self) -> &str {
        "Ollama"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.model)
    }

    async fn complete(&self, prompt: &str) -> Result<String, SourceFailure> {
        debug!("Spawning `{} run {}`", self.program, self.model);

        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceFailure::NotFound {
                        program: self.program.clone(),
                    }
                } else {
                    SourceFailure::Invocation(e.to_string())
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SourceFailure::Invocation("child stdin unavailable".into()))?;

        // Feed stdin while draining stdout/stderr so neither pipe can fill up.
        let feed = async move {
            let result = stdin.write_all(prompt.as_bytes()).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        if let Err(e) = fed {
            warn!("Could not write the whole prompt to {}: {}", self.program, e);
        }
        let output = output.map_err(|e| SourceFailure::Invocation(e.to_string()))?;

        debug!(
            "{} exited with {} ({} bytes stdout, {} bytes stderr)",
            self.program,
            output.status,
            output.stdout.len(),
            output.stderr.len()
        );
        if !output.stderr.is_empty() {
            debug!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ── edgequake-llm provider ───────────────────────────────────────────────

/// Sends the prompt as a single user message to an edgequake-llm provider.
pub struct ProviderSource {
    provider: Arc<dyn LLMProvider>,
    label: String,
    options: CompletionOptions,
}

impl ProviderSource {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        label: impl Into<String>,
        config: &MindMapConfig,
    ) -> Self {
        Self {
            provider,
            label: label.into(),
            options: CompletionOptions {
                temperature: Some(config.temperature),
                max_tokens: Some(config.max_tokens),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl OutlineSource for ProviderSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn model(&self) -> Option<&str> {
        Some(self.provider.model())
    }

    async fn complete(&self, prompt: &str) -> Result<String, SourceFailure> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| SourceFailure::Invocation(e.to_string()))?;
        debug!(
            "{}: {} input tokens, {} output tokens",
            self.label, response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

// ── Source resolution ────────────────────────────────────────────────────

/// Pick the outline source from most-specific to least-specific:
///
/// 1. a pre-built source in `config.source`;
/// 2. a named edgequake-llm provider (`config.provider_name`) with the
///    configured model, or `gpt-4.1-nano`;
/// 3. the local `ollama` process.
pub fn resolve_source(config: &MindMapConfig) -> Result<Arc<dyn OutlineSource>, MindMapError> {
    if let Some(ref source) = config.source {
        return Ok(Arc::clone(source));
    }

    if let Some(ref name) = config.provider_name {
        let provider = ProviderFactory::create_llm_provider(name, config.model()).map_err(|e| {
            MindMapError::ProviderNotConfigured {
                provider: name.clone(),
                hint: format!("{e}"),
            }
        })?;
        return Ok(Arc::new(ProviderSource::new(provider, name.clone(), config)));
    }

    Ok(Arc::new(OllamaProcess::new(
        config.ollama_bin.clone(),
        config.model(),
    )))
}

/// Ask `source` for an outline of `text`.
///
/// Only the first `config.max_excerpt_chars` characters of `text` are sent.
pub async fn request_outline(
    text: &str,
    source: &dyn OutlineSource,
    config: &MindMapConfig,
) -> ModelReply {
    let prompt = build_outline_prompt(config.prompt_preamble(), text, config.max_excerpt_chars);
    let label = source.label();
    info!("Requesting outline from {} ({} prompt chars)", label, prompt.chars().count());

    match source.complete(&prompt).await {
        Ok(answer) => {
            let answer = answer.trim();
            if answer.is_empty() {
                warn!("{} returned an empty answer", label);
                ModelReply::diagnostic(no_reply(label))
            } else {
                ModelReply::from_model(answer)
            }
        }
        Err(SourceFailure::NotFound { program }) => {
            warn!("{} executable '{}' not found", label, program);
            ModelReply::diagnostic(not_found(label))
        }
        Err(SourceFailure::Invocation(detail)) => {
            warn!("{} invocation failed: {}", label, detail);
            ModelReply::diagnostic(call_failed(label, &detail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ReplyOrigin;
    use std::sync::Mutex;

    /// Returns a fixed result and remembers the prompt it was given.
    struct Canned {
        result: fn() -> Result<String, SourceFailure>,
        seen: Mutex<Option<String>>,
    }

    impl Canned {
        fn new(result: fn() -> Result<String, SourceFailure>) -> Self {
            Self {
                result,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl OutlineSource for Canned {
        fn label(&self) -> &str {
            "Canned"
        }

        async fn complete(&self, prompt: &str) -> Result<String, SourceFailure> {
            *self.seen.lock().unwrap() = Some(prompt.to_string());
            (self.result)()
        }
    }

    #[tokio::test]
    async fn answer_is_trimmed() {
        let source = Canned::new(|| Ok("\n  * Tópico 1: A  \n\n".into()));
        let reply = request_outline("texto", &source, &MindMapConfig::default()).await;
        assert_eq!(reply, ModelReply::from_model("* Tópico 1: A"));
    }

    #[tokio::test]
    async fn blank_answer_becomes_diagnostic() {
        let source = Canned::new(|| Ok("   \n".into()));
        let reply = request_outline("texto", &source, &MindMapConfig::default()).await;
        assert_eq!(reply.origin, ReplyOrigin::Diagnostic);
        assert_eq!(reply.text, "⚠️ Nenhuma resposta foi gerada pelo Canned.");
    }

    #[tokio::test]
    async fn failures_become_diagnostics() {
        let source = Canned::new(|| Err(SourceFailure::Invocation("boom".into())));
        let reply = request_outline("texto", &source, &MindMapConfig::default()).await;
        assert!(reply.is_diagnostic());
        assert_eq!(reply.text, "❌ Erro ao chamar Canned: boom");
    }

    #[tokio::test]
    async fn prompt_carries_hard_cut_excerpt() {
        let source = Canned::new(|| Ok(String::new()));
        let config = MindMapConfig::builder().max_excerpt_chars(5).build().unwrap();
        request_outline("abcdefghij", &source, &config).await;
        let prompt = source.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.ends_with("Conteúdo:\nabcde\n"), "{prompt:?}");
    }

    #[tokio::test]
    async fn custom_preamble_is_used() {
        let source = Canned::new(|| Ok(String::new()));
        let config = MindMapConfig::builder()
            .prompt_preamble("Resuma:\n")
            .build()
            .unwrap();
        request_outline("xyz", &source, &config).await;
        let prompt = source.seen.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, "Resuma:\nxyz\n");
    }

    #[tokio::test]
    async fn missing_executable_yields_not_found_diagnostic() {
        let source = OllamaProcess::new("pdf2mindmap-no-such-binary-7f3a", "codellama");
        let reply = request_outline("texto", &source, &MindMapConfig::default()).await;
        assert_eq!(
            reply,
            ModelReply::diagnostic(
                "❌ Ollama não encontrado. Certifique-se de que está instalado e no PATH."
            )
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_process_yields_no_reply_diagnostic() {
        // `true run codellama` ignores its arguments and prints nothing.
        let source = OllamaProcess::new("true", "codellama");
        let reply = request_outline("texto", &source, &MindMapConfig::default()).await;
        assert_eq!(
            reply,
            ModelReply::diagnostic("⚠️ Nenhuma resposta foi gerada pelo Ollama.")
        );
    }

    #[test]
    fn default_config_resolves_to_local_process() {
        let source = resolve_source(&MindMapConfig::default()).unwrap();
        assert_eq!(source.label(), "Ollama");
        assert_eq!(source.model(), Some("codellama"));
    }

    #[test]
    fn provider_without_model_gets_provider_default() {
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        let config = MindMapConfig::builder().provider_name("openai").build().unwrap();
        let source = resolve_source(&config).unwrap();
        assert_eq!(source.label(), "openai");
        assert_eq!(source.model(), Some("gpt-4.1-nano"));
    }

    #[test]
    fn explicit_source_wins() {
        let canned: Arc<dyn OutlineSource> = Arc::new(Canned::new(|| Ok(String::new())));
        let config = MindMapConfig::builder()
            .source(canned)
            .provider_name("openai")
            .build()
            .unwrap();
        assert_eq!(resolve_source(&config).unwrap().label(), "Canned");
    }
}
