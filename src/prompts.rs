//! Prompt and diagnostic texts for the outline request.
//!
//! The prompt shows the model the exact bullet layout that
//! [`crate::parser`] understands, so the two must change together. The
//! diagnostics are what the requester hands to the parser in place of a
//! reply when the model could not be reached; none of them contain a bullet,
//! so they always parse to an empty outline.

/// Default instructions placed before the document excerpt.
///
/// Callers can override it via
/// [`crate::config::MindMapConfig::prompt_preamble`].
pub const DEFAULT_PROMPT_PREAMBLE: &str = "
Você é um assistente de estudos.
Leia o conteúdo abaixo e gere uma lista estruturada de tópicos e subtópicos
no seguinte formato:

* Tópico 1: Nome do tópico
    + Subtópico 1: Nome
    + Subtópico 2: Nome

* Tópico 2: Nome do tópico
    + Subtópico 1: Nome
    + Subtópico 2: Nome

Conteúdo:
";

/// Return at most the first `max_chars` characters of `text`.
///
/// The cut is a hard character cut, not a word or sentence boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the full prompt for `text`.
pub fn build_outline_prompt(preamble: &str, text: &str, max_chars: usize) -> String {
    format!("{preamble}{}\n", excerpt(text, max_chars))
}

/// Placeholder used when the model answered with nothing.
pub fn no_reply(label: &str) -> String {
    format!("⚠️ Nenhuma resposta foi gerada pelo {label}.")
}

/// Placeholder used when the model executable could not be found.
pub fn not_found(label: &str) -> String {
    format!("❌ {label} não encontrado. Certifique-se de que está instalado e no PATH.")
}

/// Placeholder used for every other invocation failure.
pub fn call_failed(label: &str, detail: &str) -> String {
    format!("❌ Erro ao chamar {label}: {detail}")
}
