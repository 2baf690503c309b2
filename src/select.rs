//! Document selection.
//!
//! A path given up front (the CLI's positional argument) is taken as is.
//! Otherwise the user is asked for one; only `.pdf` files are accepted, and
//! an empty answer (or end of input) cancels the run.

use crate::outcome::Selection;
use crate::pipeline::input::has_pdf_extension;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Prompt shown when asking for a document.
pub const SELECT_PROMPT: &str = "Selecione o PDF (caminho, Enter para cancelar): ";

/// Choose the document to process.
///
/// `preselected` wins when present and non-blank. Otherwise lines are read
/// from `input` until one names a `.pdf` file; `output` receives the
/// prompt and any rejection notices.
pub fn select_pdf<R, W>(
    preselected: Option<&str>,
    mut input: R,
    mut output: W,
) -> io::Result<Selection>
where
    R: BufRead,
    W: Write,
{
    if let Some(choice) = preselected.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(Selection::Selected(choice.to_string()));
    }

    loop {
        write!(output, "{SELECT_PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Selection::Cancelled);
        }

        let choice = unquote(line.trim());
        if choice.is_empty() {
            return Ok(Selection::Cancelled);
        }
        if has_pdf_extension(Path::new(choice)) {
            return Ok(Selection::Selected(choice.to_string()));
        }
        writeln!(output, "Apenas arquivos .pdf são aceitos: {choice}")?;
    }
}

/// Strip one pair of matching quotes, as terminals add when a file is dropped in.
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(pre: Option<&str>, typed: &str) -> (Selection, String) {
        let mut out = Vec::new();
        let sel = select_pdf(pre, typed.as_bytes(), &mut out).unwrap();
        (sel, String::from_utf8(out).unwrap())
    }

    #[test]
    fn preselected_path_skips_prompt() {
        let (sel, out) = select(Some(" notas.pdf "), "");
        assert_eq!(sel, Selection::Selected("notas.pdf".into()));
        assert!(out.is_empty());
    }

    #[test]
    fn blank_preselection_falls_back_to_prompt() {
        let (sel, out) = select(Some("  "), "aula.pdf\n");
        assert_eq!(sel, Selection::Selected("aula.pdf".into()));
        assert!(out.starts_with(SELECT_PROMPT));
    }

    #[test]
    fn empty_answer_cancels() {
        assert_eq!(select(None, "\n").0, Selection::Cancelled);
        assert_eq!(select(None, "").0, Selection::Cancelled);
    }

    #[test]
    fn non_pdf_is_rejected_then_reprompted() {
        let (sel, out) = select(None, "foto.png\n'Meus Docs/aula.PDF'\n");
        assert_eq!(sel, Selection::Selected("Meus Docs/aula.PDF".into()));
        assert!(out.contains("Apenas arquivos .pdf"));
        assert_eq!(out.matches(SELECT_PROMPT).count(), 2);
    }

    #[test]
    fn extensionless_urls_are_rejected() {
        let (sel, out) = select(None, "https://arxiv.org/pdf/1706.03762\n");
        assert_eq!(sel, Selection::Cancelled);
        assert!(out.contains("Apenas arquivos .pdf"));
    }
}
