//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for code
//! block highlighting. During streaming, tokens are printed raw; complete
//! content (node detail, tool summaries) is rendered as formatted
//! markdown. Entity-reference tokens are flattened to plain styled
//! labels BEFORE rendering -- the token syntax is never interpreted as
//! markup.

use std::io::Write;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

use mnema_types::node_ref::{Segment, split_node_refs};

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render complete markdown with highlighted code blocks.
    ///
    /// Code fences with a language tag go through syntect; everything
    /// else through termimad, after entity references are flattened.
    pub fn render_final(&self, markdown: &str) -> String {
        let markdown = flatten_node_refs(markdown);
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let rendered = self.skin.term_text(line);
                output.push_str(&format!("{rendered}"));
            }
        }

        // Handle unclosed code block
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Print a single streaming token (raw, no formatting).
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Print the footer after a response.
    ///
    /// Format: "| {time}s · {n} linked nodes"
    pub fn print_stats_footer(&self, response_ms: u64, linked_nodes: usize) {
        let seconds = response_ms as f64 / 1000.0;
        let mut footer = format!(
            "  {} {:.1}s",
            console::style("|").dim(),
            console::style(seconds).dim(),
        );
        if linked_nodes > 0 {
            footer.push_str(&format!(
                " {} {} linked node{}",
                console::style("\u{00b7}").dim(),
                console::style(linked_nodes).dim(),
                if linked_nodes == 1 { "" } else { "s" }
            ));
        }
        println!("{footer}");
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            console::style(format!("--- {lang} ---")).dim()
        ));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `[[node:<id>|<label>]]` tokens with `«label»`.
fn flatten_node_refs(text: &str) -> String {
    split_node_refs(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(t) => t.to_string(),
            Segment::Node(node_ref) => format!("\u{00ab}{}\u{00bb}", node_ref.label),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_node_refs() {
        assert_eq!(
            flatten_node_refs("see [[node:doc:1|Paper]] for details"),
            "see \u{00ab}Paper\u{00bb} for details"
        );
    }

    #[test]
    fn test_flatten_leaves_plain_text() {
        assert_eq!(flatten_node_refs("no refs here"), "no refs here");
    }

    #[test]
    fn test_render_final_flattens_refs() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("a [[node:concept:x|X]] b");
        assert!(out.contains('\u{00ab}'));
        assert!(!out.contains("[[node:"));
    }
}
