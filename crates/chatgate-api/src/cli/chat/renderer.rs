//! Terminal rendering of assistant replies.
//!
//! `ChatRenderer` splits a reply with the same fence rules the HTML renderer
//! uses: prose goes through `termimad`, fenced code is highlighted with
//! `syntect` as 24-bit terminal escapes.

use chatgate_core::render::{Segment, split_fences};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

const THEME: &str = "base16-ocean.dark";

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);

        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes.remove(THEME).unwrap_or_default();

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render a complete reply.
    pub fn render(&self, reply: &str) -> String {
        let mut output = String::new();
        for segment in split_fences(reply) {
            match segment {
                Segment::Text(text) => {
                    output.push_str(&self.skin.term_text(text).to_string());
                }
                Segment::Code { language, code } => {
                    output.push_str(&self.highlight_code(code.trim(), language));
                }
            }
        }
        output
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut h = HighlightLines::new(syntax, &self.theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            console::style(format!("--- {lang} ---")).dim()
        ));

        for line in code.lines() {
            let escaped = escaped_or_raw(h.highlight_line(line, &self.syntax_set), line);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

/// Terminal escapes for a highlighted line, or the line untouched when the
/// highlighter fails on it.
fn escaped_or_raw(highlighted: Result<Vec<(Style, &str)>, syntect::Error>, line: &str) -> String {
    match highlighted {
        Ok(ranges) => as_24_bit_terminal_escaped(&ranges[..], false),
        Err(e) => {
            tracing::debug!(error = %e, "highlighting failed, showing raw line");
            line.to_string()
        }
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
