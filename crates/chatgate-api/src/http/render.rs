//! Server-side rendering of assistant replies for the browser page.
//!
//! Prose is HTML-escaped. Each code fence becomes a block with a language
//! header, a copy button carrying the raw code, and a syntect-highlighted
//! body using CSS classes (`hl-` prefix). The stylesheet for those classes is
//! generated once from a bundled theme and served at `/highlight.css`.

use chatgate_core::render::{Segment, split_fences};
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };
const THEME: &str = "base16-ocean.dark";

/// Renders reply text to sanitized HTML.
pub struct HtmlRenderer {
    syntax_set: SyntaxSet,
    theme_css: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_css = theme_set
            .themes
            .get(THEME)
            .and_then(|theme| css_for_theme_with_class_style(theme, CLASS_STYLE).ok())
            .unwrap_or_default();

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_css,
        }
    }

    /// Stylesheet for the highlight classes.
    pub fn theme_css(&self) -> &str {
        &self.theme_css
    }

    /// Render a reply. Never emits unescaped reply text.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        for segment in split_fences(text) {
            match segment {
                Segment::Text(prose) => {
                    out.push_str("<span class=\"prose\">");
                    out.push_str(&escape_html(prose));
                    out.push_str("</span>");
                }
                Segment::Code { language, code } => self.push_code_block(&mut out, language, code),
            }
        }
        out
    }

    fn push_code_block(&self, out: &mut String, language: &str, code: &str) {
        let lang = escape_html(language);
        out.push_str("<div class=\"code-block\"><div class=\"code-header\">");
        out.push_str(&format!("<span class=\"code-lang\">{lang}</span>"));
        out.push_str(&format!(
            "<button class=\"copy-btn\" type=\"button\" data-clipboard-text=\"{}\">copy</button>",
            escape_html(code)
        ));
        out.push_str("</div>");
        out.push_str(&format!("<pre><code class=\"language-{lang}\">"));
        out.push_str(&self.highlight(code.trim(), language));
        out.push_str("</code></pre></div>");
    }

    /// Highlight a code block into class-based spans.
    fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!(error = %e, lang, "highlighting failed, falling back to plain text");
                return escape_html(code);
            }
        }
        generator.finalize()
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
