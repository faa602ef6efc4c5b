//! Code-fence extraction.
//!
//! Splits assistant text into prose and fenced code blocks. A fence is
//! `` ```lang\n...``` `` where `lang` is optional and made of ASCII word
//! characters. Unterminated fences are left in the prose untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Language tag used when a fence has none.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```([A-Za-z0-9_]+)?\n([\s\S]*?)```").expect("fence regex is valid")
});

/// A piece of assistant text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Prose between fences, verbatim.
    Text(&'a str),
    /// A fenced block. `code` is the raw body between the opening line and
    /// the closing backticks, including any trailing newline.
    Code { language: &'a str, code: &'a str },
}

impl Segment<'_> {
    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }
}

/// Split `text` into segments in order. Empty prose between adjacent fences
/// is skipped.
pub fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FENCE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }
        let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str());
        segments.push(Segment::Code { language, code });
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }
    segments
}
