use std::sync::LazyLock;

use regex::Regex;

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0E-\x1F\x7F-\x9F]").expect("control char pattern is valid")
});

/// `(cid:123)` glyph markers and stray `<< ... >>` dictionaries.
static PDF_ARTIFACTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(cid:\d+\)|<<[^>]*>>").expect("artifact pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static EXCESS_LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n").expect("line break pattern is valid"));

/// Cleans extracted text before it is stored or sent for analysis.
///
/// The result is a single line: every whitespace run, line breaks included,
/// becomes one space. Any run of three line breaks that survives is cut to a
/// blank line. Control characters and PDF glyph markers are dropped and
/// curly quotes are straightened.
pub fn normalize_text(raw: &str) -> String {
    let text = CONTROL_CHARS.replace_all(raw, "");
    let text = PDF_ARTIFACTS.replace_all(&text, "");
    let text = straighten_quotes(&text);
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    let text = EXCESS_LINE_BREAKS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn straighten_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect()
}
