use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

use super::{ExtractionStrategy, MIN_STRATEGY_CHARS};

/// A parenthesized PDF string literal; escaped parentheses stay inside.
static LITERAL_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\(((?:[^()\\]|\\.)+)\)").expect("literal pattern is valid")
});

static STREAM_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)stream\s*(.*?)\s*endstream").expect("stream pattern is valid")
});

/// Lossy last resort: reads the file as a binary string and pulls out
/// whatever looks like text, without understanding the document structure.
/// Tries string literals first, then printable bytes inside stream bodies.
pub struct HeuristicScanStrategy;

impl ExtractionStrategy for HeuristicScanStrategy {
    fn name(&self) -> &'static str {
        "heuristic_scan"
    }

    fn attempt(&self, bytes: &[u8]) -> Result<String> {
        let binary: String = bytes.iter().map(|&b| b as char).collect();

        let literals: Vec<String> = LITERAL_STRING
            .captures_iter(&binary)
            .map(|caps| unescape_literal(&caps[1]))
            .collect();
        let text = collapse_whitespace(&literals.join(" "));
        if text.chars().count() >= MIN_STRATEGY_CHARS {
            return Ok(text);
        }

        let streams: Vec<String> = STREAM_BODY
            .captures_iter(&binary)
            .map(|caps| {
                caps[1]
                    .chars()
                    .map(|c| if (' '..='~').contains(&c) { c } else { ' ' })
                    .collect()
            })
            .collect();
        let text = collapse_whitespace(&streams.join(" "));
        if text.chars().count() >= MIN_STRATEGY_CHARS {
            return Ok(text);
        }

        bail!("no readable text found in raw PDF bytes")
    }
}

/// Resolves the escapes allowed inside a PDF literal string. Line-break
/// escapes become spaces since the result is flattened anyway.
fn unescape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'r' | 't' | 'b' | 'f') => out.push(' '),
            Some('\n') => {}
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if let Some(decoded) = char::from_u32(code & 0xFF) {
                    out.push(decoded);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::pdf::fixtures::build_pdf;

    #[test]
    fn test_reads_literals_from_uncompressed_pdf() {
        let pdf = build_pdf(&[&[
            "Jane Doe",
            "Principal Engineer, twelve years across payments and search",
        ]]);
        let text = HeuristicScanStrategy.attempt(&pdf).unwrap();
        assert!(text.contains("Jane Doe Principal Engineer, twelve years"));
    }

    #[test]
    fn test_reads_literals_from_broken_file() {
        let bytes = b"%PDF-1.4 garbage xref missing \
            BT (Jane Doe) Tj (Backend developer with Rust and Postgres) Tj \
            (and seven years at Shopify\\)) Tj ET";
        let text = HeuristicScanStrategy.attempt(bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe Backend developer with Rust and Postgres and seven years at Shopify)"
        );
    }

    #[test]
    fn test_falls_back_to_stream_bodies() {
        let bytes = b"1 0 obj << /Length 80 >> stream\n\
            Curriculum vitae\x01\x02 of a data engineer who knows Spark and Airflow well\n\
            endstream endobj";
        let text = HeuristicScanStrategy.attempt(bytes).unwrap();
        assert_eq!(
            text,
            "Curriculum vitae of a data engineer who knows Spark and Airflow well"
        );
    }

    #[test]
    fn test_nothing_readable_fails() {
        assert!(HeuristicScanStrategy.attempt(&[0u8; 512]).is_err());
    }

    #[test]
    fn test_unescape_literal() {
        assert_eq!(unescape_literal(r"a\(b\)c"), "a(b)c");
        assert_eq!(unescape_literal(r"line\nbreak"), "line break");
        assert_eq!(unescape_literal(r"caf\351"), "café");
        assert_eq!(unescape_literal(r"back\\slash"), "back\\slash");
    }
}
