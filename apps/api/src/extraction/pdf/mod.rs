//! PDF text extraction as an ordered chain of strategies.
//!
//! Default order: structural parse → heuristic byte scan → rendered pages.
//! The first strategy whose output has at least `MIN_STRATEGY_CHARS`
//! non-whitespace-trimmed characters, and reads as text rather than
//! undecoded glyph codes, wins; the rest never run.

pub mod heuristic;
pub mod rendered;
pub mod structural;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::extraction::ExtractionError;

pub use heuristic::HeuristicScanStrategy;
pub use rendered::RenderedPageStrategy;
pub use structural::StructuralStrategy;

pub const MIN_STRATEGY_CHARS: usize = 50;

/// Largest share of garbled characters (among non-whitespace ones) an
/// output may carry and still be accepted.
pub const MAX_GARBLED_SHARE: f64 = 0.1;

/// One way of pulling text out of PDF bytes. Implement this to add a
/// strategy without touching the chain or its callers.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PdfExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        for strategy in &self.strategies {
            debug!("Trying PDF strategy '{}'", strategy.name());
            match strategy.attempt(bytes) {
                Ok(text) => {
                    let chars = text.trim().chars().count();
                    if chars < MIN_STRATEGY_CHARS {
                        warn!(
                            "PDF strategy '{}' yielded only {chars} characters",
                            strategy.name()
                        );
                        continue;
                    }
                    let garbled = garbled_share(&text);
                    if garbled > MAX_GARBLED_SHARE {
                        warn!(
                            "PDF strategy '{}' output is {:.0}% garbled characters",
                            strategy.name(),
                            garbled * 100.0
                        );
                        continue;
                    }
                    info!("PDF strategy '{}' extracted {chars} characters", strategy.name());
                    return Ok(text);
                }
                Err(e) => warn!("PDF strategy '{}' failed: {e:#}", strategy.name()),
            }
        }
        Err(ExtractionError::ExtractionExhausted)
    }
}

/// Share of non-whitespace characters that cannot be resume text: control
/// characters, replacement characters, private-use code points, and the
/// Latin-1 symbol block that raw glyph ids land in when a font's encoding is
/// ignored.
fn garbled_share(text: &str) -> f64 {
    let mut total = 0usize;
    let mut garbled = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if is_garbled(c) {
            garbled += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    garbled as f64 / total as f64
}

fn is_garbled(c: char) -> bool {
    match c {
        '\u{FFFD}' | '\u{E000}'..='\u{F8FF}' => true,
        '©' | '®' | '°' | '·' | '«' | '»' | '£' | '§' => false,
        '\u{80}'..='\u{BF}' => true,
        _ => c.is_control(),
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(StructuralStrategy),
            Box::new(HeuristicScanStrategy),
            Box::new(RenderedPageStrategy::default()),
        ])
    }
}


#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;

    struct Fixed(&'static str, Option<&'static str>);

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn attempt(&self, _bytes: &[u8]) -> Result<String> {
            match self.1 {
                Some(text) => Ok(text.to_string()),
                None => bail!("{} cannot read this", self.0),
            }
        }
    }

    const LONG: &str = "Jane Doe, Staff Engineer. Ten years of Rust, Go and Kafka at scale.";

    #[test]
    fn test_default_chain_order() {
        assert_eq!(
            PdfExtractor::default().strategy_names(),
            vec!["structural", "heuristic_scan", "rendered_page"]
        );
    }

    #[test]
    fn test_first_sufficient_strategy_wins() {
        let chain = PdfExtractor::new(vec![
            Box::new(Fixed("first", Some(LONG))),
            Box::new(Fixed("second", Some("never used, never used, never used, never used!"))),
        ]);
        assert_eq!(chain.extract(b"").unwrap(), LONG);
    }

    #[test]
    fn test_short_output_falls_through() {
        let chain = PdfExtractor::new(vec![
            Box::new(Fixed("short", Some("   too short   "))),
            Box::new(Fixed("error", None)),
            Box::new(Fixed("good", Some(LONG))),
        ]);
        assert_eq!(chain.extract(b"").unwrap(), LONG);
    }

    #[test]
    fn test_all_failing_is_exhausted() {
        let chain = PdfExtractor::new(vec![
            Box::new(Fixed("a", None)),
            Box::new(Fixed("b", Some("tiny"))),
        ]);
        assert_eq!(chain.extract(b""), Err(ExtractionError::ExtractionExhausted));
    }

    #[test]
    fn test_garbled_output_falls_through() {
        let mojibake = "\0\u{1}\0\u{2}\0\u{3}\0\u{3} \0\u{4}\0\u{5}\0\u{6} ¨µ¬g¶¬g¬µ°¶¹g¨ª²¬µ« ¨µ¬g¶¬g¬µ°¶¹g¨ª²¬µ« ±¶¬";
        let chain = PdfExtractor::new(vec![
            Box::new(Fixed("mojibake", Some(mojibake))),
            Box::new(Fixed("good", Some(LONG))),
        ]);
        assert_eq!(chain.extract(b"").unwrap(), LONG);
    }

    #[test]
    fn test_garbled_share() {
        assert_eq!(garbled_share(LONG), 0.0);
        assert_eq!(garbled_share("   "), 0.0);
        assert_eq!(garbled_share("José Müller, Zürich © 2024 · Café"), 0.0);
        assert_eq!(garbled_share("ab\u{FFFD}\u{E001}"), 0.5);
        assert!(garbled_share("¨µ¬g¶¬g¬µ°¶¹g") > MAX_GARBLED_SHARE);
    }

    #[test]
    fn test_default_chain_reads_composite_font_pdf() {
        let pdf = fixtures::build_type0_pdf(&[
            "Jane Doe",
            "Senior Backend Engineer with eight years of Rust and Kafka",
        ]);
        let text = PdfExtractor::default().extract(&pdf).unwrap();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(text.contains("Jane Doe Senior Backend Engineer"), "got {text:?}");
    }

    #[test]
    fn test_default_chain_reads_generated_pdf() {
        let pdf = fixtures::build_pdf(&[&[
            "Jane Doe",
            "Senior Platform Engineer with nine years of distributed systems work",
        ]]);
        let text = PdfExtractor::default().extract(&pdf).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("distributed systems"));
    }

    #[test]
    fn test_default_chain_gives_up_on_garbage() {
        let garbage = vec![0xABu8; 4096];
        assert_eq!(
            PdfExtractor::default().extract(&garbage),
            Err(ExtractionError::ExtractionExhausted)
        );
    }
}
