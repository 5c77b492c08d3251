use anyhow::{bail, Context, Result};
use lopdf::{Document, ObjectId};
use tracing::debug;

use super::{ExtractionStrategy, MIN_STRATEGY_CHARS};

pub const MAX_RENDERED_PAGES: usize = 3;

/// Recovers text from a single page as it would appear when drawn, e.g. by
/// rasterizing it and running a character recognizer over the image.
pub trait PageRecognizer: Send + Sync {
    fn recognize(&self, document: &Document, page_number: u32, page_id: ObjectId)
        -> Result<String>;
}

/// Placeholder recognizer: no rasterizer ships with this service, so every
/// page comes back empty and the strategy fails.
pub struct BlankPageRecognizer;

impl PageRecognizer for BlankPageRecognizer {
    fn recognize(&self, _document: &Document, _page_number: u32, _page_id: ObjectId)
        -> Result<String> {
        Ok(String::new())
    }
}

/// Last strategy in the chain. Hands the leading pages to a `PageRecognizer`
/// for image-only PDFs.
pub struct RenderedPageStrategy {
    recognizer: Box<dyn PageRecognizer>,
    max_pages: usize,
}

impl RenderedPageStrategy {
    pub fn new(recognizer: Box<dyn PageRecognizer>) -> Self {
        Self {
            recognizer,
            max_pages: MAX_RENDERED_PAGES,
        }
    }
}

impl Default for RenderedPageStrategy {
    fn default() -> Self {
        Self::new(Box::new(BlankPageRecognizer))
    }
}

impl ExtractionStrategy for RenderedPageStrategy {
    fn name(&self) -> &'static str {
        "rendered_page"
    }

    fn attempt(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes).context("failed to open PDF for rendering")?;

        let mut pages = Vec::new();
        for (page_number, page_id) in doc.get_pages().into_iter().take(self.max_pages) {
            match self.recognizer.recognize(&doc, page_number, page_id) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => debug!("Page {page_number} recognized no text"),
                Err(e) => debug!("Page {page_number} could not be recognized: {e:#}"),
            }
        }

        let text = pages.join("\n\n");
        if text.trim().chars().count() < MIN_STRATEGY_CHARS {
            bail!("page recognition recovered no usable text");
        }
        Ok(text)
    }
}
