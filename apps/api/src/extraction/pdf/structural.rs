use std::any::Any;
use std::panic;

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use super::ExtractionStrategy;

/// Reads the document's text layer with `pdf-extract`, which maps every
/// glyph through its font's encoding and `ToUnicode` CMap. Pages are joined
/// by a blank line.
pub struct StructuralStrategy;

impl ExtractionStrategy for StructuralStrategy {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn attempt(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some font programs it does not support.
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|payload| anyhow!("text layer parser panicked: {}", panic_message(&*payload)))?
            .map_err(|e| anyhow!("failed to read PDF text layer: {e}"))?;

        let mut kept = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let page = page.trim();
            if page.is_empty() {
                debug!("Page {} has no text layer", index + 1);
                continue;
            }
            kept.push(page);
        }

        if kept.is_empty() {
            bail!("no text layer found on any page");
        }
        Ok(kept.join("\n\n"))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown cause"
    }
}
