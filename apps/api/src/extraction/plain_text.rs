use crate::extraction::ExtractionError;

pub const MIN_PLAIN_TEXT_CHARS: usize = 10;

/// Decodes a `.txt` upload. Invalid UTF-8 sequences are replaced rather than
/// rejected, matching how browsers read text files.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let decoded = String::from_utf8_lossy(bytes);
    let text = decoded
        .strip_prefix('\u{FEFF}')
        .unwrap_or(decoded.as_ref());

    if text.trim().chars().count() < MIN_PLAIN_TEXT_CHARS {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(text.to_string())
}
