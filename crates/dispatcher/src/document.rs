//! Document-text extraction seam.

use crate::error::ExtractError;

/// Turns uploaded document bytes into plain text for the AI prompt.
///
/// Kept as a seam so the binary can plug in a real PDF text extractor
/// without the dispatcher knowing about file formats.
pub trait DocumentExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Treats the document bytes as UTF-8 text.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_extractor() {
        let extractor = PlainTextExtractor;
        let text = extractor.extract_text("Гемоглобин - 140".as_bytes()).unwrap();
        assert_eq!(text, "Гемоглобин - 140");
    }
}
