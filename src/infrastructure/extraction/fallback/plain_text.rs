//! Raw-text wrapping for files with no bound strategy

use std::path::Path;

use crate::domain::{extension_of, ExtractionError, TextBlock};

/// Decodes the whole file as UTF-8 and wraps it as a single block, even
/// when the text is blank.
///
/// Content that is not valid UTF-8 is reported as an unsupported format:
/// there is no reader for it and it is not text.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(&self, file_name: &str, path: &Path) -> Result<Vec<TextBlock>, ExtractionError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractionError::extraction_failed(file_name, e))?;

        let text = String::from_utf8(bytes).map_err(|e| {
            ExtractionError::unsupported_format(extension_of(file_name), file_name, e)
        })?;

        Ok(vec![TextBlock::new(text)])
    }
}
