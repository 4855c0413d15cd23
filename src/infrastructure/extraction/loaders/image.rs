//! Standalone image loader backed by OCR

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{keys, DocumentLoader, OcrEngine, TextBlock};

/// Recognizes text in a single image file
pub struct ImageLoader {
    ocr: Arc<dyn OcrEngine>,
    language: String,
}

impl ImageLoader {
    pub fn new(ocr: Arc<dyn OcrEngine>, language: impl Into<String>) -> Self {
        Self {
            ocr,
            language: language.into(),
        }
    }
}

impl fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageLoader")
            .field("ocr", &self.ocr.name())
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl DocumentLoader for ImageLoader {
    fn name(&self) -> &'static str {
        "image"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        if !self.ocr.is_available().await {
            anyhow::bail!("OCR engine {} is not available", self.ocr.name());
        }

        let text = self.ocr.recognize(path, &self.language).await?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(text).with_metadata(keys::CHUNK_TYPE, "image")])
    }
}
