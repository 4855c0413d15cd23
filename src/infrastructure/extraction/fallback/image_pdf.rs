//! Rasterize-then-OCR extraction for documents without a text layer

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{
    keys, ExtractionError, FallbackExtractor, OcrEngine, PageRasterizer, TextBlock,
};

/// Renders every page to an image and recognizes it, one block per page.
///
/// Blocks carry `chunk_type: "image"` and a 1-based `page_label` in page
/// order. Pages that recognize to nothing still produce a block so labels
/// stay gapless.
pub struct ImagePageExtractor {
    rasterizer: Arc<dyn PageRasterizer>,
    ocr: Arc<dyn OcrEngine>,
    language: String,
}

impl ImagePageExtractor {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        ocr: Arc<dyn OcrEngine>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            rasterizer,
            ocr,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    async fn ensure_capabilities(&self) -> Result<(), ExtractionError> {
        if !self.rasterizer.is_available().await {
            return Err(ExtractionError::missing_capability(
                self.rasterizer.name(),
                "install a PDF page rasterizer (poppler-utils) or set extraction.ocr.rasterizer_command",
            ));
        }

        if !self.ocr.is_available().await {
            return Err(ExtractionError::missing_capability(
                self.ocr.name(),
                format!(
                    "install an OCR engine with the {:?} language data or set extraction.ocr.engine_command",
                    self.language
                ),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ImagePageExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePageExtractor")
            .field("rasterizer", &self.rasterizer.name())
            .field("ocr", &self.ocr.name())
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl FallbackExtractor for ImagePageExtractor {
    async fn extract(&self, path: &Path) -> Result<Vec<TextBlock>, ExtractionError> {
        self.ensure_capabilities().await?;

        let file_name = path.display().to_string();
        let failed = |e: anyhow::Error| ExtractionError::extraction_failed(&file_name, e);

        let workdir = tempfile::tempdir().map_err(|e| failed(e.into()))?;
        let pages = self
            .rasterizer
            .rasterize(path, workdir.path())
            .await
            .map_err(failed)?;

        tracing::debug!(file_name = %file_name, pages = pages.len(), language = %self.language, "Running OCR over rasterized pages");

        let mut blocks = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let text = self
                .ocr
                .recognize(page, &self.language)
                .await
                .map_err(failed)?;

            blocks.push(
                TextBlock::new(text)
                    .with_metadata(keys::CHUNK_TYPE, "image")
                    .with_metadata(keys::PAGE_LABEL, index + 1),
            );
        }

        Ok(blocks)
    }
}
