//! PDF text-layer loader

use async_trait::async_trait;
use std::path::Path;

use super::run_blocking;
use crate::domain::{keys, DocumentLoader, TextBlock};

/// Extracts the text layer of each PDF page.
///
/// Pages without any text (scans, pure images) are skipped, so a fully
/// scanned document yields no blocks and becomes eligible for the OCR
/// fallback.
#[derive(Debug, Clone, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    fn pages_to_blocks(pages: Vec<String>) -> Vec<TextBlock> {
        pages
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| {
                TextBlock::new(text.trim()).with_metadata(keys::PAGE_LABEL, index + 1)
            })
            .collect()
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    fn name(&self) -> &'static str {
        "pdf"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let pages = run_blocking(path, |path| {
            pdf_extract::extract_text_by_pages(&path)
                .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {}", e))
        })
        .await?;

        Ok(Self::pages_to_blocks(pages))
    }
}
