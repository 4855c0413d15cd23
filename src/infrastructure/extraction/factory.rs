//! Startup-time construction of the registry and pipeline

use std::sync::Arc;

use super::capabilities::{PdftoppmRasterizer, TesseractOcr};
use super::fallback::ImagePageExtractor;
use super::loaders::{
    CsvLoader, DocxLoader, EpubLoader, HwpLoader, ImageLoader, JsonLoader, MarkdownLoader,
    MboxLoader, NotebookLoader, PdfLoader, PptxLoader, RemoteParserLoader,
};
use super::pipeline::IngestionPipeline;
use crate::config::ExtractionSettings;
use crate::domain::{ExtractionError, ExtractorRegistry, OcrEngine, PageRasterizer};

/// Extensions served by the remote parser when one is configured
pub const REMOTE_PARSER_EXTENSIONS: [&str; 5] = [".pdf", ".docx", ".csv", ".xls", ".xlsx"];

/// Builds the extractor table and pipeline from settings
#[derive(Debug, Default)]
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Base family, then remote substitution if an endpoint is set, then the
    /// `.json` patch
    pub fn create_registry(
        settings: &ExtractionSettings,
        ocr: Arc<dyn OcrEngine>,
    ) -> Result<ExtractorRegistry, ExtractionError> {
        let pptx = Arc::new(PptxLoader::new());
        let image = Arc::new(ImageLoader::new(ocr, settings.ocr.language.clone()));

        let mut builder = ExtractorRegistry::builder()
            .bind(".hwp", Arc::new(HwpLoader::new()))
            .bind(".pdf", Arc::new(PdfLoader::new()))
            .bind(".docx", Arc::new(DocxLoader::new()))
            .bind(".pptx", pptx.clone())
            .bind(".ppt", pptx.clone())
            .bind(".pptm", pptx)
            .bind(".jpg", image.clone())
            .bind(".png", image.clone())
            .bind(".jpeg", image)
            .bind(".csv", Arc::new(CsvLoader::new()))
            .bind(".epub", Arc::new(EpubLoader::new()))
            .bind(".md", Arc::new(MarkdownLoader::new()))
            .bind(".mbox", Arc::new(MboxLoader::new()))
            .bind(".ipynb", Arc::new(NotebookLoader::new()));

        if let Some(endpoint) = settings.remote_parser_url() {
            tracing::info!(endpoint = %endpoint, extensions = ?REMOTE_PARSER_EXTENSIONS, "Using remote parser");
            builder = builder.with_remote(
                endpoint,
                Arc::new(RemoteParserLoader::new()),
                REMOTE_PARSER_EXTENSIONS,
            );
        }

        builder.patch(".json", Arc::new(JsonLoader::new())).build()
    }

    pub fn create_rasterizer(settings: &ExtractionSettings) -> Arc<dyn PageRasterizer> {
        Arc::new(PdftoppmRasterizer::new(
            settings.ocr.rasterizer_command.clone(),
            settings.ocr.dpi,
        ))
    }

    pub fn create_ocr_engine(settings: &ExtractionSettings) -> Arc<dyn OcrEngine> {
        Arc::new(TesseractOcr::new(settings.ocr.engine_command.clone()))
    }

    /// Pipeline over explicit capabilities
    pub fn create_pipeline_with(
        settings: &ExtractionSettings,
        rasterizer: Arc<dyn PageRasterizer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Result<IngestionPipeline, ExtractionError> {
        let registry = Self::create_registry(settings, ocr.clone())?;
        let image_fallback = ImagePageExtractor::new(rasterizer, ocr, settings.ocr.language.clone());

        tracing::debug!(bindings = registry.len(), "Extractor registry built");

        Ok(IngestionPipeline::new(Arc::new(registry), Arc::new(image_fallback)))
    }

    /// Pipeline backed by the command-line OCR tools named in `settings`
    pub fn create_pipeline(settings: &ExtractionSettings) -> Result<IngestionPipeline, ExtractionError> {
        Self::create_pipeline_with(
            settings,
            Self::create_rasterizer(settings),
            Self::create_ocr_engine(settings),
        )
    }
}
