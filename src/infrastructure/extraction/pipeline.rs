//! File → normalized document records

use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use super::fallback::PlainTextExtractor;
use super::normalizer::MetadataNormalizer;
use crate::domain::{
    extension_of, keys, posix_path, DocumentRecord, ExtractionError, ExtractorRegistry,
    FallbackExtractor, TextBlock, PDF_EXTENSION,
};

/// Dispatches a file to its strategy, applies the fallback chain and
/// normalizes the resulting records.
///
/// Holds only immutable state, so one instance serves concurrent calls.
#[derive(Clone)]
pub struct IngestionPipeline {
    registry: Arc<ExtractorRegistry>,
    image_fallback: Arc<dyn FallbackExtractor>,
    plain_text: PlainTextExtractor,
    normalizer: MetadataNormalizer,
}

impl IngestionPipeline {
    pub fn new(registry: Arc<ExtractorRegistry>, image_fallback: Arc<dyn FallbackExtractor>) -> Self {
        Self {
            registry,
            image_fallback,
            plain_text: PlainTextExtractor::new(),
            normalizer: MetadataNormalizer::new(),
        }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Extract `file_path`, dispatching on the suffix of `file_name`
    #[instrument(skip(self, file_path))]
    pub async fn extract(
        &self,
        file_name: &str,
        file_path: &Path,
    ) -> Result<Vec<DocumentRecord>, ExtractionError> {
        let extension = extension_of(file_name);

        let blocks = match self.registry.resolve(&extension) {
            None => {
                debug!(extension = %extension, "No reader found, using plain text");
                self.plain_text.extract(file_name, file_path).await?
            }
            Some(strategy) => {
                debug!(extension = %extension, strategy = strategy.name(), remote = strategy.is_remote(), "Reader found");

                let blocks = strategy
                    .invoke(file_path)
                    .await
                    .map_err(|e| ExtractionError::extraction_failed(file_name, e))?;

                if blocks.is_empty() && extension == PDF_EXTENSION {
                    self.extract_pdf_images(file_name, file_path).await?
                } else {
                    blocks
                }
            }
        };

        if blocks.is_empty() {
            warn!(file_name = %file_name, "No documents extracted from file");
        }

        let records = self.finish(blocks, file_path);
        debug!(file_name = %file_name, records = records.len(), "Extraction complete");

        Ok(records)
    }

    /// Run [`extract`](Self::extract) over independent files, at most
    /// `concurrency` at a time. Results come back in input order and one
    /// failure does not affect the others.
    pub async fn extract_many<I, S>(
        &self,
        files: I,
        concurrency: usize,
    ) -> Vec<Result<Vec<DocumentRecord>, ExtractionError>>
    where
        I: IntoIterator<Item = (S, PathBuf)>,
        S: AsRef<str>,
    {
        stream::iter(files)
            .map(|(file_name, file_path)| async move {
                self.extract(file_name.as_ref(), &file_path).await
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn extract_pdf_images(
        &self,
        file_name: &str,
        file_path: &Path,
    ) -> Result<Vec<TextBlock>, ExtractionError> {
        debug!(file_name = %file_name, "No text extracted from PDF, trying to extract images from PDF");

        self.image_fallback.extract(file_path).await.map_err(|e| {
            error!(file_name = %file_name, error = %e, "Error extracting images from PDF");
            ExtractionError::no_text_extracted(file_name, e)
        })
    }

    fn finish(&self, blocks: Vec<TextBlock>, file_path: &Path) -> Vec<DocumentRecord> {
        let source = posix_path(file_path);

        let mut records: Vec<DocumentRecord> = blocks
            .into_iter()
            .map(|block| {
                let mut record = DocumentRecord::from(block);
                record
                    .metadata
                    .insert(keys::FILE_NAME.to_string(), source.clone().into());
                record
            })
            .collect();

        self.normalizer.normalize(&mut records);
        records
    }
}

impl fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionPipeline")
            .field("bindings", &self.registry.len())
            .field("image_fallback", &self.image_fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::loader::mock::{
        MockDocumentLoader, MockFallbackExtractor, MockRemoteDocumentLoader,
    };
    use crate::domain::DocumentLoader;
    use tokio_test::{assert_err, assert_ok};

    fn registry_with(extension: &str, loader: Arc<dyn DocumentLoader>) -> Arc<ExtractorRegistry> {
        Arc::new(ExtractorRegistry::builder().bind(extension, loader).build().unwrap())
    }

    fn text_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn assert_normalized(records: &[DocumentRecord], path: &Path) {
        for record in records {
            let doc_id = record.doc_id().expect("doc_id");
            assert_eq!(record.metadata[keys::DOC_ID], doc_id);
            assert!(record.excluded_embed_metadata_keys().contains(keys::DOC_ID));
            assert!(record.excluded_llm_metadata_keys().contains(keys::DOC_ID));
            assert!(record.excluded_llm_metadata_keys().contains(keys::PAGE_LABEL));
            assert_eq!(record.file_name(), Some(path.to_str().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_unbound_extension_uses_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = text_file(&dir, "note.xyz", "hello");
        let pdf = Arc::new(MockDocumentLoader::new("pdf"));
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![]));
        let pipeline = IngestionPipeline::new(registry_with(".pdf", pdf.clone()), fallback.clone());

        let records = assert_ok!(pipeline.extract("note.xyz", &path).await);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello");
        assert_normalized(&records, &path);
        assert_eq!(pdf.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_unbound_whitespace_file_is_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = text_file(&dir, "w.xyz", "\n");
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let records = pipeline.extract("w.xyz", &path).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "\n");
        assert_normalized(&records, &path);
    }

    #[tokio::test]
    async fn test_unbound_binary_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [0xc3, 0x28, 0xff]).unwrap();
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let error = assert_err!(pipeline.extract("data.bin", &path).await);

        assert!(matches!(error, ExtractionError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_bound_strategy_records_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = text_file(&dir, "notes.md", "ignored");
        let markdown = Arc::new(MockDocumentLoader::new("markdown").with_blocks(vec![
            TextBlock::new("first").with_metadata("header", "A"),
            TextBlock::new("second").with_metadata("header", "B"),
        ]));
        let pipeline = IngestionPipeline::new(
            registry_with(".md", markdown.clone()),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let records = pipeline.extract("notes.md", &path).await.unwrap();

        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(records[1].metadata["header"], "B");
        assert_normalized(&records, &path);
        assert_eq!(markdown.calls(), 1);
    }

    #[tokio::test]
    async fn test_strategy_failure_is_extraction_failed() {
        let pipeline = IngestionPipeline::new(
            registry_with(".docx", Arc::new(MockDocumentLoader::new("docx").with_error("corrupt zip"))),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let error = pipeline.extract("a.docx", Path::new("/in/a.docx")).await.unwrap_err();

        match error {
            ExtractionError::ExtractionFailed { file_name, source } => {
                assert_eq!(file_name, "a.docx");
                assert_eq!(source.to_string(), "corrupt zip");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_pdf_runs_image_fallback_once() {
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![
            TextBlock::new("page one")
                .with_metadata(keys::CHUNK_TYPE, "image")
                .with_metadata(keys::PAGE_LABEL, 1),
            TextBlock::new("page two")
                .with_metadata(keys::CHUNK_TYPE, "image")
                .with_metadata(keys::PAGE_LABEL, 2),
        ]));
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            fallback.clone(),
        );
        let path = Path::new("/in/scan.pdf");

        let records = pipeline.extract("scan.pdf", path).await.unwrap();

        assert_eq!(fallback.calls(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page_label(), Some(1));
        assert_eq!(records[1].page_label(), Some(2));
        assert_normalized(&records, path);
    }

    #[tokio::test]
    async fn test_pdf_with_text_skips_fallback() {
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![TextBlock::new("ocr")]));
        let pdf = Arc::new(MockDocumentLoader::new("pdf").with_blocks(vec![TextBlock::new("text layer")]));
        let pipeline = IngestionPipeline::new(registry_with(".pdf", pdf), fallback.clone());

        let records = pipeline.extract("a.pdf", Path::new("/in/a.pdf")).await.unwrap();

        assert_eq!(records[0].text, "text layer");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_pdf_fallback_is_no_text_extracted() {
        let fallback = Arc::new(MockFallbackExtractor::failing(|| {
            ExtractionError::extraction_failed("scan.pdf", anyhow::anyhow!("ocr crashed"))
        }));
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            fallback.clone(),
        );

        let error = pipeline.extract("scan.pdf", Path::new("/in/scan.pdf")).await.unwrap_err();

        assert_eq!(fallback.calls(), 1);
        assert_eq!(error.to_string(), "No text extracted from PDF: scan.pdf");
        assert!(matches!(error, ExtractionError::NoTextExtracted { .. }));
        assert!(!error.is_fatal());
    }

    #[tokio::test]
    async fn test_missing_capability_stays_visible_through_fallback() {
        let fallback = Arc::new(MockFallbackExtractor::failing(|| {
            ExtractionError::missing_capability("tesseract", "install tesseract")
        }));
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            fallback,
        );

        let error = pipeline.extract("scan.pdf", Path::new("/in/scan.pdf")).await.unwrap_err();

        match &error {
            ExtractionError::NoTextExtracted { source, .. } => {
                assert!(matches!(**source, ExtractionError::MissingCapability { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(error.is_fatal());
    }

    #[tokio::test]
    async fn test_empty_pdf_fallback_with_no_pages_is_ok() {
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![]));
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            fallback.clone(),
        );

        let records = pipeline.extract("blank.pdf", Path::new("/in/blank.pdf")).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_non_pdf_is_accepted_without_fallback() {
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![TextBlock::new("ocr")]));
        let pipeline = IngestionPipeline::new(
            registry_with(".docx", Arc::new(MockDocumentLoader::new("docx"))),
            fallback.clone(),
        );

        let records = pipeline.extract("scan.docx", Path::new("/in/scan.docx")).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_uppercase_pdf_is_not_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = text_file(&dir, "SCAN.PDF", "%PDF-1.4 text");
        let fallback = Arc::new(MockFallbackExtractor::returning(vec![]));
        let pdf = Arc::new(MockDocumentLoader::new("pdf"));
        let pipeline = IngestionPipeline::new(registry_with(".pdf", pdf.clone()), fallback.clone());

        let records = pipeline.extract("SCAN.PDF", &path).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(pdf.calls(), 0);
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_strategy_receives_endpoint_and_path() {
        let remote = Arc::new(
            MockRemoteDocumentLoader::new().with_blocks(vec![TextBlock::new("remote text")]),
        );
        let registry = ExtractorRegistry::builder()
            .bind(".pdf", Arc::new(MockDocumentLoader::new("pdf")))
            .with_remote("http://parser:5010/api/parseDocument", remote.clone(), [".pdf"])
            .build()
            .unwrap();
        let pipeline = IngestionPipeline::new(
            Arc::new(registry),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let records = pipeline.extract("a.pdf", Path::new("/in/a.pdf")).await.unwrap();

        assert_eq!(records[0].text, "remote text");
        assert_eq!(
            remote.requests(),
            vec![(
                "http://parser:5010/api/parseDocument".to_string(),
                "/in/a.pdf".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_loader_doc_ids_do_not_survive_normalization() {
        let markdown = Arc::new(MockDocumentLoader::new("markdown").with_blocks(vec![
            TextBlock::new("first").with_metadata(keys::DOC_ID, "dup"),
            TextBlock::new("second").with_metadata(keys::DOC_ID, "dup"),
        ]));
        let pipeline = IngestionPipeline::new(
            registry_with(".md", markdown),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let records = pipeline.extract("a.md", Path::new("/in/a.md")).await.unwrap();

        let ids: std::collections::HashSet<_> = records.iter().map(|r| r.doc_id().unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains("dup"));
        assert_normalized(&records, Path::new("/in/a.md"));
    }

    #[tokio::test]
    async fn test_same_content_different_files_are_distinguishable() {
        let dir = tempfile::tempdir().unwrap();
        let first = text_file(&dir, "a.xyz", "same");
        let second = text_file(&dir, "b.xyz", "same");
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let a = pipeline.extract("a.xyz", &first).await.unwrap();
        let b = pipeline.extract("b.xyz", &second).await.unwrap();

        assert_ne!(a[0].doc_id(), b[0].doc_id());
        assert_ne!(a[0].file_name(), b[0].file_name());
    }

    #[tokio::test]
    async fn test_extract_many_isolates_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = text_file(&dir, "good.txt", "fine");
        let missing = dir.path().join("missing.txt");
        let other = text_file(&dir, "other.log", "also fine");
        let pipeline = IngestionPipeline::new(
            registry_with(".pdf", Arc::new(MockDocumentLoader::new("pdf"))),
            Arc::new(MockFallbackExtractor::returning(vec![])),
        );

        let results = pipeline
            .extract_many(
                vec![
                    ("good.txt".to_string(), good),
                    ("missing.txt".to_string(), missing),
                    ("other.log".to_string(), other),
                ],
                2,
            )
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[0].text, "fine");
        assert!(matches!(results[1], Err(ExtractionError::ExtractionFailed { .. })));
        assert_eq!(results[2].as_ref().unwrap()[0].text, "also fine");
    }
}
