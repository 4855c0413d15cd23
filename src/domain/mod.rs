//! Domain layer - Core extraction types, traits and errors

pub mod error;
pub mod extraction;

pub use error::ExtractionError;
pub use extraction::{
    extension_of, keys, posix_path, DocumentLoader, DocumentRecord, ExtractionStrategy,
    ExtractorRegistry, ExtractorRegistryBuilder, FallbackExtractor, MetadataMode, OcrEngine,
    PageRasterizer, RemoteDocumentLoader, TextBlock, PDF_EXTENSION,
};

#[cfg(test)]
pub use extraction::{
    MockDocumentLoader, MockFallbackExtractor, MockOcrEngine, MockPageRasterizer,
    MockRemoteDocumentLoader,
};
