//! Document extraction domain types and traits
//!
//! This module provides:
//! - `DocumentRecord` / `TextBlock` - pipeline output and raw loader output
//! - `DocumentLoader` / `RemoteDocumentLoader` traits for format extractors
//! - `PageRasterizer` / `OcrEngine` capabilities for image-based extraction
//! - `ExtractionStrategy` and the immutable `ExtractorRegistry`

pub mod capability;
pub mod loader;
pub mod record;
pub mod registry;
pub mod strategy;

// Re-export main types
pub use capability::{OcrEngine, PageRasterizer};
pub use loader::{DocumentLoader, FallbackExtractor, RemoteDocumentLoader};
pub use record::{keys, DocumentRecord, MetadataMode, TextBlock};
pub use registry::{ExtractorRegistry, ExtractorRegistryBuilder};
pub use strategy::{extension_of, posix_path, ExtractionStrategy, PDF_EXTENSION};

// Re-export mocks for testing
#[cfg(test)]
pub use capability::{MockOcrEngine, MockPageRasterizer};
#[cfg(test)]
pub use loader::mock::{MockDocumentLoader, MockFallbackExtractor, MockRemoteDocumentLoader};
