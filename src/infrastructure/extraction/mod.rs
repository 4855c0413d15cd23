//! Extraction infrastructure
//!
//! Concrete format loaders, the command-line OCR capabilities, the fallback
//! extractors, metadata normalization and the ingestion pipeline tying them
//! together.

pub mod capabilities;
pub mod factory;
pub mod fallback;
pub mod loaders;
pub mod normalizer;
pub mod pipeline;

pub use capabilities::{PdftoppmRasterizer, TesseractOcr};
pub use factory::{ExtractorFactory, REMOTE_PARSER_EXTENSIONS};
pub use fallback::{ImagePageExtractor, PlainTextExtractor};
pub use loaders::remote::DEFAULT_REMOTE_PARSER_URL;
pub use normalizer::MetadataNormalizer;
pub use pipeline::IngestionPipeline;
