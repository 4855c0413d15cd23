//! Infrastructure layer - Concrete extractors and process plumbing

pub mod extraction;
pub mod logging;

pub use extraction::{ExtractorFactory, IngestionPipeline};
pub use logging::init_logging;
