//! PMP Doc Extract
//!
//! Turns arbitrary files into normalized text records for indexing:
//! - Extension-based dispatch to per-format extractors
//! - Optional remote layout parser for PDF, Office and tabular files
//! - Rasterize + OCR fallback for PDFs without a text layer
//! - Plain-text fallback for unbound extensions
//! - Stable record identity and metadata visibility for downstream consumers

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DocumentRecord, ExtractionError, MetadataMode};
pub use infrastructure::{ExtractorFactory, IngestionPipeline};
