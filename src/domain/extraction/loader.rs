//! Collaborator traits for format-specific extraction

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use super::record::TextBlock;
use crate::domain::ExtractionError;

/// A format-specific extractor that reads a local file
#[async_trait]
pub trait DocumentLoader: Send + Sync + Debug {
    /// Short identifier used in logs and the format listing
    fn name(&self) -> &'static str;

    /// Load the file into raw text blocks
    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>>;
}

/// An extractor backed by a remote parsing service
#[async_trait]
pub trait RemoteDocumentLoader: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Send `document` (a local path or an http(s) URL) to `endpoint`
    async fn load(&self, endpoint: &str, document: &str) -> anyhow::Result<Vec<TextBlock>>;
}

/// Last-resort extractor run when the primary strategy found no text.
///
/// Unlike loaders, it reports typed errors: a missing runtime capability is
/// a configuration problem the caller must be able to tell apart.
#[async_trait]
pub trait FallbackExtractor: Send + Sync + Debug {
    async fn extract(&self, path: &Path) -> Result<Vec<TextBlock>, ExtractionError>;
}
