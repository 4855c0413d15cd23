//! Runtime capabilities required by image-based extraction

use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Renders each page of a document into an image file
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the rasterizer can run in this process
    async fn is_available(&self) -> bool;

    /// Write one image per page into `output_dir`, returned in page order
    async fn rasterize(&self, document: &Path, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>>;
}

/// Optical character recognition over a single image
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn is_available(&self) -> bool;

    /// Recognize the text in `image` using the given language code
    async fn recognize(&self, image: &Path, language: &str) -> anyhow::Result<String>;
}
