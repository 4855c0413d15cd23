//! Extraction strategy handle

use std::path::Path;
use std::sync::Arc;

use super::loader::{DocumentLoader, RemoteDocumentLoader};
use super::record::TextBlock;

/// Extension that gets the image-based fallback when no text was found
pub const PDF_EXTENSION: &str = ".pdf";

/// A bound extraction strategy, carrying its own invocation parameters
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// Local parser reading the file directly
    Local(Arc<dyn DocumentLoader>),
    /// Remote parsing service reached at `endpoint`
    Remote {
        endpoint: String,
        loader: Arc<dyn RemoteDocumentLoader>,
    },
}

impl ExtractionStrategy {
    pub fn local(loader: Arc<dyn DocumentLoader>) -> Self {
        Self::Local(loader)
    }

    pub fn remote(endpoint: impl Into<String>, loader: Arc<dyn RemoteDocumentLoader>) -> Self {
        Self::Remote {
            endpoint: endpoint.into(),
            loader,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Local(loader) => loader.name(),
            Self::Remote { loader, .. } => loader.name(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Run the strategy against a file
    pub async fn invoke(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        match self {
            Self::Local(loader) => loader.load(path).await,
            Self::Remote { endpoint, loader } => loader.load(endpoint, &posix_path(path)).await,
        }
    }
}

/// Suffix of `file_name` including the leading dot, or an empty string.
///
/// Matches on the last component only; dotfiles such as `.bashrc` have no suffix.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Path rendered with forward slashes regardless of platform
pub fn posix_path(path: &Path) -> String {
    let rendered = path.to_string_lossy();

    if std::path::MAIN_SEPARATOR == '\\' {
        rendered.replace('\\', "/")
    } else {
        rendered.into_owned()
    }
}
