//! Format-specific document loaders

mod epub;
mod hwp;
mod image;
mod ipynb;
mod json;
mod markdown;
mod mbox;
mod office;
mod pdf;
pub mod remote;
mod tabular;

pub use epub::EpubLoader;
pub use hwp::HwpLoader;
pub use image::ImageLoader;
pub use ipynb::NotebookLoader;
pub use json::JsonLoader;
pub use markdown::MarkdownLoader;
pub use mbox::MboxLoader;
pub use office::{DocxLoader, PptxLoader};
pub use pdf::PdfLoader;
pub use remote::RemoteParserLoader;
pub use tabular::CsvLoader;

use std::io::Read;
use std::path::{Path, PathBuf};

/// Run a synchronous parser off the async runtime.
///
/// Panics inside third-party parsers surface as errors rather than
/// tearing down the caller.
pub(crate) async fn run_blocking<T, F>(path: &Path, parse: F) -> anyhow::Result<T>
where
    F: FnOnce(PathBuf) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let owned = path.to_path_buf();

    tokio::task::spawn_blocking(move || parse(owned))
        .await
        .map_err(|e| anyhow::anyhow!("parser task for {} failed: {}", path.display(), e))?
}

/// Read a UTF-8 entry from a zip container
pub(crate) fn read_zip_entry<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> anyhow::Result<String> {
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}
