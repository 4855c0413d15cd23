//! Extractors used when no format-specific strategy produced text

mod image_pdf;
mod plain_text;

pub use image_pdf::ImagePageExtractor;
pub use plain_text::PlainTextExtractor;
