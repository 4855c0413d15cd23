//! Hangul Word Processor (HWP 5) loader

use async_trait::async_trait;
use std::io::Read;
use std::path::Path;

use super::run_blocking;
use crate::domain::{DocumentLoader, TextBlock};

const PREVIEW_STREAM: &str = "/PrvText";
const FILE_HEADER_STREAM: &str = "/FileHeader";
const SIGNATURE: &[u8] = b"HWP Document File";

/// Reads the plain-text preview stored in an HWP compound file
#[derive(Debug, Clone, Default)]
pub struct HwpLoader;

impl HwpLoader {
    pub fn new() -> Self {
        Self
    }

    fn read_preview<F: Read + std::io::Seek>(file: &mut cfb::CompoundFile<F>) -> anyhow::Result<String> {
        let mut header = Vec::new();
        file.open_stream(FILE_HEADER_STREAM)?.read_to_end(&mut header)?;
        if !header.starts_with(SIGNATURE) {
            anyhow::bail!("not an HWP document: bad file header signature");
        }

        let mut preview = Vec::new();
        file.open_stream(PREVIEW_STREAM)?.read_to_end(&mut preview)?;

        Ok(decode_utf16le(&preview))
    }
}

/// Little-endian UTF-16 without BOM; a trailing odd byte is dropped
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16_lossy(&units)
        .trim_matches(char::from(0))
        .to_string()
}

#[async_trait]
impl DocumentLoader for HwpLoader {
    fn name(&self) -> &'static str {
        "hwp"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let text = run_blocking(path, |path| {
            let mut file = cfb::open(&path)?;
            Self::read_preview(&mut file)
        })
        .await?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(text)])
    }
}
