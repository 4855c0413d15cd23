//! Tesseract OCR engine driven through its command line

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::{probe, run};
use crate::domain::OcrEngine;

/// Runs `tesseract <image> stdout -l <language>`
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        probe(&self.command, "--version").await
    }

    async fn recognize(&self, image: &Path, language: &str) -> anyhow::Result<String> {
        let mut command = Command::new(&self.command);
        command.arg(image).arg("stdout").arg("-l").arg(language);

        let stdout = run(&mut command, &self.command).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
