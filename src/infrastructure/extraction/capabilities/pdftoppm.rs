//! Poppler `pdftoppm` page rasterizer

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::{probe, run};
use crate::domain::PageRasterizer;

const OUTPUT_PREFIX: &str = "page";

/// `page-7.png`, `page-07.png`, `page-007.png` depending on page count
static PAGE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^page-(\d+)\.png$").unwrap());

/// Renders PDF pages to PNG files with `pdftoppm`
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(command: impl Into<String>, dpi: u32) -> Self {
        Self {
            command: command.into(),
            dpi,
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm", 200)
    }
}

/// Rasterized pages in `dir`, ordered by page number
pub(crate) fn collect_pages(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut pages = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(number) = PAGE_FILE
            .captures(name)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        else {
            continue;
        };
        pages.push((number, path));
    }

    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    fn name(&self) -> &'static str {
        "pdftoppm"
    }

    async fn is_available(&self) -> bool {
        probe(&self.command, "-v").await
    }

    async fn rasterize(&self, document: &Path, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut command = Command::new(&self.command);
        command
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(document)
            .arg(output_dir.join(OUTPUT_PREFIX));

        run(&mut command, &self.command).await?;

        let output_dir = output_dir.to_path_buf();
        tokio::task::spawn_blocking(move || collect_pages(&output_dir)).await?
    }
}
