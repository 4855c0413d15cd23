//! Jupyter notebook loader

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::domain::{DocumentLoader, TextBlock};

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows the source as one string or a list of lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// Loads code and markdown cells in order, separated by `<cell N>` markers
#[derive(Debug, Clone, Default)]
pub struct NotebookLoader;

impl NotebookLoader {
    pub fn new() -> Self {
        Self
    }

    fn render(notebook: Notebook) -> String {
        notebook
            .cells
            .into_iter()
            .filter(|cell| matches!(cell.cell_type.as_str(), "code" | "markdown"))
            .map(|cell| cell.source.into_text())
            .filter(|source| !source.trim().is_empty())
            .enumerate()
            .map(|(index, source)| format!("<cell {}>\n{}", index + 1, source.trim_end()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl DocumentLoader for NotebookLoader {
    fn name(&self) -> &'static str {
        "ipynb"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let notebook: Notebook = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid notebook: {}", e))?;

        let text = Self::render(notebook);
        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(text)])
    }
}
