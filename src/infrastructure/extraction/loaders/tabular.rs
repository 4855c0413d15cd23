//! CSV loader

use async_trait::async_trait;
use std::path::Path;

use super::run_blocking;
use crate::domain::{DocumentLoader, TextBlock};

/// Loads a CSV file as one block, one line per row with cells joined by `", "`
#[derive(Debug, Clone)]
pub struct CsvLoader {
    column_separator: String,
    row_separator: String,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            column_separator: ", ".to_string(),
            row_separator: "\n".to_string(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn render<R: std::io::Read>(&self, reader: R) -> anyhow::Result<String> {
        let mut csv = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv.records() {
            let record = record?;
            let row = record.iter().collect::<Vec<_>>().join(&self.column_separator);
            if !row.trim().is_empty() {
                rows.push(row);
            }
        }

        Ok(rows.join(&self.row_separator))
    }
}

#[async_trait]
impl DocumentLoader for CsvLoader {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let loader = self.clone();
        let text = run_blocking(path, move |path| {
            let file = std::fs::File::open(&path)?;
            loader.render(file)
        })
        .await?;

        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(text)])
    }
}
