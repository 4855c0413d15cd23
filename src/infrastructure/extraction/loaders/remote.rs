//! LLMSherpa-compatible remote layout parser

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::domain::{keys, RemoteDocumentLoader, TextBlock};

/// Endpoint of a locally running parser service with the usual query flags
pub const DEFAULT_REMOTE_PARSER_URL: &str =
    "http://localhost:5010/api/parseDocument?renderFormat=all&useNewIndentParser=yes";

const HEADER_TAG: &str = "header";
const TABLE_TAG: &str = "table";
const PAGE_IDX: &str = "page_idx";

#[derive(Debug, Deserialize)]
struct ParseResponse {
    return_dict: ReturnDict,
}

#[derive(Debug, Deserialize)]
struct ReturnDict {
    result: ParseResult,
}

#[derive(Debug, Deserialize)]
struct ParseResult {
    #[serde(default)]
    blocks: Vec<LayoutBlock>,
}

#[derive(Debug, Deserialize)]
struct LayoutBlock {
    tag: String,
    #[serde(default)]
    level: usize,
    #[serde(default)]
    page_idx: Option<u64>,
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(default)]
    table_rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    cells: Vec<TableCell>,
    #[serde(default)]
    cell_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    cell_value: serde_json::Value,
}

impl LayoutBlock {
    fn text(&self) -> String {
        if self.tag == TABLE_TAG {
            return self
                .table_rows
                .iter()
                .map(TableRow::text)
                .filter(|row| !row.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
        }

        self.sentences.join(" ")
    }
}

impl TableRow {
    fn text(&self) -> String {
        if let Some(value) = &self.cell_value {
            return value.trim().to_string();
        }

        self.cells
            .iter()
            .map(|cell| match &cell.cell_value {
                serde_json::Value::String(s) => s.trim().to_string(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Uploads documents to a layout-parsing service and turns the returned
/// blocks into text chunks, each prefixed by its header trail
#[derive(Debug, Clone, Default)]
pub struct RemoteParserLoader {
    client: reqwest::Client,
}

impl RemoteParserLoader {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Bytes of the document plus the file name to upload it under
    async fn fetch(&self, document: &str) -> anyhow::Result<(Vec<u8>, String)> {
        let file_name = document
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(|segment| segment.split(['?', '#']).next().unwrap_or(segment))
            .unwrap_or("document")
            .to_string();

        if document.starts_with("http://") || document.starts_with("https://") {
            let response = self.client.get(document).send().await?.error_for_status()?;
            let bytes = response.bytes().await?;
            return Ok((bytes.to_vec(), file_name));
        }

        let bytes = tokio::fs::read(document).await?;
        Ok((bytes, file_name))
    }

    fn to_blocks(blocks: Vec<LayoutBlock>) -> Vec<TextBlock> {
        let mut trail: Vec<(usize, String)> = Vec::new();
        let mut chunks = Vec::new();

        for block in blocks {
            let text = block.text();

            if block.tag == HEADER_TAG {
                trail.retain(|(level, _)| *level < block.level);
                trail.push((block.level, text));
                continue;
            }

            if text.trim().is_empty() {
                continue;
            }

            let context = trail
                .iter()
                .map(|(_, header)| header.as_str())
                .collect::<Vec<_>>()
                .join(" > ");

            let content = if context.is_empty() {
                text
            } else {
                format!("{}\n{}", context, text)
            };

            let mut chunk = TextBlock::new(content).with_metadata(keys::CHUNK_TYPE, block.tag);
            if let Some(page) = block.page_idx {
                chunk = chunk.with_metadata(PAGE_IDX, page);
            }
            chunks.push(chunk);
        }

        chunks
    }
}

#[async_trait]
impl RemoteDocumentLoader for RemoteParserLoader {
    fn name(&self) -> &'static str {
        "remote_parser"
    }

    async fn load(&self, endpoint: &str, document: &str) -> anyhow::Result<Vec<TextBlock>> {
        let (bytes, file_name) = self.fetch(document).await?;
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

        tracing::debug!(endpoint = %endpoint, file_name = %file_name, bytes = bytes.len(), "Uploading document to remote parser");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        let response = self.client.post(endpoint).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Remote parser error: {} - {}", status, body);
        }

        let parsed: ParseResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse remote parser response: {}", e))?;

        Ok(Self::to_blocks(parsed.return_dict.result.blocks))
    }
}
