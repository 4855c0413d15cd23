//! Office Open XML loaders (DOCX, PPTX)

use async_trait::async_trait;
use quick_xml::events::Event;
use std::path::Path;

use super::{read_zip_entry, run_blocking};
use crate::domain::{DocumentLoader, TextBlock};

/// Loader for Word documents: one block with every non-empty paragraph
#[derive(Debug, Clone, Default)]
pub struct DocxLoader;

impl DocxLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for DocxLoader {
    fn name(&self) -> &'static str {
        "docx"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let paragraphs = run_blocking(path, |path| {
            let file = std::fs::File::open(&path)?;
            let mut archive = zip::ZipArchive::new(file)?;
            let xml = read_zip_entry(&mut archive, "word/document.xml")?;
            Ok(collect_paragraphs(&xml, b"w:p", b"w:t"))
        })
        .await?;

        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(paragraphs.join("\n"))])
    }
}

/// Loader for PowerPoint decks: one block, slides in numeric order
#[derive(Debug, Clone, Default)]
pub struct PptxLoader;

impl PptxLoader {
    pub fn new() -> Self {
        Self
    }

    fn slide_number(name: &str) -> Option<u32> {
        name.strip_prefix("ppt/slides/slide")
            .and_then(|s| s.strip_suffix(".xml"))
            .and_then(|s| s.parse().ok())
    }
}

#[async_trait]
impl DocumentLoader for PptxLoader {
    fn name(&self) -> &'static str {
        "pptx"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let slides = run_blocking(path, |path| {
            let file = std::fs::File::open(&path)?;
            let mut archive = zip::ZipArchive::new(file)?;

            let mut slide_names: Vec<(u32, String)> = archive
                .file_names()
                .filter_map(|name| Self::slide_number(name).map(|n| (n, name.to_string())))
                .collect();
            slide_names.sort_by_key(|(n, _)| *n);

            let mut slides = Vec::with_capacity(slide_names.len());
            for (_, name) in slide_names {
                let xml = read_zip_entry(&mut archive, &name)?;
                slides.push(collect_paragraphs(&xml, b"a:p", b"a:t").join("\n"));
            }
            Ok(slides)
        })
        .await?;

        let text = slides
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(index, text)| format!("Slide #{}:\n{}", index + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n");

        if text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(text)])
    }
}

/// Collect non-empty paragraphs, joining the text runs inside each one
fn collect_paragraphs(xml: &str, paragraph_tag: &[u8], text_tag: &[u8]) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == text_tag {
                    in_text = true;
                } else if e.name().as_ref() == paragraph_tag {
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == text_tag {
                    in_text = false;
                } else if e.name().as_ref() == paragraph_tag {
                    let text = current.trim().to_string();
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                    current.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Ok(text) = e.unescape() {
                        current.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    paragraphs
}
