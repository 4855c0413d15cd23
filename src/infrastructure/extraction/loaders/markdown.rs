//! Markdown loader

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;

use crate::domain::{DocumentLoader, TextBlock};

/// Splits a Markdown file into one block per heading section.
///
/// Text before the first heading becomes its own block without a `header`.
#[derive(Debug, Clone, Default)]
pub struct MarkdownLoader;

#[derive(Debug, Default)]
struct Section {
    header: Option<String>,
    text: String,
}

impl Section {
    fn into_block(self) -> Option<TextBlock> {
        let body = tidy(&self.text);

        match self.header {
            Some(header) => {
                let text = if body.is_empty() {
                    header.clone()
                } else {
                    format!("{}\n{}", header, body)
                };
                Some(TextBlock::new(text).with_metadata("header", header))
            }
            None if body.is_empty() => None,
            None => Some(TextBlock::new(body)),
        }
    }
}

impl MarkdownLoader {
    pub fn new() -> Self {
        Self
    }

    fn split_sections(markdown: &str) -> Vec<TextBlock> {
        let mut blocks = Vec::new();
        let mut section = Section::default();
        let mut in_heading = false;
        let mut current_heading = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::Heading(..)) => {
                    in_heading = true;
                    current_heading.clear();
                }
                Event::End(Tag::Heading(..)) => {
                    in_heading = false;
                    if let Some(block) = std::mem::take(&mut section).into_block() {
                        blocks.push(block);
                    }
                    section.header = Some(current_heading.trim().to_string());
                }
                Event::Text(t) | Event::Code(t) => {
                    if in_heading {
                        current_heading.push_str(&t);
                    } else {
                        section.text.push_str(&t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if in_heading {
                        current_heading.push(' ');
                    } else {
                        section.text.push(' ');
                    }
                }
                Event::Start(Tag::Paragraph) | Event::Start(Tag::CodeBlock(_)) => {
                    if !section.text.is_empty() && !section.text.ends_with('\n') {
                        section.text.push('\n');
                    }
                }
                Event::End(Tag::Paragraph) | Event::End(Tag::CodeBlock(_)) => {
                    section.text.push('\n');
                }
                Event::Start(Tag::Item) => {
                    if !section.text.is_empty() && !section.text.ends_with('\n') {
                        section.text.push('\n');
                    }
                    section.text.push_str("• ");
                }
                Event::End(Tag::Item) => {
                    if !section.text.ends_with('\n') {
                        section.text.push('\n');
                    }
                }
                _ => {}
            }
        }

        if let Some(block) = section.into_block() {
            blocks.push(block);
        }

        blocks
    }
}

fn tidy(text: &str) -> String {
    text.lines()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[async_trait]
impl DocumentLoader for MarkdownLoader {
    fn name(&self) -> &'static str {
        "markdown"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let markdown = tokio::fs::read_to_string(path).await?;
        Ok(Self::split_sections(&markdown))
    }
}
