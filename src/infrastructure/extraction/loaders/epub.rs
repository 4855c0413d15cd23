//! EPUB loader

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;

use super::{read_zip_entry, run_blocking};
use crate::domain::{DocumentLoader, TextBlock};

/// Block elements whose closing tag ends a paragraph
const BLOCK_ELEMENTS: &[&[u8]] = &[
    b"h1", b"h2", b"h3", b"h4", b"h5", b"h6",
    b"p", b"li", b"dt", b"dd",
    b"td", b"th",
    b"pre", b"blockquote", b"figcaption",
];

/// Elements whose content is never rendered
const SKIP_ELEMENTS: &[&[u8]] = &[b"script", b"style", b"head"];

/// Loader for EPUB books: one block with the spine content in reading order.
///
/// container.xml → OPF → spine → each XHTML document.
#[derive(Debug, Clone, Default)]
pub struct EpubLoader;

impl EpubLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for EpubLoader {
    fn name(&self) -> &'static str {
        "epub"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let paragraphs = run_blocking(path, |path| {
            let file = std::fs::File::open(&path)?;
            let mut archive = zip::ZipArchive::new(file)?;

            let container = read_zip_entry(&mut archive, "META-INF/container.xml")?;
            let opf_path = find_opf_path(&container)?;
            let opf = read_zip_entry(&mut archive, &opf_path)?;
            let opf_dir = opf_path.rfind('/').map(|i| &opf_path[..i]).unwrap_or("");

            let mut paragraphs = Vec::new();
            for href in spine_hrefs(&opf, opf_dir) {
                // Missing spine items are skipped rather than failing the book
                if let Ok(xhtml) = read_zip_entry(&mut archive, &href) {
                    paragraphs.extend(xhtml_paragraphs(&xhtml));
                }
            }
            Ok(paragraphs)
        })
        .await?;

        if paragraphs.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TextBlock::new(paragraphs.join("\n"))])
    }
}

fn find_opf_path(xml: &str) -> anyhow::Result<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path") {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    anyhow::bail!("rootfile not found in META-INF/container.xml")
}

/// Content documents listed in the spine, resolved against the OPF directory
fn spine_hrefs(opf: &str, opf_dir: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(opf);
    let mut manifest: HashMap<String, String> = HashMap::new();
    let mut spine: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => {
                    if let (Some(id), Some(href)) = (attribute(&e, b"id"), attribute(&e, b"href")) {
                        let full = if opf_dir.is_empty() {
                            href
                        } else {
                            format!("{}/{}", opf_dir, href)
                        };
                        manifest.insert(id, full);
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref") {
                        spine.push(idref);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    spine
        .into_iter()
        .filter_map(|id| manifest.get(&id).cloned())
        .collect()
}

fn xhtml_paragraphs(xml: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut skip_depth: usize = 0;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if SKIP_ELEMENTS.contains(&e.local_name().as_ref()) {
                    skip_depth += 1;
                }
            }
            Ok(Event::End(e)) => {
                let local = e.local_name();
                if SKIP_ELEMENTS.contains(&local.as_ref()) {
                    skip_depth = skip_depth.saturating_sub(1);
                } else if skip_depth == 0 && BLOCK_ELEMENTS.contains(&local.as_ref()) {
                    let text = current.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                    current.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if skip_depth == 0 {
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

fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::super::office::fixtures::write_zip;
    use super::*;

    const CONTAINER: &str = r#"<?xml version="1.0"?>
<container><rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles></container>"#;

    const OPF: &str = r#"<?xml version="1.0"?>
<package><manifest>
  <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
</manifest>
<spine><itemref idref="ch1"/><itemref idref="ch2"/><itemref idref="missing"/></spine></package>"#;

    #[test]
    fn test_spine_order_follows_itemrefs() {
        assert_eq!(
            spine_hrefs(OPF, "OEBPS"),
            vec!["OEBPS/ch1.xhtml", "OEBPS/ch2.xhtml"]
        );
    }

    #[test]
    fn test_xhtml_paragraphs_skip_head_and_script() {
        let xhtml = "<html><head><title>Ignored</title></head><body>\
            <h1>Chapter  One</h1><script>var x;</script><p>It was a\n dark night.</p></body></html>";
        assert_eq!(xhtml_paragraphs(xhtml), vec!["Chapter One", "It was a dark night."]);
    }

    #[tokio::test]
    async fn test_epub_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        write_zip(
            &path,
            &[
                ("META-INF/container.xml", CONTAINER),
                ("OEBPS/content.opf", OPF),
                ("OEBPS/ch1.xhtml", "<html><body><p>First</p></body></html>"),
                ("OEBPS/ch2.xhtml", "<html><body><p>Second</p></body></html>"),
            ],
        );

        let blocks = EpubLoader::new().load(&path).await.unwrap();

        assert_eq!(blocks, vec![TextBlock::new("First\nSecond")]);
    }

    #[tokio::test]
    async fn test_epub_without_container_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");
        write_zip(&path, &[("mimetype", "application/epub+zip")]);

        assert!(EpubLoader::new().load(&path).await.is_err());
    }
}
