//! Unix mailbox loader

use async_trait::async_trait;
use mailparse::{MailHeaderMap, ParsedMail};
use std::path::Path;

use crate::domain::{DocumentLoader, TextBlock};

/// Loads an mbox file as one block per message
#[derive(Debug, Clone, Default)]
pub struct MboxLoader {
    max_messages: Option<usize>,
}

impl MboxLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after the first `max` messages
    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = Some(max);
        self
    }

    fn render(message: &ParsedMail<'_>) -> anyhow::Result<String> {
        let header = |name: &str| message.headers.get_first_value(name).unwrap_or_default();

        Ok(format!(
            "Date: {}\nFrom: {}\nTo: {}\nSubject: {}\nContent: {}",
            header("Date"),
            header("From"),
            header("To"),
            header("Subject"),
            plain_body(message)?.trim()
        ))
    }
}

/// Text of the first `text/plain` part, or the top-level body for single-part mail
fn plain_body(message: &ParsedMail<'_>) -> anyhow::Result<String> {
    if message.subparts.is_empty() {
        return Ok(message.get_body()?);
    }

    for part in &message.subparts {
        if part.ctype.mimetype == "text/plain" {
            return Ok(part.get_body()?);
        }
        if part.ctype.mimetype.starts_with("multipart/") {
            let body = plain_body(part)?;
            if !body.is_empty() {
                return Ok(body);
            }
        }
    }

    Ok(String::new())
}

/// Split a mailbox into raw messages on `From ` separator lines
fn split_messages(mailbox: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in mailbox.lines() {
        if line.starts_with("From ") {
            if let Some(lines) = current.take() {
                messages.push(lines.join("\n"));
            }
            current = Some(Vec::new());
            continue;
        }

        if let Some(lines) = current.as_mut() {
            // mboxrd quoting
            let unquoted = line
                .strip_prefix('>')
                .filter(|rest| rest.trim_start_matches('>').starts_with("From "));
            lines.push(unquoted.unwrap_or(line));
        }
    }

    if let Some(lines) = current {
        messages.push(lines.join("\n"));
    }

    messages
}

#[async_trait]
impl DocumentLoader for MboxLoader {
    fn name(&self) -> &'static str {
        "mbox"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let raw = tokio::fs::read(path).await?;
        let mailbox = String::from_utf8_lossy(&raw);

        let limit = self.max_messages.unwrap_or(usize::MAX);
        let mut blocks = Vec::new();

        for raw_message in split_messages(&mailbox).iter().take(limit) {
            let message = mailparse::parse_mail(raw_message.as_bytes())?;
            blocks.push(TextBlock::new(Self::render(&message)?));
        }

        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAILBOX: &str = "From alice@example.com Mon Jan  1 10:00:00 2024\n\
From: Alice <alice@example.com>\n\
To: Bob <bob@example.com>\n\
Subject: Quarterly numbers\n\
Date: Mon, 1 Jan 2024 10:00:00 +0000\n\
\n\
Numbers attached.\n\
>From the finance team.\n\
\n\
From bob@example.com Tue Jan  2 11:00:00 2024\n\
From: Bob <bob@example.com>\n\
To: Alice <alice@example.com>\n\
Subject: Re: Quarterly numbers\n\
Content-Type: multipart/alternative; boundary=\"b1\"\n\
\n\
--b1\n\
Content-Type: text/plain\n\
\n\
Thanks!\n\
--b1\n\
Content-Type: text/html\n\
\n\
<p>Thanks!</p>\n\
--b1--\n";

    #[test]
    fn test_split_messages() {
        let messages = split_messages(MAILBOX);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("\nFrom the finance team."));
        assert!(messages[1].starts_with("From: Bob"));
    }

    #[tokio::test]
    async fn test_load_one_block_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.mbox");
        std::fs::write(&path, MAILBOX).unwrap();

        let blocks = MboxLoader::new().load(&path).await.unwrap();

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].text.starts_with("Date: Mon, 1 Jan 2024 10:00:00 +0000\n"));
        assert!(blocks[0].text.contains("Subject: Quarterly numbers"));
        assert!(blocks[0].text.contains("Content: Numbers attached."));
        assert!(blocks[1].text.contains("From: Bob <bob@example.com>"));
        assert!(blocks[1].text.ends_with("Content: Thanks!"));
    }

    #[tokio::test]
    async fn test_max_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.mbox");
        std::fs::write(&path, MAILBOX).unwrap();

        let blocks = MboxLoader::new().with_max_messages(1).load(&path).await.unwrap();

        assert_eq!(blocks.len(), 1);
    }
}
