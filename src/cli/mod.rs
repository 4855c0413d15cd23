//! CLI module for PMP document extraction
//!
//! Provides subcommands:
//! - `extract`: extract one or more files into JSON document records
//! - `formats`: list the extension bindings of the extractor registry

pub mod extract;
pub mod formats;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// PMP Doc Extract - Turn heterogeneous files into normalized text records
#[derive(Parser)]
#[command(name = "pmp-doc-extract")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract files and print their records as JSON
    Extract(extract::ExtractArgs),

    /// List supported extensions and the strategy serving each
    Formats(formats::FormatsArgs),
}

/// Settings shared by every subcommand that builds a pipeline
#[derive(Args, Clone, Debug, Default)]
pub struct ExtractionOverrides {
    /// Remote layout parser endpoint (overrides config)
    #[arg(long)]
    pub remote_parser_url: Option<String>,

    /// OCR language code for images and scanned PDFs (overrides config)
    #[arg(long)]
    pub ocr_language: Option<String>,
}

impl ExtractionOverrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.remote_parser_url {
            config.extraction.remote_parser_url = Some(url.clone());
        }
        if let Some(language) = &self.ocr_language {
            config.extraction.ocr.language = language.clone();
        }
    }
}

/// Load `.env` and layered config, apply flag overrides, start logging
pub(crate) fn bootstrap(overrides: &ExtractionOverrides) -> AppConfig {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    overrides.apply(&mut config);
    logging::init_logging(&config.logging);

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_command() {
        let cli = Cli::try_parse_from([
            "pmp-doc-extract",
            "extract",
            "--ocr-language",
            "eng",
            "a.pdf",
            "b.md",
        ])
        .unwrap();

        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.overrides.ocr_language.as_deref(), Some("eng"));
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_extract_requires_files() {
        assert!(Cli::try_parse_from(["pmp-doc-extract", "extract"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = AppConfig::default();
        let overrides = ExtractionOverrides {
            remote_parser_url: Some("http://parser:5010/api/parseDocument".to_string()),
            ocr_language: Some("kor".to_string()),
        };

        overrides.apply(&mut config);

        assert_eq!(
            config.extraction.remote_parser_url(),
            Some("http://parser:5010/api/parseDocument")
        );
        assert_eq!(config.extraction.ocr.language, "kor");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = AppConfig::default();
        ExtractionOverrides::default().apply(&mut config);
        assert!(config.extraction.remote_parser_url().is_none());
        assert_eq!(config.extraction.ocr.language, "rus");
    }
}
