//! Extract command - runs files through the ingestion pipeline

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::{bootstrap, ExtractionOverrides};
use crate::domain::{DocumentRecord, ExtractionError};
use crate::infrastructure::ExtractorFactory;

/// Arguments for the extract command
#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Files to extract
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Files processed at once (overrides config)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub overrides: ExtractionOverrides,
}

/// One JSON document per input file
#[derive(Debug, Serialize)]
struct FileOutput<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [DocumentRecord]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> FileOutput<'a> {
    fn new(file: &Path, result: &'a Result<Vec<DocumentRecord>, ExtractionError>) -> Self {
        let file = file.display().to_string();
        match result {
            Ok(records) => Self {
                file,
                records: Some(records),
                error: None,
            },
            Err(e) => Self {
                file,
                records: None,
                error: Some(error_chain(e)),
            },
        }
    }
}

/// Error message followed by its causes
fn error_chain(error: &ExtractionError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

/// Run the extract command
pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let config = bootstrap(&args.overrides);
    let pipeline = ExtractorFactory::create_pipeline(&config.extraction)?;
    let concurrency = args.concurrency.unwrap_or(config.extraction.concurrency);

    info!(files = args.files.len(), concurrency, "Extracting files");

    let inputs = args
        .files
        .iter()
        .map(|path| (path.to_string_lossy().into_owned(), path.clone()));
    let results = pipeline.extract_many(inputs, concurrency).await;

    let mut failed = 0;
    for (path, result) in args.files.iter().zip(&results) {
        if let Err(e) = result {
            failed += 1;
            error!(file = %path.display(), fatal = e.is_fatal(), "Extraction failed: {}", error_chain(e));
        }

        let output = FileOutput::new(path, result);
        let json = if args.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        println!("{}", json);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed to extract", failed, args.files.len());
    }

    Ok(())
}
