use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
///
/// Every extraction call fails independently; nothing in here is retried.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No reader found for extension={extension:?}, file_name={file_name}")]
    UnsupportedFormat {
        extension: String,
        file_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Extraction failed for {file_name}")]
    ExtractionFailed {
        file_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("No text extracted from PDF: {file_name}")]
    NoTextExtracted {
        file_name: String,
        #[source]
        source: Box<ExtractionError>,
    },

    #[error("Missing capability: {capability} ({hint})")]
    MissingCapability { capability: String, hint: String },
}

impl ExtractionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unsupported_format(
        extension: impl Into<String>,
        file_name: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    pub fn extraction_failed(file_name: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::ExtractionFailed {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    pub fn no_text_extracted(file_name: impl Into<String>, source: ExtractionError) -> Self {
        Self::NoTextExtracted {
            file_name: file_name.into(),
            source: Box::new(source),
        }
    }

    pub fn missing_capability(capability: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingCapability {
            capability: capability.into(),
            hint: hint.into(),
        }
    }

    /// Configuration-class failures: the process setup is wrong, not the file.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration { .. } | Self::MissingCapability { .. } => true,
            Self::NoTextExtracted { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}
