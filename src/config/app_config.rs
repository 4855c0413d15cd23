use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub extraction: ExtractionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Extraction pipeline settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Remote parsing endpoint; `None` keeps every format on local parsers
    pub remote_parser_url: Option<String>,
    pub ocr: OcrSettings,
    /// How many files the CLI extracts at once
    pub concurrency: usize,
}

/// Image-based fallback settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub language: String,
    pub rasterizer_command: String,
    pub dpi: u32,
    pub engine_command: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            remote_parser_url: None,
            ocr: OcrSettings::default(),
            concurrency: 4,
        }
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "rus".to_string(),
            rasterizer_command: "pdftoppm".to_string(),
            dpi: 200,
            engine_command: "tesseract".to_string(),
        }
    }
}

impl ExtractionSettings {
    /// Remote endpoint with blank values treated as unset
    pub fn remote_parser_url(&self) -> Option<&str> {
        self.remote_parser_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
