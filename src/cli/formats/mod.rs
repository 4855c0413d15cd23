//! Formats command - lists the extractor registry

use clap::Args;

use super::{bootstrap, ExtractionOverrides};
use crate::domain::{ExtractionStrategy, ExtractorRegistry};
use crate::infrastructure::ExtractorFactory;

/// Arguments for the formats command
#[derive(Args, Clone, Debug)]
pub struct FormatsArgs {
    #[command(flatten)]
    pub overrides: ExtractionOverrides,
}

/// Run the formats command
pub async fn run(args: FormatsArgs) -> anyhow::Result<()> {
    let config = bootstrap(&args.overrides);
    let registry = ExtractorFactory::create_registry(
        &config.extraction,
        ExtractorFactory::create_ocr_engine(&config.extraction),
    )?;

    for line in render(&registry) {
        println!("{}", line);
    }

    Ok(())
}

fn render(registry: &ExtractorRegistry) -> Vec<String> {
    let mut lines: Vec<String> = registry
        .bindings()
        .into_iter()
        .map(|(extension, strategy)| match strategy {
            ExtractionStrategy::Local(loader) => format!("{:<8} {}", extension, loader.name()),
            ExtractionStrategy::Remote { endpoint, loader } => {
                format!("{:<8} {} ({})", extension, loader.name(), endpoint)
            }
        })
        .collect();

    lines.push(format!("{:<8} plain text", "*"));
    lines
}
