use clap::Parser;
use pmp_doc_extract::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => cli::extract::run(args).await,
        Command::Formats(args) => cli::formats::run(args).await,
    }
}
