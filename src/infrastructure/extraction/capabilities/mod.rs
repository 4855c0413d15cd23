//! Command-line backed OCR capabilities

mod pdftoppm;
mod tesseract;

pub use pdftoppm::PdftoppmRasterizer;
pub use tesseract::TesseractOcr;

use tokio::process::Command;

/// Whether `command` can be spawned at all. Exit status is ignored since
/// some tools exit non-zero when only printing their version.
pub(crate) async fn probe(command: &str, version_flag: &str) -> bool {
    let available = Command::new(command)
        .arg(version_flag)
        .output()
        .await
        .is_ok();

    if !available {
        tracing::debug!(command = %command, "Command is not available");
    }

    available
}

/// Run `command`, returning stdout or an error carrying stderr
pub(crate) async fn run(command: &mut Command, program: &str) -> anyhow::Result<Vec<u8>> {
    let output = command
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("failed to run {}: {}", program, e))?;

    if !output.status.success() {
        anyhow::bail!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(output.stdout)
}
