//! Init Command
//!
//! Writes a commented default testilens.toml into the current
//! directory.

use crate::cli::output::Output;
use crate::config::ConfigLoader;

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = ConfigLoader::init_project(force)?;

    let output = Output::new();
    output.success(&format!("Created {}", path.display()));
    output.info("Set GEMINI_API_KEY, then run: testilens analyze --input <file>");

    Ok(())
}
