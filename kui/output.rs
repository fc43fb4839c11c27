use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::cli::OutputFormat;

#[cfg(test)]
#[path = "./output.tests.rs"]
mod output_tests;

/// Renders `value` in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };

    if !text.ends_with('\n') {
        text.push('\n');
    }

    Ok(text)
}

/// Writes `value` to the standard output in the requested format.
pub fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let text = render(value, format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
