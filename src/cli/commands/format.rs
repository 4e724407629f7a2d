//! Format command - replay a captured exchange through the traffic formatter.

use crate::traffic::{highlight, RecordedExchange, TrafficFormatter};
use anyhow::{Context, Result};
use std::io::Read;

/// Run the format command.
pub fn run_format(file: &str, plain: bool) -> Result<()> {
    let content = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read capture from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?
    };

    let record = RecordedExchange::from_json(&content)
        .with_context(|| format!("Invalid capture in {}", file))?
        .into_record()?;

    let formatter = if plain || !console::Term::stdout().features().colors_supported() {
        TrafficFormatter::plain()
    } else {
        TrafficFormatter::new(highlight::active())
    };

    println!("{}", formatter.format(&record));
    Ok(())
}
