//! The `quizkit list-sources` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizkit_sources::config::{load_config_from, SourceConfig};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Label"]);
    for source in config.sources.sources() {
        table.add_row(vec![Cell::new(&source.name), Cell::new(&source.label)]);
    }
    println!("{table}");

    match &config.source {
        SourceConfig::Http { base_url } => println!("Backend: http ({base_url})"),
        SourceConfig::Directory { path } => println!("Backend: directory ({})", path.display()),
    }
    println!(
        "Defaults: source {}, length {}",
        config.default_source, config.default_length
    );

    Ok(())
}
