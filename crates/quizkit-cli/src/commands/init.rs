//! The `quizkit init` command.

use std::path::Path;

use anyhow::Result;

use quizkit_core::fallback_set;
use quizkit_core::parser::question_to_record;

pub fn execute() -> Result<()> {
    // Create quizkit.toml
    if Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    // Create a sample question set
    std::fs::create_dir_all("data")?;
    let sample_path = Path::new("data/NI.json");
    if sample_path.exists() {
        println!("data/NI.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, sample_question_set()?)?;
        println!("Created data/NI.json");
    }

    println!("\nNext steps:");
    println!("  1. Add more question sets to data/ (one JSON file per source)");
    println!("  2. Run: quizkit validate --path data");
    println!("  3. Run: quizkit run --source NI");

    Ok(())
}

fn sample_question_set() -> Result<String> {
    let set = fallback_set("NI", "Nautical Institute");
    let records: Vec<_> = set.questions.iter().map(question_to_record).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

default_source = "NI"
default_length = "30"
timeout_secs = 10

[source]
type = "directory"
path = "data"

# To serve question sets over HTTP instead:
# [source]
# type = "http"
# base_url = "${QUIZKIT_BASE_URL}"

[[sources]]
name = "NI"
label = "Nautical Institute"

[[sources]]
name = "K"
label = "Kelson"

[[sources]]
name = "EX"
label = "Exam"
"#;
