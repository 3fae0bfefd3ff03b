//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::parser;

pub fn execute(path: PathBuf) -> Result<()> {
    let files = if path.is_dir() {
        parser::find_question_files(&path)?
    } else {
        vec![path]
    };

    let mut total_warnings = 0;

    for file in &files {
        let (set, dropped) = parser::parse_question_file(file)?;
        println!("Question set: {} ({} questions)", set.name, set.questions.len());

        for position in &dropped {
            println!(
                "  [record #{}] WARNING: dropped record with no question text or answers",
                position + 1
            );
        }

        let warnings = parser::validate_question_set(&set);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len() + dropped.len();
    }

    if files.is_empty() {
        println!("No question sets found.");
    } else if total_warnings == 0 {
        println!("All question sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
