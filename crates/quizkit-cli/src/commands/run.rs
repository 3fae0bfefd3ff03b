//! The `quizkit run` command.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizkit_core::report::SessionReport;
use quizkit_core::{
    Aggregator, Gateway, Phase, SelectionMode, Session, Shuffler, SourceSelection, TestLength,
};
use quizkit_sources::config::{load_config_from, SourceConfig};
use quizkit_sources::create_source;

const HELP: &str = "Commands: <number> toggle choice, c confirm, n next, p previous, \
f finish, r review, x reset and quit, q quit, h help";

/// One instruction typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// 1-based choice number.
    Toggle(usize),
    Confirm,
    Next,
    Previous,
    Finish,
    Review,
    Reset,
    Quit,
    Help,
}

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Finished,
    Reset,
}

pub async fn execute(
    source: Option<String>,
    length: Option<String>,
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(path) = data_dir {
        config.source = SourceConfig::Directory { path };
    }

    let selection: SourceSelection = source
        .as_deref()
        .unwrap_or(&config.default_source)
        .parse()?;
    let length: TestLength = length
        .as_deref()
        .unwrap_or(&config.default_length)
        .parse()?;

    if let SourceSelection::Named(name) = &selection {
        if config.sources.get(name).is_none() {
            tracing::warn!(source = %name, "source is not in the catalog");
        }
    }

    let question_source = create_source(&config.source, config.timeout_secs)?;
    let gateway = Gateway::new(question_source, config.sources.clone());
    let shuffler = seed.map(Shuffler::seeded).unwrap_or_default();
    let mut session = Session::new(Aggregator::new(gateway), shuffler);

    session
        .start(selection, length)
        .await
        .context("could not start the quiz")?;

    if !session.fallback_sources().is_empty() {
        eprintln!(
            "Warning: using built-in sample questions for: {}",
            session.fallback_sources().join(", ")
        );
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let outcome = drive(&mut session, stdin.lock(), &mut stdout)?;

    if json && outcome == Outcome::Finished {
        if let Some(report) = session.report() {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Feed commands from `input` to the session until the user quits, resets,
/// or input runs out. End of input finishes a quiz still in progress.
fn drive<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<Outcome> {
    writeln!(out, "{HELP}")?;
    render(session, out)?;

    for line in input.lines() {
        let line = line?;
        let Some(commands) = parse_line(&line) else {
            writeln!(out, "Unknown command: {}", line.trim())?;
            writeln!(out, "{HELP}")?;
            continue;
        };
        if commands.is_empty() {
            continue;
        }

        for command in commands {
            match command {
                Command::Toggle(number) => session.toggle_choice(number - 1),
                Command::Confirm => {
                    let recorded = session.confirm().is_some();
                    if !recorded && session.phase() == Phase::InProgress && !session.is_locked() {
                        writeln!(out, "Select at least one answer first.")?;
                    }
                }
                Command::Next => session.next(),
                Command::Previous => session.previous(),
                Command::Finish => session.finish(),
                Command::Review => session.review(),
                Command::Reset => {
                    session.reset();
                    writeln!(out, "Quiz reset.")?;
                    return Ok(Outcome::Reset);
                }
                Command::Quit => {
                    if session.phase() == Phase::InProgress {
                        session.finish();
                        render(session, out)?;
                    }
                    return Ok(Outcome::Finished);
                }
                Command::Help => writeln!(out, "{HELP}")?,
            }
        }
        render(session, out)?;
    }

    if session.phase() == Phase::InProgress {
        session.finish();
        render(session, out)?;
    }
    Ok(Outcome::Finished)
}

/// Parse one input line into commands. Several may be given at once, e.g.
/// `1 3 c`. Returns `None` if any token is not understood.
fn parse_line(line: &str) -> Option<Vec<Command>> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Option<Command> {
    if let Ok(number) = token.parse::<usize>() {
        return (number > 0).then_some(Command::Toggle(number));
    }
    match token.to_ascii_lowercase().as_str() {
        "c" | "confirm" => Some(Command::Confirm),
        "n" | "next" => Some(Command::Next),
        "p" | "prev" | "previous" => Some(Command::Previous),
        "f" | "finish" => Some(Command::Finish),
        "r" | "review" => Some(Command::Review),
        "x" | "reset" => Some(Command::Reset),
        "q" | "quit" => Some(Command::Quit),
        "h" | "help" | "?" => Some(Command::Help),
        _ => None,
    }
}

fn render<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    match session.phase() {
        Phase::Setup => Ok(()),
        Phase::InProgress => render_question(session, out),
        Phase::Results => match session.report() {
            Some(report) => render_results(&report, out),
            None => Ok(()),
        },
    }
}

fn render_question<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let (Some(cursor), Some(question)) = (session.cursor(), session.current_question()) else {
        return Ok(());
    };
    let empty = BTreeSet::new();
    let pending = session.pending_selection().unwrap_or(&empty);

    writeln!(out)?;
    writeln!(
        out,
        "Question {}/{} [{}] {}",
        cursor + 1,
        session.len(),
        question.id,
        question.source
    )?;
    writeln!(out, "{}", question.text)?;
    for (index, choice) in question.choices.iter().enumerate() {
        let mark = if pending.contains(&index) { "x" } else { " " };
        writeln!(out, "  [{mark}] {}. {}", index + 1, choice.label)?;
    }

    match session.answer_at(cursor) {
        Some(record) if record.is_correct => writeln!(out, "Correct.")?,
        Some(_) => writeln!(
            out,
            "Incorrect. Correct answer: {}",
            choice_numbers(&question.correct_indices())
        )?,
        None => match question.selection_mode() {
            SelectionMode::Single => writeln!(out, "Select one answer.")?,
            SelectionMode::Multiple => writeln!(out, "Select all that apply.")?,
        },
    }
    writeln!(
        out,
        "Progress: {}/{} answered, {} correct",
        session.answered_count(),
        session.len(),
        session.correct_count()
    )?;
    Ok(())
}

fn render_results<W: Write>(report: &SessionReport, out: &mut W) -> Result<()> {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Source", "Your answer", "Correct", "Result"]);
    for row in &report.answers {
        let result = match row.is_correct {
            Some(true) => "correct",
            Some(false) => "incorrect",
            None => "unanswered",
        };
        table.add_row(vec![
            Cell::new(row.position + 1),
            Cell::new(&row.question_id),
            Cell::new(&row.source),
            Cell::new(choice_numbers(&row.selected)),
            Cell::new(choice_numbers(&row.correct)),
            Cell::new(result),
        ]);
    }

    writeln!(out, "\nResults\n{table}")?;
    writeln!(
        out,
        "Score: {}/{} ({:.1}%)",
        report.correct,
        report.total,
        report.percentage()
    )?;
    writeln!(
        out,
        "Answered: {}, incorrect: {}, unanswered: {}",
        report.answered,
        report.incorrect(),
        report.unanswered()
    )?;
    writeln!(out, "Type r to review the answers, q to quit.")?;
    Ok(())
}

/// 1-based choice numbers, comma separated; `-` when empty.
fn choice_numbers(indices: &BTreeSet<usize>) -> String {
    if indices.is_empty() {
        return "-".to_string();
    }
    indices
        .iter()
        .map(|i| (i + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
