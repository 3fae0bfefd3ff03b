//! quizkit CLI — randomized practice tests in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Randomized multiple-choice practice tests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a practice test, answering on stdin
    Run {
        /// Question source to draw from (e.g. "NI", "K", or "all")
        #[arg(long)]
        source: Option<String>,

        /// Test length: "30", "all", or any positive number
        #[arg(long)]
        length: Option<String>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Read question sets from this directory instead of the configured source
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the session report as JSON when the quiz ends
        #[arg(long)]
        json: bool,
    },

    /// Validate question-set JSON files
    Validate {
        /// Path to a question-set file or directory
        #[arg(long)]
        path: PathBuf,
    },

    /// List the catalogued question sources
    ListSources {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and sample question set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            source,
            length,
            seed,
            data_dir,
            config,
            json,
        } => commands::run::execute(source, length, seed, data_dir, config, json).await,
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::ListSources { config } => commands::list_sources::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
