//! studyquiz CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use studyquiz_core::model::TypeFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyquiz", version, about = "Terminal quiz sessions over subject question banks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz
    Run {
        /// Subject id (default: from config)
        #[arg(long)]
        subject: Option<String>,

        /// Chapter name; unknown names fall back to all chapters
        #[arg(long)]
        chapter: Option<String>,

        /// Question type: all, text, multiple-choice, true-false
        #[arg(long = "type", default_value = "all")]
        question_type: TypeFilter,

        /// Question bank file or directory (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Seed for reproducible question sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the session report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Print the session report as markdown instead of a table
        #[arg(long, conflicts_with = "json")]
        markdown: bool,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List subjects and chapters
    List {
        /// Question bank file or directory (default: from config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("studyquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            subject,
            chapter,
            question_type,
            bank,
            seed,
            config,
            json,
            markdown,
        } => {
            commands::run::execute(commands::run::RunArgs {
                subject,
                chapter,
                question_type,
                bank,
                seed,
                config,
                json,
                markdown,
            })
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { bank, config } => commands::list::execute(bank, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
