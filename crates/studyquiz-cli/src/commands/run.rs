//! The `studyquiz run` command.
//!
//! Reads one line per step from stdin: an answer (option number for multiple
//! choice, `true`/`false`, or free text), or one of `:reveal`, `:next`,
//! `:reset`, `:quit`, `:help`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};

use studyquiz_core::bank::QuestionBank;
use studyquiz_core::engine::{AdvanceResult, EngineConfig, QuizEngine, SessionStatus};
use studyquiz_core::error::QuizError;
use studyquiz_core::model::{QuestionKind, QuizQuestion, TypeFilter};
use studyquiz_core::report::SessionReport;
use studyquiz_scorers::config::{create_evaluator, load_config_from};
use studyquiz_scorers::keepalive::KeepAlive;

pub struct RunArgs {
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub question_type: TypeFilter,
    pub bank: Option<PathBuf>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub markdown: bool,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let bank_path = args.bank.unwrap_or_else(|| config.bank_dir.clone());
    let bank = QuestionBank::load(&bank_path)?;
    anyhow::ensure!(!bank.is_empty(), "no subjects found in {}", bank_path.display());
    tracing::debug!("loaded {} subject(s) from {}", bank.len(), bank_path.display());

    let evaluator = create_evaluator(&config.scorer)?;
    let mut engine = QuizEngine::new(
        Arc::new(bank),
        evaluator,
        EngineConfig {
            session_size: config.session_size,
        },
    );
    if let Some(seed) = args.seed {
        engine = engine.with_rng(StdRng::seed_from_u64(seed));
    }

    let keep_alive = if config.keep_alive.is_enabled() {
        Some(KeepAlive::start(&config.keep_alive)?)
    } else {
        None
    };

    // With --json, stdout carries only the report.
    let mut out: Box<dyn Write> = if args.json {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };

    let subject = args.subject.unwrap_or_else(|| config.default_subject.clone());
    let finished = match engine.select(&subject, args.chapter.as_deref(), args.question_type) {
        Ok(_) => run_session(&engine, &mut out).await,
        Err(e @ QuizError::NoQuestionsAvailable { .. }) => {
            writeln!(out, "{e}. Try another chapter or question type.")?;
            Ok(false)
        }
        Err(e) => {
            let available: Vec<&str> = engine
                .provider()
                .subjects()
                .iter()
                .map(|s| s.id.as_str())
                .collect();
            Err(anyhow::anyhow!("{e} (available: {})", available.join(", ")))
        }
    };

    if let Some(handle) = keep_alive {
        handle.stop().await;
    }

    if !finished? {
        return Ok(());
    }

    let report = engine
        .report()
        .context("session finished without a report")?;
    if args.json {
        println!("{}", report.to_json()?);
    } else if args.markdown {
        println!("\n{}", report.to_markdown());
    } else {
        print_results(&report);
    }

    Ok(())
}

enum Input<'a> {
    Reveal,
    Next,
    Reset,
    Quit,
    Help,
    Answer(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" | ":next" | ":n" => Input::Next,
            ":reveal" | ":r" => Input::Reveal,
            ":reset" => Input::Reset,
            ":quit" | ":q" => Input::Quit,
            ":help" | ":h" => Input::Help,
            answer => Input::Answer(answer),
        }
    }
}

/// Drive the session from stdin. Returns whether it completed.
async fn run_session(engine: &QuizEngine, out: &mut dyn Write) -> Result<bool> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown: Option<(u64, usize)> = None;

    loop {
        let (index, total, revealed) = match engine.status() {
            SessionStatus::InProgress {
                index,
                total,
                revealed,
            } => (index, total, revealed),
            SessionStatus::Complete(_) => return Ok(true),
            SessionStatus::Empty(e) => {
                writeln!(out, "{e}")?;
                return Ok(false);
            }
            SessionStatus::Idle | SessionStatus::Evaluating { .. } => return Ok(false),
        };
        let question = engine
            .current_question()
            .context("session in progress without a current question")?;

        let position = (engine.generation(), index);
        if shown != Some(position) {
            print_question(out, &question, index, total)?;
            shown = Some(position);
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out, "\nInput ended before the quiz was finished.")?;
            return Ok(false);
        };

        match Input::parse(&line) {
            Input::Quit => {
                writeln!(out, "Quiz abandoned.")?;
                return Ok(false);
            }
            Input::Help => print_help(out)?,
            Input::Reveal => {
                engine.reveal();
                print_answer(out, &question)?;
            }
            Input::Reset => {
                engine.reset()?;
                writeln!(out, "Started a new session.")?;
            }
            Input::Next => step(engine, out, index, total).await?,
            Input::Answer(text) => match raw_answer(&question, text) {
                Some(raw) => {
                    if revealed || !engine.capture_answer(&question.id, raw) {
                        writeln!(out, "Answer not recorded: already revealed.")?;
                    }
                    step(engine, out, index, total).await?;
                }
                None => writeln!(out, "{}", answer_hint(&question))?,
            },
        }
    }
}

async fn step(engine: &QuizEngine, out: &mut dyn Write, index: usize, total: usize) -> Result<()> {
    if index + 1 == total && engine.current_answer().is_some() {
        writeln!(out, "Scoring {total} answer(s)...")?;
    }
    match engine.advance().await {
        AdvanceResult::Blocked => {
            writeln!(out, "Answer the question or type :reveal first.")?;
        }
        AdvanceResult::Discarded => {
            writeln!(out, "The session changed while scoring; results discarded.")?;
        }
        AdvanceResult::Moved { .. } | AdvanceResult::Completed(_) | AdvanceResult::Ignored => {}
    }
    Ok(())
}

/// Convert what the user typed into the raw answer the evaluator expects.
fn raw_answer(question: &QuizQuestion, text: &str) -> Option<String> {
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            let n: usize = text.parse().ok()?;
            (1..=options.len()).contains(&n).then(|| (n - 1).to_string())
        }
        QuestionKind::TrueFalse { .. } => match text.to_lowercase().as_str() {
            "t" | "true" => Some("true".to_string()),
            "f" | "false" => Some("false".to_string()),
            _ => None,
        },
        QuestionKind::Text => Some(text.to_string()),
    }
}

fn answer_hint(question: &QuizQuestion) -> String {
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            format!("Enter an option number from 1 to {}.", options.len())
        }
        QuestionKind::TrueFalse { .. } => "Enter true or false.".to_string(),
        QuestionKind::Text => "Type your answer.".to_string(),
    }
}

fn print_question(
    out: &mut dyn Write,
    question: &QuizQuestion,
    index: usize,
    total: usize,
) -> Result<()> {
    writeln!(
        out,
        "\nQuestion {}/{} [{}] {}",
        index + 1,
        total,
        question.question_type().label(),
        question.chapter
    )?;
    writeln!(out, "{}", question.question)?;
    match &question.kind {
        QuestionKind::MultipleChoice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                writeln!(out, "  {}. {option}", i + 1)?;
            }
        }
        QuestionKind::TrueFalse { .. } => writeln!(out, "  (true / false)")?,
        QuestionKind::Text => writeln!(out, "  (free response)")?,
    }
    Ok(())
}

fn print_answer(out: &mut dyn Write, question: &QuizQuestion) -> Result<()> {
    writeln!(out, "Answer: {}", question.canonical_answer_text)?;
    if let Some(explanation) = &question.explanation {
        writeln!(out, "{explanation}")?;
    }
    Ok(())
}

fn print_help(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "  <answer>   option number, true/false, or free text")?;
    writeln!(out, "  :reveal    show the answer")?;
    writeln!(out, "  :next      go to the next question")?;
    writeln!(out, "  :reset     start over with new questions")?;
    writeln!(out, "  :quit      leave the quiz")?;
    Ok(())
}

fn print_results(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Your answer",
        "Expected",
        "Score",
        "Feedback",
    ]);

    for (i, entry) in report.entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.question),
            Cell::new(&entry.result.user_answer),
            Cell::new(&entry.canonical_answer),
            Cell::new(entry.result.score),
            Cell::new(&entry.result.feedback),
        ]);
    }

    println!("\n{table}");
    println!(
        "{}/{} correct, average score {}, accuracy {}%",
        report.summary.correct_count,
        report.summary.total,
        report.summary.average_score,
        report.summary.accuracy_rate
    );
}
