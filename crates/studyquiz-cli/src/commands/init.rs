//! The `studyquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create studyquiz.toml
    if std::path::Path::new("studyquiz.toml").exists() {
        println!("studyquiz.toml already exists, skipping.");
    } else {
        std::fs::write("studyquiz.toml", SAMPLE_CONFIG)?;
        println!("Created studyquiz.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("question-banks")?;
    let example_path = std::path::Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit studyquiz.toml (set [scorer] url to enable remote scoring)");
    println!("  2. Run: studyquiz validate --bank question-banks");
    println!("  3. Run: studyquiz run --subject example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studyquiz configuration

bank_dir = "./question-banks"
default_subject = "example"
session_size = 10

[scorer]
# Remote free-text scoring endpoint. Without it answers are scored locally.
# url = "${STUDYQUIZ_SCORER_URL}"
timeout_secs = 10

[keep_alive]
# url = "https://quiz.example.com/"
interval_ms = 120000
"#;

const EXAMPLE_BANK: &str = r#"[subject]
id = "example"
name = "Example Subject"
description = "A small question bank to get started"

[[chapters]]
id = "ch1"
name = "Basics"
order = 1

[[chapters]]
id = "ch2"
name = "Next Steps"
order = 2

[[text]]
id = "ex-t-01"
chapter = "Basics"
question = "What carries oxygen in red blood cells?"
answer = "hemoglobin"
difficulty = "easy"

[[multiple_choice]]
id = "ex-mc-01"
chapter = "Basics"
question = "Which organ produces red blood cells in adults?"
options = ["Liver", "Bone marrow", "Spleen"]
correct_answer = 1
explanation = "Adult erythropoiesis takes place in the bone marrow."

[[true_false]]
id = "ex-tf-01"
chapter = "Next Steps"
question = "Iron deficiency causes microcytic anemia."
correct_answer = true
"#;
