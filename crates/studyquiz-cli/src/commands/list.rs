//! The `studyquiz list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyquiz_core::bank::QuestionBank;
use studyquiz_core::traits::QuestionPoolProvider;
use studyquiz_scorers::config::load_config_from;

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank_path = bank.unwrap_or(config.bank_dir);
    let bank = QuestionBank::load(&bank_path)?;

    if bank.is_empty() {
        println!("No subjects found in {}.", bank_path.display());
        return Ok(());
    }

    for subject in bank.subjects() {
        println!("\n{} ({})", subject.name, subject.id);
        if !subject.description.is_empty() {
            println!("{}", subject.description);
        }

        let mut table = Table::new();
        table.set_header(vec![
            "#",
            "Chapter",
            "Free Response",
            "Multiple Choice",
            "True / False",
        ]);

        for chapter in bank.chapters(&subject.id) {
            let groups = bank.questions_for_chapter(&subject.id, &chapter.name);
            table.add_row(vec![
                Cell::new(chapter.order),
                Cell::new(&chapter.name),
                Cell::new(groups.text.len()),
                Cell::new(groups.multiple_choice.len()),
                Cell::new(groups.true_false.len()),
            ]);
        }

        let all = bank.questions_for_subject(&subject.id);
        table.add_row(vec![
            Cell::new(""),
            Cell::new("All chapters"),
            Cell::new(all.text.len()),
            Cell::new(all.multiple_choice.len()),
            Cell::new(all.true_false.len()),
        ]);

        println!("{table}");
    }

    Ok(())
}
