use crate::error::Result;
use crate::models::Question;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_FILE_NAME: &str = "flashcards.csv";
const HEADER: &str = "Question,Answer,Explanation";

/// Quotes a field and doubles any embedded quotes.
pub fn escape_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn to_csv(questions: &[Question]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for card in questions {
        out.push_str(&escape_field(&card.question));
        out.push(',');
        out.push_str(&escape_field(&card.answer));
        out.push(',');
        out.push_str(&escape_field(card.explanation_text()));
        out.push('\n');
    }

    out
}

pub fn write_csv(dir: &Path, questions: &[Question]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(CSV_FILE_NAME);
    fs::write(&path, to_csv(questions))?;
    log::info!("Wrote {} flashcards to {}", questions.len(), path.display());
    Ok(path)
}
