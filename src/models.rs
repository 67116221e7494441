use crate::client::HealthStatus;
use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One multiple-choice question as returned by the generation server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn explanation_text(&self) -> &str {
        self.explanation.as_deref().unwrap_or("")
    }

    pub fn is_correct(&self, chosen: &str) -> bool {
        self.answer == chosen
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Selected option per question index, `None` while unanswered.
pub type AnswerRecord = Vec<Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Upload,
    Configure,
    InProgress,
    Results,
    Flashcards,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Upload => "Upload",
            Phase::Configure => "Configure",
            Phase::InProgress => "Quiz",
            Phase::Results => "Results",
            Phase::Flashcards => "Flashcards",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 20;
pub const DEFAULT_QUESTIONS: u32 = 5;

/// Form fields sent alongside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub num_questions: u32,
    pub difficulty: Difficulty,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_QUESTIONS,
            difficulty: Difficulty::default(),
        }
    }
}

impl GenerationConfig {
    pub fn more_questions(&mut self) {
        self.num_questions = (self.num_questions + 1).min(MAX_QUESTIONS);
    }

    pub fn fewer_questions(&mut self) {
        self.num_questions = self.num_questions.saturating_sub(1).max(MIN_QUESTIONS);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub name: String,
}

impl UploadedFile {
    /// `None` for an empty selection.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.as_os_str().is_empty() {
            return None;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Some(Self {
            path: path.to_path_buf(),
            name,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub questions: Vec<Question>,
    pub answers: AnswerRecord,
    pub current_index: usize,
    pub card_index: usize,
    pub card_flipped: bool,
    pub elapsed_seconds: u64,
    /// Incremented on each correct selection. Replaced by the recomputed
    /// score when the quiz finishes.
    pub running_score: usize,
    pub phase: Phase,
}

impl SessionState {
    pub fn with_questions(questions: Vec<Question>, phase: Phase) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            answers,
            phase,
            ..Self::default()
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn current_card(&self) -> Option<&Question> {
        self.questions.get(self.card_index)
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answer_for(index).is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }
}

/// What the store keeps between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub questions: Vec<Question>,
    pub answers: AnswerRecord,
    pub score: usize,
}

/// Handed to the generation worker; the id lets the controller drop stale
/// responses.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub request_id: u64,
    pub file: UploadedFile,
    pub config: GenerationConfig,
}

#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Generated {
        request_id: u64,
        result: Result<Vec<Question>, QuizError>,
    },
    Health(HealthStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            question: "2+2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: "4".to_string(),
            explanation: None,
        }
    }

    #[test]
    fn test_question_deserializes_without_explanation() {
        let q: Question =
            serde_json::from_str(r#"{"question":"2+2?","options":["3","4"],"answer":"4"}"#)
                .unwrap();
        assert_eq!(q, sample_question());
        assert_eq!(q.explanation_text(), "");
    }

    #[test]
    fn test_answer_record_serializes_unanswered_as_null() {
        let answers: AnswerRecord = vec![Some("4".to_string()), None];
        assert_eq!(serde_json::to_string(&answers).unwrap(), r#"["4",null]"#);
    }

    #[test]
    fn test_with_questions_starts_unanswered() {
        let state = SessionState::with_questions(vec![sample_question(); 3], Phase::InProgress);
        assert_eq!(state.answers, vec![None, None, None]);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.answered_count(), 0);
        assert!(!state.is_last_question());
    }

    #[test]
    fn test_question_count_bounds() {
        let mut config = GenerationConfig {
            num_questions: MAX_QUESTIONS,
            ..GenerationConfig::default()
        };
        config.more_questions();
        assert_eq!(config.num_questions, MAX_QUESTIONS);

        config.num_questions = MIN_QUESTIONS;
        config.fewer_questions();
        assert_eq!(config.num_questions, MIN_QUESTIONS);
    }

    #[test]
    fn test_difficulty_cycles() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Hard);
    }

    #[test]
    fn test_empty_path_is_no_selection() {
        assert!(UploadedFile::from_path(Path::new("")).is_none());
        let file = UploadedFile::from_path(Path::new("docs/notes.pdf")).unwrap();
        assert_eq!(file.name, "notes.pdf");
    }
}
