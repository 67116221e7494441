use crate::db::{init_db, run_migrations};
use crate::error::Result;
use crate::models::{AnswerRecord, Question, SavedSession};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

pub const QUIZ_DATA_KEY: &str = "quizData";
pub const USER_ANSWERS_KEY: &str = "userAnswers";
pub const SCORE_KEY: &str = "score";

const KEYS: [&str; 3] = [QUIZ_DATA_KEY, USER_ANSWERS_KEY, SCORE_KEY];

/// Reasons a stored session cannot be used. Never reaches the user: `load`
/// logs it and reports no session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored session is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Key-value persistence for the last completed session.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: init_db(db_path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()
    }

    pub fn load(&self) -> Option<SavedSession> {
        match self.try_load() {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Ignoring stored session: {}", e);
                None
            }
        }
    }

    fn try_load(&self) -> std::result::Result<Option<SavedSession>, StoreError> {
        let quiz_data = self.get(QUIZ_DATA_KEY)?;
        let user_answers = self.get(USER_ANSWERS_KEY)?;
        let score = self.get(SCORE_KEY)?;

        let (quiz_data, user_answers, score) = match (quiz_data, user_answers, score) {
            (Some(q), Some(a), Some(s)) => (q, a, s),
            (None, None, None) => return Ok(None),
            _ => return Err(StoreError::Corrupt("only part of the session was saved".into())),
        };

        let questions: Vec<Question> = serde_json::from_str(&quiz_data)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", QUIZ_DATA_KEY, e)))?;
        let answers: AnswerRecord = serde_json::from_str(&user_answers)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", USER_ANSWERS_KEY, e)))?;
        let score: usize = score
            .trim()
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", SCORE_KEY, e)))?;

        if answers.len() != questions.len() {
            return Err(StoreError::Corrupt(format!(
                "{} answers for {} questions",
                answers.len(),
                questions.len()
            )));
        }

        Ok(Some(SavedSession {
            questions,
            answers,
            score,
        }))
    }

    /// Writes all three keys in one transaction.
    pub fn save(&mut self, session: &SavedSession) -> Result<()> {
        let quiz_data = serde_json::to_string(&session.questions)?;
        let user_answers = serde_json::to_string(&session.answers)?;
        let score = session.score.to_string();
        let updated_at = chrono::Utc::now().timestamp();

        let tx = self.conn.transaction()?;
        for (key, value) in [
            (QUIZ_DATA_KEY, quiz_data),
            (USER_ANSWERS_KEY, user_answers),
            (SCORE_KEY, score),
        ] {
            tx.execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, value, updated_at],
            )?;
        }
        tx.commit()?;

        log::info!(
            "Saved session: {} questions, score {}",
            session.questions.len(),
            session.score
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        for key in KEYS {
            self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn break_schema(&self) {
        self.conn.execute("DROP TABLE kv", []).unwrap();
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &str) {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, 0)",
                rusqlite::params![key, value],
            )
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_session() -> SavedSession {
        SavedSession {
            questions: vec![
                Question {
                    question: "Capital of France?".to_string(),
                    options: vec!["Paris".to_string(), "Rome".to_string()],
                    answer: "Paris".to_string(),
                    explanation: Some("Paris is the capital.".to_string()),
                },
                Question {
                    question: "2+2?".to_string(),
                    options: vec!["3".to_string(), "4".to_string()],
                    answer: "4".to_string(),
                    explanation: None,
                },
            ],
            answers: vec![Some("Paris".to_string()), None],
            score: 1,
        }
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = SessionStore::open_in_memory().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let session = saved_session();
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save(&saved_session()).unwrap();

        let mut next = saved_session();
        next.questions.truncate(1);
        next.answers = vec![None];
        next.score = 0;
        store.save(&next).unwrap();

        assert_eq!(store.load().unwrap(), next);
    }

    #[test]
    fn test_clear_removes_session_and_is_idempotent() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save(&saved_session()).unwrap();

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_partial_session_is_absent() {
        let store = SessionStore::open_in_memory().unwrap();
        store.put_raw(QUIZ_DATA_KEY, "[]");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_json_is_absent() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save(&saved_session()).unwrap();
        store.put_raw(USER_ANSWERS_KEY, "[\"Paris\",");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_non_numeric_score_is_absent() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save(&saved_session()).unwrap();
        store.put_raw(SCORE_KEY, "lots");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_mismatched_answer_count_is_absent() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save(&saved_session()).unwrap();
        store.put_raw(USER_ANSWERS_KEY, "[null]");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_session_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("quiz.db");

        let mut store = SessionStore::open(&db_path).unwrap();
        store.save(&saved_session()).unwrap();
        drop(store);

        let reopened = SessionStore::open(&db_path).unwrap();
        assert_eq!(reopened.load().unwrap(), saved_session());
    }
}
