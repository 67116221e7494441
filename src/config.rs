use crate::client::DEFAULT_SERVER_URL;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "quiz.db";
const DEFAULT_LOG_FILE: &str = "quiz_wizard.log";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    /// Scanned for PDF files on the upload screen.
    pub documents_dir: PathBuf,
    /// Where `flashcards.csv` and `flashcards.pdf` land.
    pub export_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub http_timeout: Duration,
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\quiz-wizard")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/quiz-wizard")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            documents_dir: PathBuf::from("."),
            export_dir: PathBuf::from("."),
            data_dir: default_data_dir(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads `QUIZ_*` variables, after loading `.env` when present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            server_url: get("QUIZ_SERVER_URL").unwrap_or(defaults.server_url),
            documents_dir: get("QUIZ_DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            export_dir: get("QUIZ_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            data_dir: get("QUIZ_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_file: get("QUIZ_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            log_level: get("QUIZ_LOG_LEVEL")
                .and_then(|v| LevelFilter::from_str(v.trim()).ok())
                .unwrap_or(defaults.log_level),
            http_timeout: get("QUIZ_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.http_timeout, Duration::from_secs(300));
        assert!(config.db_path().ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("QUIZ_SERVER_URL", "http://quiz.local:8080"),
            ("QUIZ_DOCUMENTS_DIR", "/srv/docs"),
            ("QUIZ_DATA_DIR", "/tmp/quiz"),
            ("QUIZ_LOG_LEVEL", "debug"),
            ("QUIZ_HTTP_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.server_url, "http://quiz.local:8080");
        assert_eq!(config.documents_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/quiz/quiz.db"));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("QUIZ_LOG_LEVEL", "chatty"),
            ("QUIZ_HTTP_TIMEOUT_SECS", "soon"),
            ("QUIZ_EXPORT_DIR", "  "),
        ]));
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.http_timeout, Duration::from_secs(300));
        assert_eq!(config.export_dir, PathBuf::from("."));
    }
}
