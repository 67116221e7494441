pub mod client;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod ui;
pub mod utils;
pub mod worker;

// Re-exports for convenience
pub use client::{HealthStatus, HttpQuizGenerator, QuizGenerator};
pub use config::Config;
pub use db::SessionStore;
pub use error::{QuizError, Result};
pub use models::{AppEvent, Difficulty, GenerationConfig, Phase, Question, SessionState};
pub use scoring::{build_review, compute_results, QuizResults, ReviewItem, Verdict};
pub use session::{handle_key, KeyAction, QuizController};
pub use ui::draw;
