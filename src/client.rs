use crate::error::{QuizError, Result};
use crate::models::{GenerationConfig, Question, UploadedFile};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const UNKNOWN_SERVER_ERROR: &str = "An unknown server error occurred.";

/// Produces a question set from a document. The HTTP implementation talks to
/// the generation server; tests substitute a mock.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(
        &self,
        file: &UploadedFile,
        config: &GenerationConfig,
    ) -> Result<Vec<Question>>;

    async fn check_health(&self) -> Result<HealthStatus>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ocr_available: bool,
    #[serde(default)]
    pub tesseract_version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// A `multipart/form-data` body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        Self::with_boundary(format!("----quiz-wizard-{}", token))
    }

    pub fn with_boundary(boundary: String) -> Self {
        Self {
            boundary,
            body: Vec::new(),
        }
    }

    fn part_header(&mut self, disposition: &str, content_type: Option<&str>) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body
            .extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
        if let Some(ct) = content_type {
            self.body
                .extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
        }
        self.body.extend_from_slice(b"\r\n");
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.part_header(&format!("form-data; name=\"{}\"", name), None);
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        let file_name = file_name.replace(['"', '\r', '\n'], "_");
        self.part_header(
            &format!("form-data; name=\"{}\"; filename=\"{}\"", name, file_name),
            Some(content_type),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct HttpQuizGenerator {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpQuizGenerator {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    fn post_document(
        agent: &ureq::Agent,
        url: &str,
        file: &UploadedFile,
        config: &GenerationConfig,
    ) -> Result<Vec<Question>> {
        let bytes = std::fs::read(&file.path)
            .map_err(|e| QuizError::Generation(format!("Could not read {}: {}", file.name, e)))?;

        let (content_type, body) = MultipartForm::new()
            .text("num_questions", &config.num_questions.to_string())
            .text("difficulty", config.difficulty.as_str())
            .file("file", &file.name, "application/pdf", &bytes)
            .finish();

        log::debug!("POST {} ({} bytes)", url, body.len());

        match agent
            .post(url)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
        {
            Ok(response) => {
                let parsed: GenerateResponse = response
                    .into_json()
                    .map_err(|e| QuizError::Generation(format!("Invalid server response: {}", e)))?;
                Ok(parsed.questions)
            }
            Err(ureq::Error::Status(code, response)) => {
                let message = response
                    .into_json::<ErrorResponse>()
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string());
                log::warn!("Generation server returned {}: {}", code, message);
                Err(QuizError::Generation(message))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(QuizError::Generation(transport.to_string()))
            }
        }
    }

    fn get_health(agent: &ureq::Agent, url: &str) -> Result<HealthStatus> {
        agent
            .get(url)
            .call()
            .map_err(|e| QuizError::Generation(e.to_string()))?
            .into_json()
            .map_err(|e| QuizError::Generation(format!("Invalid health response: {}", e)))
    }
}

#[async_trait]
impl QuizGenerator for HttpQuizGenerator {
    async fn generate(
        &self,
        file: &UploadedFile,
        config: &GenerationConfig,
    ) -> Result<Vec<Question>> {
        let agent = self.agent.clone();
        let url = format!("{}/generate-quiz", self.base_url);
        let file = file.clone();
        let config = config.clone();

        tokio::task::spawn_blocking(move || Self::post_document(&agent, &url, &file, &config))
            .await
            .map_err(|e| QuizError::Generation(format!("Generation task failed: {}", e)))?
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        let agent = self.agent.clone();
        let url = format!("{}/health", self.base_url);

        tokio::task::spawn_blocking(move || Self::get_health(&agent, &url))
            .await
            .map_err(|e| QuizError::Generation(format!("Health check failed: {}", e)))?
    }
}

/// Mock generator for testing - hands out queued results in order.
#[cfg(test)]
pub struct MockQuizGenerator {
    results: std::sync::Mutex<std::collections::VecDeque<Result<Vec<Question>>>>,
    delay: Duration,
}

#[cfg(test)]
impl MockQuizGenerator {
    pub fn new(results: Vec<Result<Vec<Question>>>) -> Self {
        Self {
            results: std::sync::Mutex::new(results.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[cfg(test)]
#[async_trait]
impl QuizGenerator for MockQuizGenerator {
    async fn generate(
        &self,
        _file: &UploadedFile,
        _config: &GenerationConfig,
    ) -> Result<Vec<Question>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(QuizError::Generation("no more mock results".to_string())))
    }

    async fn check_health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            ocr_available: true,
            tesseract_version: Some("5.3.0".to_string()),
            error: None,
        })
    }
}
