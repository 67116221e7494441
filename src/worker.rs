use crate::client::{HealthStatus, QuizGenerator};
use crate::models::{AppEvent, GenerationTicket};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Runs one generation call off the UI loop. The call itself is never
/// cancelled; the controller decides whether the result still applies.
pub fn spawn_generation(
    generator: Arc<dyn QuizGenerator>,
    ticket: GenerationTicket,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        log::info!(
            "Request {}: generating {} {} questions from {}",
            ticket.request_id,
            ticket.config.num_questions,
            ticket.config.difficulty.as_str(),
            ticket.file.name
        );

        let result = generator.generate(&ticket.file, &ticket.config).await;
        match &result {
            Ok(questions) => log::info!(
                "Request {}: received {} questions",
                ticket.request_id,
                questions.len()
            ),
            Err(e) => log::warn!("Request {} failed: {}", ticket.request_id, e),
        }

        if tx
            .send(AppEvent::Generated {
                request_id: ticket.request_id,
                result,
            })
            .is_err()
        {
            log::debug!("Event loop gone, dropping generation result");
        }
    })
}

pub fn spawn_health_check(
    generator: Arc<dyn QuizGenerator>,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let status = match generator.check_health().await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                HealthStatus {
                    ocr_available: false,
                    tesseract_version: None,
                    error: Some(format!("Server unreachable: {}", e)),
                }
            }
        };
        let _ = tx.send(AppEvent::Health(status));
    })
}
