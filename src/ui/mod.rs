pub mod layout;
mod configure;
mod flashcards;
mod quiz;
mod results;
mod upload;

pub use configure::draw_configure;
pub use flashcards::draw_flashcards;
pub use layout::{calculate_quiz_chunks, calculate_results_chunks, calculate_screen_chunks};
pub use quiz::{draw_quiz, draw_restart_confirmation};
pub use results::draw_results;
pub use upload::draw_upload;

use crate::models::Phase;
use crate::session::QuizController;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const APP_TITLE: &str = "Quiz Wizard";

pub fn draw(f: &mut Frame, controller: &QuizController) {
    match controller.phase() {
        Phase::Upload => draw_upload(f, controller),
        Phase::Configure => draw_configure(f, controller),
        Phase::InProgress => {
            draw_quiz(f, controller);
            if controller.confirm_restart() {
                draw_restart_confirmation(f);
            }
        }
        Phase::Results => draw_results(f, controller),
        Phase::Flashcards => draw_flashcards(f, controller),
    }
}

pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Help bar line from `(key, label)` pairs.
pub(crate) fn help_line(entries: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (i, (key, label)) in entries.iter().enumerate() {
        spans.push(Span::styled(key.to_string(), key_style()));
        let sep = if i + 1 < entries.len() { "  " } else { "" };
        spans.push(Span::from(format!(" {}{}", label, sep)));
    }
    Line::from(spans)
}

pub(crate) fn draw_header(f: &mut Frame, area: Rect, title: String) {
    let header = Paragraph::new(title)
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub(crate) fn draw_help(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let help = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

/// One-line strip: errors in red win over progress and status messages.
pub(crate) fn draw_status(f: &mut Frame, area: Rect, controller: &QuizController) {
    let line = if let Some(error) = controller.error_message() {
        Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if let Some(progress) = controller.progress_message() {
        Span::styled(progress.to_string(), Style::default().fg(Color::Yellow))
    } else if let Some(status) = controller.status_message() {
        Span::styled(status.to_string(), Style::default().fg(Color::Green))
    } else {
        Span::from("")
    };
    f.render_widget(
        Paragraph::new(Line::from(line)).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::SessionStore;
    use crate::models::Question;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn controller(dir: &std::path::Path) -> QuizController {
        std::fs::write(dir.join("biology.pdf"), b"%PDF-1.4").unwrap();
        let config = Config {
            documents_dir: dir.to_path_buf(),
            export_dir: dir.to_path_buf(),
            ..Config::default()
        };
        let (tx, _rx) = mpsc::unbounded_channel();
        QuizController::new(SessionStore::open_in_memory().unwrap(), tx, &config)
    }

    fn render(controller: &QuizController) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, controller)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn questions() -> Vec<Question> {
        vec![
            Question {
                question: "What carries oxygen in blood?".to_string(),
                options: vec!["Hemoglobin".to_string(), "Insulin".to_string()],
                answer: "Hemoglobin".to_string(),
                explanation: Some("Red cells carry it".to_string()),
            },
            Question {
                question: "Powerhouse of the cell?".to_string(),
                options: vec!["Nucleus".to_string(), "Mitochondria".to_string()],
                answer: "Mitochondria".to_string(),
                explanation: None,
            },
        ]
    }

    #[test]
    fn test_help_line_alternates_keys_and_labels() {
        let line = help_line(&[("Enter", "Select"), ("q", "Quit")]);
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[0].content, "Enter");
        assert_eq!(line.spans[1].content, " Select  ");
        assert_eq!(line.spans[3].content, " Quit");
    }

    #[test]
    fn test_upload_screen_lists_documents() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(dir.path());
        let screen = render(&controller);
        assert!(screen.contains("biology.pdf"));
        assert!(screen.contains(APP_TITLE));
    }

    #[test]
    fn test_configure_screen_shows_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.submit_selected_document().unwrap();
        let screen = render(&controller);
        assert!(screen.contains("Medium"));
        assert!(screen.contains("biology.pdf"));
    }

    #[tokio::test]
    async fn test_quiz_results_and_flashcard_screens_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.submit_selected_document().unwrap();
        let ticket = controller.begin_generation().unwrap();
        controller.complete_generation(ticket.request_id, Ok(questions()));

        let screen = render(&controller);
        assert!(screen.contains("Question 1 of 2"));
        assert!(screen.contains("Hemoglobin"));

        controller.select_option(0, "Insulin").unwrap();
        let screen = render(&controller);
        assert!(screen.contains("Incorrect"));

        controller.request_restart();
        assert!(render(&controller).contains("Start over?"));
        controller.cancel_restart();

        controller.finish().unwrap();
        let screen = render(&controller);
        assert!(screen.contains("0.00%"));
        assert!(screen.contains("Not Answered"));

        controller.show_flashcards().unwrap();
        let screen = render(&controller);
        assert!(screen.contains("Card 1 of 2"));
        assert!(screen.contains("What carries oxygen in blood?"));
    }

    #[tokio::test]
    async fn test_flashcard_front_has_explanation_and_back_has_answer() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.submit_selected_document().unwrap();
        let ticket = controller.begin_generation().unwrap();
        controller.complete_generation(
            ticket.request_id,
            Ok(vec![Question {
                question: "Which gas do plants absorb?".to_string(),
                options: vec!["Oxygen".to_string(), "Carbon dioxide".to_string()],
                answer: "Carbon dioxide".to_string(),
                explanation: Some("Used in photosynthesis".to_string()),
            }]),
        );
        controller.finish().unwrap();
        controller.show_flashcards().unwrap();

        let front = render(&controller);
        assert!(front.contains("Which gas do plants absorb?"));
        assert!(front.contains("Used in photosynthesis"));
        assert!(!front.contains("Carbon dioxide"));

        controller.flip_card().unwrap();
        let back = render(&controller);
        assert!(back.contains("Carbon dioxide"));
        assert!(!back.contains("Used in photosynthesis"));
        assert!(!back.contains("Which gas do plants absorb?"));
    }

    #[tokio::test]
    async fn test_long_review_question_wraps_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = controller(dir.path());
        controller.submit_selected_document().unwrap();
        let ticket = controller.begin_generation().unwrap();
        let question = format!(
            "{}which organelle remains?",
            "After every step of the long process ".repeat(4)
        );
        controller.complete_generation(
            ticket.request_id,
            Ok(vec![Question {
                question,
                options: vec!["Ribosome".to_string(), "Nucleus".to_string()],
                answer: "Nucleus".to_string(),
                explanation: None,
            }]),
        );
        controller.finish().unwrap();

        let screen = render(&controller);
        assert!(screen.contains("remains?"));
        assert!(!screen.contains("..."));
    }
}
