use crate::session::QuizController;
use crate::ui::layout::calculate_screen_chunks;
use crate::ui::{draw_header, draw_help, draw_status, help_line};
use crate::utils::centered_rect;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_flashcards(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_screen_chunks(f.area());
    let state = controller.state();

    draw_header(
        f,
        layout.header_area,
        format!(
            "Flashcards - Card {} of {}",
            state.card_index + 1,
            state.question_count()
        ),
    );

    if let Some(card) = state.current_card() {
        let mut text = Text::default();
        text.push_line(Line::from(""));
        let (title, color) = if state.card_flipped {
            text.push_line(Line::from(Span::styled(
                card.answer.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            ("Answer", Color::Green)
        } else {
            text.push_line(Line::from(Span::styled(
                card.question.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if !card.explanation_text().is_empty() {
                text.push_line(Line::from(""));
                text.push_line(Line::from(Span::styled(
                    card.explanation_text().to_string(),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
            ("Question", Color::Cyan)
        };

        let card_widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .title(title),
            );
        f.render_widget(card_widget, centered_rect(80, 80, layout.body_area));
    }

    draw_status(f, layout.status_area, controller);
    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("←/→", "Previous/Next"),
            ("Space", "Flip"),
            ("c", "Export CSV"),
            ("d", "Export PDF"),
            ("b/Esc", "Back to Results"),
        ])],
    );
}
