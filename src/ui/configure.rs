use crate::models::{Difficulty, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::session::QuizController;
use crate::ui::layout::calculate_screen_chunks;
use crate::ui::{draw_header, draw_help, draw_status, help_line, key_style, APP_TITLE};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

pub fn draw_configure(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_screen_chunks(f.area());
    let config = controller.generation_config();
    let generating = controller.is_generating();

    draw_header(f, layout.header_area, format!("{} - Configure", APP_TITLE));

    let mut text = Text::default();
    let file_name = controller.file().map(|file| file.name.as_str()).unwrap_or("-");
    text.push_line(Line::from(vec![
        Span::styled("Document: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::from(file_name.to_string()),
    ]));
    text.push_line(Line::from(""));
    text.push_line(Line::from(vec![
        Span::styled(
            "Number of questions: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("◀ {} ▶", config.num_questions), key_style()),
        Span::styled(
            format!("  ({}-{})", MIN_QUESTIONS, MAX_QUESTIONS),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    text.push_line(Line::from(""));

    let mut difficulty_spans = vec![Span::styled(
        "Difficulty: ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for difficulty in DIFFICULTIES {
        let style = if difficulty == config.difficulty {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        difficulty_spans.push(Span::styled(format!(" {} ", difficulty.as_str()), style));
        difficulty_spans.push(Span::from(" "));
    }
    text.push_line(Line::from(difficulty_spans));

    if generating {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Generating quiz, this can take a while for scanned documents...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let border = if generating { Color::DarkGray } else { Color::Cyan };
    let form = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("Quiz Settings"),
    );
    f.render_widget(form, layout.body_area);

    draw_status(f, layout.status_area, controller);

    let help = if generating {
        help_line(&[("Esc", "Abandon"), ("Ctrl+C", "Exit App")])
    } else {
        help_line(&[
            ("←/→", "Questions"),
            ("↑/↓", "Difficulty"),
            ("Enter", "Generate Quiz"),
            ("Esc", "Back"),
        ])
    };
    draw_help(f, layout.help_area, vec![help]);
}
