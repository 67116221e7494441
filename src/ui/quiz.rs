use crate::scoring::format_elapsed;
use crate::session::QuizController;
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{draw_header, draw_help, help_line};
use crate::utils::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_quiz(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_quiz_chunks(f.area());
    let state = controller.state();
    let Some(question) = state.current_question() else {
        return;
    };
    let index = state.current_index;
    let chosen = state.answer_for(index);

    let progress = format!(
        "Question {} of {}  |  Answered {}  |  Score {}  |  Time {}",
        index + 1,
        state.question_count(),
        state.answered_count(),
        state.running_score,
        format_elapsed(state.elapsed_seconds)
    );
    draw_header(f, layout.header_area, progress);

    let question_widget = Paragraph::new(Text::from(question.question.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_widget, layout.question_area);

    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = match chosen {
                // Locked: reveal the correct option and the wrong pick
                Some(_) if question.is_correct(option) => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                Some(c) if c == option.as_str() => {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                }
                Some(_) => Style::default().fg(Color::DarkGray),
                None if i == controller.option_cursor() => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                None => Style::default(),
            };
            ListItem::new(format!("{}. {}", i + 1, option)).style(style)
        })
        .collect();

    let options_title = if chosen.is_some() { "Options (locked)" } else { "Options" };
    let options = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(options_title),
    );
    f.render_widget(options, layout.options_area);

    let mut feedback = Text::default();
    match chosen {
        Some(c) if question.is_correct(c) => {
            feedback.push_line(Line::from(Span::styled(
                "Correct!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Some(_) => {
            feedback.push_line(Line::from(vec![
                Span::styled(
                    "Incorrect. ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::from(format!("The correct answer is: {}", question.answer)),
            ]));
        }
        None => {}
    }
    if chosen.is_some() && !question.explanation_text().is_empty() {
        feedback.push_line(Line::from(Span::styled(
            question.explanation_text().to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(error) = controller.error_message() {
        feedback.push_line(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let feedback_widget = Paragraph::new(feedback)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"));
    f.render_widget(feedback_widget, layout.feedback_area);

    let next_label = if state.is_last_question() { "Finish" } else { "Next" };
    let first = if chosen.is_some() {
        help_line(&[("Enter/→", next_label), ("←", "Previous"), ("f", "Finish Now")])
    } else {
        help_line(&[
            ("↑/↓", "Choose"),
            ("Enter/1-9", "Answer"),
            ("←/→", "Navigate"),
            ("f", "Finish Now"),
        ])
    };
    draw_help(
        f,
        layout.help_area,
        vec![first, help_line(&[("Esc", "Start Over"), ("Ctrl+C", "Exit App")])],
    );
}

pub fn draw_restart_confirmation(f: &mut Frame) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new("Start over?")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("This quiz and its answers will be discarded.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (New Document)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
