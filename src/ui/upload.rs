use crate::session::QuizController;
use crate::ui::layout::calculate_screen_chunks;
use crate::ui::{draw_header, draw_help, draw_status, help_line, APP_TITLE};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn server_lines(controller: &QuizController) -> (Vec<Line<'static>>, Color) {
    match controller.health() {
        None => (vec![Line::from("Checking server...")], Color::DarkGray),
        Some(status) if status.error.is_some() && !status.ocr_available => {
            let error = status.error.clone().unwrap_or_default();
            (
                vec![Line::from("Server: Unavailable"), Line::from(error)],
                Color::Red,
            )
        }
        Some(status) if status.ocr_available => {
            let version = status
                .tesseract_version
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            (
                vec![
                    Line::from("Server: Ready"),
                    Line::from(format!("OCR: Tesseract {}", version)),
                ],
                Color::Green,
            )
        }
        Some(_) => (
            vec![
                Line::from("Server: Ready"),
                Line::from("OCR: Unavailable (text PDFs only)"),
            ],
            Color::Yellow,
        ),
    }
}

pub fn draw_upload(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_screen_chunks(f.area());

    draw_header(f, layout.header_area, format!("{} - Upload", APP_TITLE));

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(layout.body_area);

    let documents = controller.documents();
    let items: Vec<ListItem> = if documents.is_empty() {
        vec![ListItem::new(format!(
            "No PDF files in {}",
            controller.documents_dir().display()
        ))
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        documents
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let style = if i == controller.selected_document() {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(name).style(style)
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Documents"),
    );
    f.render_widget(list, body[0]);

    let (lines, color) = server_lines(controller);
    let server = Paragraph::new(lines)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Server"));
    f.render_widget(server, body[1]);

    draw_status(f, layout.status_area, controller);
    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("↑/↓", "Choose"),
            ("Enter", "Use Document"),
            ("r", "Rescan"),
            ("q/Esc", "Quit"),
        ])],
    );
}
