use crate::scoring::{format_elapsed, Verdict};
use crate::session::QuizController;
use crate::ui::layout::calculate_results_chunks;
use crate::ui::{draw_header, draw_help, draw_status, help_line, APP_TITLE};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

fn verdict_marker(verdict: Verdict) -> Span<'static> {
    match verdict {
        Verdict::Correct => Span::styled("[✓]", Style::default().fg(Color::Green)),
        Verdict::Incorrect => Span::styled("[✗]", Style::default().fg(Color::Red)),
        Verdict::NotAnswered => Span::styled("[-]", Style::default().fg(Color::DarkGray)),
    }
}

pub fn draw_results(f: &mut Frame, controller: &QuizController) {
    let layout = calculate_results_chunks(f.area());
    let results = controller.results().copied().unwrap_or_default();

    draw_header(f, layout.header_area, format!("{} - Results", APP_TITLE));

    let label = Style::default().add_modifier(Modifier::BOLD);
    let stats = vec![
        Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                format!("{:.2}%", results.percentage),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total questions: ", label),
            Span::from(results.total.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Correct: ", label),
            Span::styled(results.correct.to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Incorrect: ", label),
            Span::styled(results.incorrect.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled("Time: ", label),
            Span::from(format_elapsed(controller.state().elapsed_seconds)),
        ]),
    ];
    let stats_widget =
        Paragraph::new(stats).block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(stats_widget, layout.stats_area);

    let bars = [
        Bar::default()
            .value(results.correct as u64)
            .label(Line::from("Correct"))
            .style(Style::default().fg(Color::Green)),
        Bar::default()
            .value(results.incorrect as u64)
            .label(Line::from("Incorrect"))
            .style(Style::default().fg(Color::Red)),
    ];
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Breakdown"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(3)
        .max(results.total.max(1) as u64);
    f.render_widget(chart, layout.chart_area);

    let mut review = Text::default();
    for item in controller.review() {
        review.push_line(Line::from(vec![
            verdict_marker(item.verdict),
            Span::styled(
                format!(" {}. {}", item.number, item.question),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));

        let chosen_style = match item.verdict {
            Verdict::Correct => Style::default().fg(Color::Green),
            Verdict::Incorrect => Style::default().fg(Color::Red),
            Verdict::NotAnswered => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        };
        review.push_line(Line::from(vec![
            Span::from("    Your answer: "),
            Span::styled(item.chosen_label().to_string(), chosen_style),
        ]));
        if item.verdict != Verdict::Correct {
            review.push_line(Line::from(vec![
                Span::from("    Correct answer: "),
                Span::styled(item.correct_answer.clone(), Style::default().fg(Color::Green)),
            ]));
        }
        if !item.explanation.is_empty() {
            review.push_line(Line::from(Span::styled(
                format!("    {}", item.explanation),
                Style::default().fg(Color::Gray),
            )));
        }
        review.push_line(Line::from(""));
    }

    let review_widget = Paragraph::new(review)
        .wrap(Wrap { trim: false })
        .scroll((controller.review_scroll(), 0))
        .block(Block::default().borders(Borders::ALL).title("Review"));
    f.render_widget(review_widget, layout.review_area);

    draw_status(f, layout.status_area, controller);
    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("v", "Flashcards"),
            ("c", "Export CSV"),
            ("d", "Export PDF"),
            ("↑/↓", "Scroll"),
            ("r", "New Quiz"),
            ("q", "Quit"),
        ])],
    );
}
