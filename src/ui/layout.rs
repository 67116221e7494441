use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Title, body, status line and help bar shared by every screen.
pub struct ScreenLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct QuizLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub options_area: Rect,
    pub feedback_area: Rect,
    pub help_area: Rect,
}

pub struct ResultsLayout {
    pub header_area: Rect,
    pub stats_area: Rect,
    pub chart_area: Rect,
    pub review_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_screen_chunks(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    ScreenLayout {
        header_area: chunks[0],
        body_area: chunks[1],
        status_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_quiz_chunks(area: Rect) -> QuizLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Percentage(40),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        options_area: chunks[2],
        feedback_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_results_chunks(area: Rect) -> ResultsLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    // Stats on the left, correct/incorrect chart on the right
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    ResultsLayout {
        header_area: chunks[0],
        stats_area: top[0],
        chart_area: top[1],
        review_area: chunks[2],
        status_area: chunks[3],
        help_area: chunks[4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_screen_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.help_area.height, 3);
        // 38 after margin, minus 7 fixed
        assert_eq!(layout.body_area.height, 31);
    }

    #[test]
    fn test_quiz_layout() {
        let area = Rect::new(0, 0, 100, 100);
        let layout = calculate_quiz_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.feedback_area.height, 5);
        assert_eq!(layout.help_area.height, 4);
        assert!(layout.options_area.height > 0);
        assert!(layout.question_area.height >= 3);
    }

    #[test]
    fn test_results_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = calculate_results_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.stats_area.height, 8);
        assert_eq!(layout.chart_area.height, 8);
        assert_eq!(layout.stats_area.width + layout.chart_area.width, 98);
        // 48 after margin, minus 15 fixed
        assert_eq!(layout.review_area.height, 33);
    }
}
