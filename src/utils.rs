use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Greedy word wrap. `char_width` gives the width of one character in the
/// same unit as `max_width`. Explicit newlines always break; a word wider than
/// a whole line is split between characters. Empty input yields one empty line.
pub fn wrap_words<F>(text: &str, max_width: f32, char_width: F) -> Vec<String>
where
    F: Fn(char) -> f32,
{
    let mut lines = Vec::new();
    let space = char_width(' ');

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width: f32 = word.chars().map(&char_width).sum();

            if !current.is_empty() && current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            // Hard-split an overlong word.
            for ch in word.chars() {
                let w = char_width(ch);
                if current_width + w > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += w;
            }
        }

        lines.push(current);
    }

    lines
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
