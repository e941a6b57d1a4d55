//! Matrix pane
//!
//! Square grid of components against components. Cells read through
//! `is_linked`, so bidirectional mode shows a link stored in either
//! direction; toggling always writes the row's own direction.

use crate::action::Action;
use crate::component::Component;
use crate::model::{column_label, DsmState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Default)]
pub struct MatrixPane {
    pub row: usize,
    pub col: usize,
}

/// Width of one grid cell for `count` components
fn cell_width(count: usize) -> usize {
    let widest = column_label(count.saturating_sub(1)).len();
    (widest + 2).max(3)
}

/// Cut `text` to at most `max` display columns
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Render the grid; `cursor` highlights one cell
pub fn build_matrix_lines(state: &DsmState, cursor: Option<(usize, usize)>) -> Vec<Line<'static>> {
    let count = state.components.len();
    if count == 0 {
        return vec![Line::from(Span::styled(
            "No components. Press a in the list to add one.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let width = cell_width(count);
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::with_capacity(count + 1);

    let mut header = vec![Span::raw(format!("{:^width$}", "#", width = width))];
    header.extend((0..count).map(|col| {
        Span::styled(
            format!("{:^width$}", column_label(col), width = width),
            header_style,
        )
    }));
    lines.push(Line::from(header));

    for row in 0..count {
        let label = column_label(row);
        let mut spans = vec![Span::styled(
            format!("{:^width$}", label, width = width),
            header_style,
        )];

        for col in 0..count {
            let (text, mut style) = if row == col {
                (
                    label.clone(),
                    Style::default().bg(Color::DarkGray).fg(Color::Black),
                )
            } else if state.is_cell_linked(row, col) {
                (
                    "X".to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("·".to_string(), Style::default().fg(Color::DarkGray))
            };
            if cursor == Some((row, col)) {
                style = style.bg(Color::Blue).fg(Color::White);
            }
            spans.push(Span::styled(format!("{:^width$}", text, width = width), style));
        }
        lines.push(Line::from(spans));
    }

    lines
}

impl MatrixPane {
    pub fn new() -> Self {
        Self::default()
    }

    fn clamp(&mut self, count: usize) {
        let max = count.saturating_sub(1);
        self.row = self.row.min(max);
        self.col = self.col.min(max);
    }

    /// Caption naming the row and column under the cursor
    fn cursor_caption(&self, state: &DsmState) -> String {
        match (state.components.get(self.row), state.components.get(self.col)) {
            (Some(r), Some(_)) if self.row == self.col => {
                format!("{} {}", column_label(self.row), r.name)
            }
            (Some(r), Some(c)) => {
                let arrow = if state.is_bidirectional_link { "↔" } else { "→" };
                format!(
                    "{} {} {} {} {}",
                    column_label(self.row),
                    r.name,
                    arrow,
                    column_label(self.col),
                    c.name
                )
            }
            _ => String::new(),
        }
    }
}

impl Component for MatrixPane {
    fn handle_key_event(&mut self, key: KeyEvent, state: &DsmState) -> Result<Option<Action>> {
        let count = state.components.len();
        let max = count.saturating_sub(1);
        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.col = self.col.saturating_sub(1);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.col = (self.col + 1).min(max);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.row = (self.row + 1).min(max);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('x') => {
                match (state.components.get(self.row), state.components.get(self.col)) {
                    (Some(r), Some(c)) if self.row != self.col => Some(Action::ToggleLink {
                        row: r.id.clone(),
                        col: c.id.clone(),
                    }),
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: &Action, state: &DsmState) -> Result<Option<Action>> {
        self.clamp(state.components.len());
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &DsmState, focused: bool) -> Result<()> {
        let count = state.components.len();
        self.clamp(count);

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let mode = if state.is_bidirectional_link {
            "bidirectional"
        } else {
            "directed"
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Matrix ({}) ", mode))
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        // Keep the cursor cell in view
        let width = cell_width(count);
        let visible_rows = chunks[0].height as usize;
        let visible_cols = chunks[0].width as usize;
        let scroll_y = (self.row + 2).saturating_sub(visible_rows);
        let scroll_x = ((self.col + 2) * width).saturating_sub(visible_cols);

        let cursor = (focused && count > 0).then_some((self.row, self.col));
        let grid = Paragraph::new(build_matrix_lines(state, cursor))
            .scroll((scroll_y as u16, scroll_x as u16));
        frame.render_widget(grid, chunks[0]);

        let caption = truncate_to_width(&self.cursor_caption(state), chunks[1].width as usize);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                caption,
                Style::default().fg(Color::Yellow),
            ))),
            chunks[1],
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dsm::{Component as DsmComponent, Links};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> DsmState {
        let mut links = Links::new();
        links.insert("a".to_string(), vec!["b".to_string()]);
        DsmState {
            components: ["a", "b"]
                .iter()
                .map(|id| DsmComponent {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                })
                .collect(),
            links,
            ..Default::default()
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_diagonal_does_not_toggle() {
        let state = state();
        let mut pane = MatrixPane::new();

        assert_eq!(pane.handle_key_event(key(KeyCode::Char(' ')), &state).unwrap(), None);

        pane.handle_key_event(key(KeyCode::Char('l')), &state).unwrap();
        pane.handle_key_event(key(KeyCode::Char('l')), &state).unwrap();
        assert_eq!(pane.col, 1);
        assert_eq!(
            pane.handle_key_event(key(KeyCode::Char(' ')), &state).unwrap(),
            Some(Action::ToggleLink {
                row: "a".to_string(),
                col: "b".to_string()
            })
        );
    }

    #[test]
    fn test_grid_marks_links() {
        let mut state = state();

        let lines = build_matrix_lines(&state, None);
        assert_eq!(line_text(&lines[1]), " A  A  X ");
        assert_eq!(line_text(&lines[2]), " B  ·  B ");

        state.is_bidirectional_link = true;
        let lines = build_matrix_lines(&state, None);
        assert_eq!(line_text(&lines[2]), " B  X  B ");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Fuselage", 20), "Fuselage");
        assert_eq!(truncate_to_width("Fuselage", 5), "Fuse…");
    }

    #[test]
    fn test_cursor_clamped_after_removal() {
        let mut pane = MatrixPane { row: 5, col: 3 };
        pane.update(&Action::Tick, &state()).unwrap();
        assert_eq!((pane.row, pane.col), (1, 1));
    }
}
