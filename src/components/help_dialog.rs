//! Help dialog component
//!
//! Lists the key bindings of every pane.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::DsmState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent, _state: &DsmState) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &DsmState, _focused: bool) -> Result<()> {
        let content = build_help_content();
        let total = content.len();

        let dialog_area = centered_popup(area, 58, total as u16 + 2);
        frame.render_widget(Clear, dialog_area);

        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" DSM Editor Keys ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if max_scroll > 0 {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    // Helper to add a section header
    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    // Helper to add a shortcut line
    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Anywhere");
    add_shortcut(&mut lines, "Tab", "Focus next pane");
    add_shortcut(&mut lines, "Shift+Tab", "Focus previous pane");
    add_shortcut(&mut lines, "b", "Toggle bidirectional links");
    add_shortcut(&mut lines, "c", "Copy component list to clipboard");
    add_shortcut(&mut lines, "C", "Copy matrix to clipboard");
    add_shortcut(&mut lines, "W", "Reset the whole matrix");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit");

    add_section(&mut lines, "Components");
    add_shortcut(&mut lines, "j / ↓", "Next component");
    add_shortcut(&mut lines, "k / ↑", "Previous component");
    add_shortcut(&mut lines, "g / G", "First / last component");
    add_shortcut(&mut lines, "a", "Add component");
    add_shortcut(&mut lines, "d / Del", "Delete component and its links");
    add_shortcut(&mut lines, "Enter / r", "Rename (Enter saves, Esc cancels)");
    add_shortcut(&mut lines, "J / K", "Move component down / up");

    add_section(&mut lines, "Sorting Keys");
    add_shortcut(&mut lines, "Enter / e", "Edit key (up to 2 characters)");
    add_shortcut(&mut lines, "s", "Sort components by key");

    add_section(&mut lines, "Matrix");
    add_shortcut(&mut lines, "h j k l", "Move cell cursor");
    add_shortcut(&mut lines, "Space / x", "Toggle link row → column");

    // Footer
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_lists_matrix_controls() {
        let text: String = build_help_content()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Toggle bidirectional links"));
        assert!(text.contains("Sort components by key"));
    }

    #[test]
    fn test_help_closes_and_scrolls() {
        let mut dialog = HelpDialog::default();
        let state = DsmState::default();

        dialog
            .handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &state)
            .unwrap();
        assert_eq!(dialog.scroll_offset, 1);

        let action = dialog
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &state)
            .unwrap();
        assert_eq!(action, Some(Action::CloseModal));
    }
}
