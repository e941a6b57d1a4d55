//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub components: Rect,
    pub sorting_keys: Rect,
    pub matrix: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// Components list and sorting keys sit side by side on the left, the
/// matrix takes the rest; a status line and help bar run along the bottom.
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(main_chunks[0]);

    MainLayout {
        components: horizontal_chunks[0],
        sorting_keys: horizontal_chunks[1],
        matrix: horizontal_chunks[2],
        status: main_chunks[1],
        help: main_chunks[2],
    }
}
