//! Status line and key hint bar along the bottom of the screen

use crate::model::ui::Focus;
use crate::model::DsmState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the bottom bars need from the App
pub struct StatusContext<'a> {
    pub state: &'a DsmState,
    pub focus: Focus,
    pub editing: bool,
    pub status_message: Option<&'a str>,
    pub persist_error: Option<&'a str>,
}

fn key_span(key: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", key),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &StatusContext) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", ctx.focus.name()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    let (mode, mode_color) = if ctx.state.is_bidirectional_link {
        ("↔ bidirectional", Color::Magenta)
    } else {
        ("→ directed", Color::Blue)
    };
    spans.push(Span::styled(
        format!(" {} ", mode),
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!(" {} components ", ctx.state.components.len()),
        Style::default().fg(Color::DarkGray),
    ));

    // A failed save outranks any other message
    if let Some(error) = ctx.persist_error {
        spans.push(Span::styled(
            format!(" Save failed: {} ", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_help_bar(frame: &mut Frame, area: Rect, ctx: &StatusContext) {
    let mut help_spans = if ctx.editing {
        vec![
            key_span("Enter", Color::Green),
            Span::raw("Save  "),
            key_span("Esc", Color::Yellow),
            Span::raw("Cancel"),
        ]
    } else {
        match ctx.focus {
            Focus::Components => vec![
                key_span("a", Color::Green),
                Span::raw("Add "),
                key_span("d", Color::Red),
                Span::raw("Delete "),
                key_span("Enter", Color::Cyan),
                Span::raw("Rename "),
                key_span("J/K", Color::Cyan),
                Span::raw("Move "),
            ],
            Focus::SortingKeys => vec![
                key_span("Enter", Color::Cyan),
                Span::raw("Edit key "),
                key_span("s", Color::Green),
                Span::raw("Sort "),
            ],
            Focus::Matrix => vec![
                key_span("hjkl", Color::Cyan),
                Span::raw("Move "),
                key_span("Space", Color::Green),
                Span::raw("Toggle link "),
            ],
        }
    };

    if !ctx.editing {
        help_spans.extend([
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            key_span("Tab", Color::White),
            Span::raw("Pane "),
            key_span("b", Color::Magenta),
            Span::raw("Bidirectional "),
            key_span("c/C", Color::Blue),
            Span::raw("Copy list/matrix "),
            key_span("W", Color::Red),
            Span::raw("Reset "),
            key_span("?", Color::White),
            Span::raw("Help "),
            key_span("q", Color::Yellow),
            Span::raw("Quit"),
        ]);
    }

    let paragraph = Paragraph::new(Line::from(help_spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}
