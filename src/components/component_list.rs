//! Components list pane
//!
//! Shows components in display order with their matrix labels. Owns the
//! selection and the rename edit buffer; neither is persisted.

use crate::action::Action;
use crate::component::Component;
use crate::model::{column_label, DsmState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Name given to components created from the list
pub const NEW_COMPONENT_NAME: &str = "New Component";

/// Move a list selection one step, clamped to `len`
pub(crate) fn step_selection(list_state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let current = list_state.selected().unwrap_or(0).min(len - 1);
    let next = if forward {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    };
    list_state.select(Some(next));
}

/// Keep a selection inside a list of `len` items
pub(crate) fn clamp_selection(list_state: &mut ListState, len: usize) {
    if len == 0 {
        list_state.select(None);
    } else {
        let index = list_state.selected().unwrap_or(0).min(len - 1);
        list_state.select(Some(index));
    }
}

pub struct ComponentListPane {
    pub list_state: ListState,
    /// Component being renamed, if any
    pub editing: Option<String>,
    /// Rename buffer
    pub input: String,
}

impl Default for ComponentListPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentListPane {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            editing: None,
            input: String::new(),
        }
    }

    pub fn selected_index(&self, state: &DsmState) -> Option<usize> {
        self.list_state
            .selected()
            .filter(|i| *i < state.components.len())
    }

    fn selected_id(&self, state: &DsmState) -> Option<String> {
        self.selected_index(state)
            .map(|i| state.components[i].id.clone())
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                // Blank names are refused; stay in edit mode
                if self.input.trim().is_empty() {
                    return None;
                }
                let id = self.editing.take()?;
                Some(Action::RenameComponent {
                    id,
                    name: std::mem::take(&mut self.input),
                })
            }
            KeyCode::Esc => {
                self.editing = None;
                self.input.clear();
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }
}

impl Component for ComponentListPane {
    fn handle_key_event(&mut self, key: KeyEvent, state: &DsmState) -> Result<Option<Action>> {
        if self.editing.is_some() {
            return Ok(self.handle_edit_key(key));
        }

        let len = state.components.len();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                step_selection(&mut self.list_state, len, true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                step_selection(&mut self.list_state, len, false);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.list_state.select((len > 0).then_some(0));
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                if len > 0 {
                    self.list_state.select(Some(len - 1));
                }
                None
            }
            KeyCode::Char('a') => Some(Action::AddComponent(NEW_COMPONENT_NAME.to_string())),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.selected_id(state).map(Action::RemoveComponent)
            }
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Some(index) = self.selected_index(state) {
                    let component = &state.components[index];
                    self.editing = Some(component.id.clone());
                    self.input = component.name.clone();
                }
                None
            }
            KeyCode::Char('J') => self
                .selected_index(state)
                .filter(|i| i + 1 < len)
                .map(|i| Action::ReorderComponents(i, i + 1)),
            KeyCode::Char('K') => self
                .selected_index(state)
                .filter(|i| *i > 0)
                .map(|i| Action::ReorderComponents(i, i - 1)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action, state: &DsmState) -> Result<Option<Action>> {
        let len = state.components.len();
        match action {
            Action::AddComponent(_) if len > 0 => self.list_state.select(Some(len - 1)),
            Action::ReorderComponents(_, to) => self.list_state.select(Some(*to)),
            Action::WipeMatrix => {
                self.editing = None;
                self.input.clear();
                clamp_selection(&mut self.list_state, len);
            }
            _ => clamp_selection(&mut self.list_state, len),
        }
        Ok(None)
    }

    fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &DsmState, focused: bool) -> Result<()> {
        let items: Vec<ListItem> = state
            .components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                let label = Span::styled(
                    format!("{:>3} ", column_label(i)),
                    Style::default().fg(Color::DarkGray),
                );
                let name = if self.editing.as_deref() == Some(component.id.as_str()) {
                    Span::styled(
                        format!("{}▏", self.input),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::UNDERLINED),
                    )
                } else {
                    Span::raw(component.name.clone())
                };
                ListItem::new(Line::from(vec![label, name]))
            })
            .collect();

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let mut list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Components ({}) ", state.components.len()))
                .border_style(Style::default().fg(border_color)),
        );
        if focused {
            list = list.highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        }

        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}
