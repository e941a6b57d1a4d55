//! Sorting keys pane
//!
//! One short key per component, aligned with the components list. Keys
//! are edited in a local buffer and only committed on Enter.

use crate::action::Action;
use crate::component::Component;
use crate::components::component_list::{clamp_selection, step_selection};
use crate::model::dsm::MAX_SORTING_KEY_LEN;
use crate::model::DsmState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub struct SortingKeysPane {
    pub list_state: ListState,
    /// Component whose key is being edited
    pub editing: Option<String>,
    pub input: String,
}

impl Default for SortingKeysPane {
    fn default() -> Self {
        Self::new()
    }
}

impl SortingKeysPane {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            editing: None,
            input: String::new(),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                let id = self.editing.take()?;
                Some(Action::SetSortingKey {
                    id,
                    key: std::mem::take(&mut self.input),
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
            // Input that would exceed the limit once uppercased is dropped
            KeyCode::Char(c) => {
                let upper: String = c.to_uppercase().collect();
                if self.input.chars().count() + upper.chars().count() <= MAX_SORTING_KEY_LEN {
                    self.input.push_str(&upper);
                }
                None
            }
            _ => None,
        }
    }
}

impl Component for SortingKeysPane {
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
            KeyCode::Enter | KeyCode::Char('e') => {
                let selected = self.list_state.selected().and_then(|i| state.components.get(i));
                if let Some(component) = selected {
                    self.editing = Some(component.id.clone());
                    self.input = state.sorting_key(&component.id).to_string();
                }
                None
            }
            KeyCode::Char('s') => Some(Action::SortComponents),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action, state: &DsmState) -> Result<Option<Action>> {
        if matches!(action, Action::WipeMatrix | Action::RemoveComponent(_)) {
            self.editing = None;
            self.input.clear();
        }
        clamp_selection(&mut self.list_state, state.components.len());
        Ok(None)
    }

    fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &DsmState, focused: bool) -> Result<()> {
        let items: Vec<ListItem> = state
            .components
            .iter()
            .map(|component| {
                if self.editing.as_deref() == Some(component.id.as_str()) {
                    ListItem::new(Line::from(Span::styled(
                        format!("[{:<2}]", self.input),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )))
                } else {
                    ListItem::new(Line::from(format!(" {:<2} ", state.sorting_key(&component.id))))
                }
            })
            .collect();

        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let mut list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keys ")
                .border_style(Style::default().fg(border_color)),
        );
        if focused {
            list = list.highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
        }

        frame.render_stateful_widget(list, area, &mut self.list_state);
        Ok(())
    }
}
