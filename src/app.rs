//! Root application
//!
//! The App owns the store and the panes. Panes turn keys into Actions;
//! the App applies document-changing Actions to the store and then lets
//! every pane re-sync its view state. App holds no matrix logic itself.

use crate::action::Action;
use crate::component::Component;
use crate::components::status_bar::{render_help_bar, render_status_bar, StatusContext};
use crate::components::{
    calculate_main_layout, ComponentListPane, HelpDialog, MatrixPane, QuitDialog,
    SortingKeysPane, WipeDialog,
};
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::Focus;
use crate::model::DsmStore;
use crate::services::clipboard::{self, ClipboardError};
use crate::services::export;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

/// Where copied text goes; the terminal clipboard outside of tests
pub type ClipboardSink = Box<dyn FnMut(&str) -> Result<(), ClipboardError>>;

pub struct App {
    /// Owner of the matrix document
    pub store: DsmStore,

    /// Pane receiving keys
    pub focus: Focus,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    clipboard: ClipboardSink,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub component_list: ComponentListPane,
    pub sorting_keys: SortingKeysPane,
    pub matrix: MatrixPane,
    pub quit_dialog: QuitDialog,
    pub wipe_dialog: WipeDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(store: DsmStore) -> App {
        Self::with_clipboard(store, Box::new(clipboard::copy_to_clipboard))
    }

    pub fn with_clipboard(store: DsmStore, clipboard: ClipboardSink) -> App {
        App {
            store,
            focus: Focus::default(),
            modals: ModalStack::new(),
            should_quit: false,
            status_message: None,
            clipboard,
            component_list: ComponentListPane::new(),
            sorting_keys: SortingKeysPane::new(),
            matrix: MatrixPane::new(),
            quit_dialog: QuitDialog,
            wipe_dialog: WipeDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    /// Send a key to the pane that has focus
    fn dispatch_to_focused(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let state = self.store.state();
        match self.focus {
            Focus::Components => self.component_list.handle_key_event(key, state),
            Focus::SortingKeys => self.sorting_keys.handle_key_event(key, state),
            Focus::Matrix => self.matrix.handle_key_event(key, state),
        }
    }

    fn is_editing(&self) -> bool {
        self.component_list.is_editing() || self.sorting_keys.is_editing()
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        self.status_message = None;
        let state = self.store.state();

        if let Some(modal) = self.modals.top() {
            return match modal {
                Modal::QuitConfirm => self.quit_dialog.handle_key_event(key, state),
                Modal::WipeConfirm => self.wipe_dialog.handle_key_event(key, state),
                Modal::Help => self.help_dialog.handle_key_event(key, state),
            };
        }

        // Text entry swallows every key, including the global shortcuts
        if self.is_editing() {
            return self.dispatch_to_focused(key);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Tab => Some(Action::NextFocus),
            KeyCode::BackTab => Some(Action::PrevFocus),
            KeyCode::Char('b') => Some(Action::ToggleBidirectional),
            KeyCode::Char('W') => Some(Action::OpenWipeDialog),
            KeyCode::Char('c') => Some(Action::CopyComponentList),
            KeyCode::Char('C') => Some(Action::CopyMatrix),
            _ => return self.dispatch_to_focused(key),
        };
        Ok(action)
    }

    pub fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if !matches!(action, Action::Tick) {
            tracing::debug!(%action, "update");
        }

        match &action {
            Action::Tick | Action::Resize(_, _) => return Ok(None),
            Action::ForceQuit => {
                tracing::info!("quitting");
                self.should_quit = true;
                return Ok(None);
            }
            Action::NextFocus => self.focus = self.focus.next(),
            Action::PrevFocus => self.focus = self.focus.prev(),
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenWipeDialog => self.modals.push(Modal::WipeConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::AddComponent(name) => {
                self.store.add_component(name);
            }
            Action::RemoveComponent(id) => self.store.remove_component(id),
            Action::RenameComponent { id, name } => self.store.rename_component(id, name),
            Action::ReorderComponents(from, to) => self.store.reorder_components(*from, *to),
            Action::ToggleLink { row, col } => self.store.toggle_link(row, col),
            Action::ToggleBidirectional => {
                let flag = !self.store.state().is_bidirectional_link;
                self.store.set_bidirectional(flag);
            }
            Action::WipeMatrix => {
                self.modals.pop();
                self.store.wipe_matrix();
                self.status_message = Some("Matrix reset".to_string());
            }
            Action::SetSortingKey { id, key } => self.store.set_sorting_key(id, key),
            Action::SortComponents => {
                self.store.sort_components_by_keys();
                self.status_message = Some("Components sorted by key".to_string());
            }
            Action::CopyComponentList => {
                let text = export::component_list_text(self.store.state());
                self.copy(&text, "Copied to clipboard!");
            }
            Action::CopyMatrix => match export::matrix_text(self.store.state())? {
                Some(text) => self.copy(&text, "Matrix copied to clipboard!"),
                None => self.status_message = Some("No components to copy!".to_string()),
            },
        }

        let state = self.store.state();
        self.component_list.update(&action, state)?;
        self.sorting_keys.update(&action, state)?;
        self.matrix.update(&action, state)?;

        Ok(None)
    }

    fn copy(&mut self, text: &str, success: &str) {
        match (self.clipboard)(text) {
            Ok(()) => self.status_message = Some(success.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                self.status_message = Some(format!("Copy failed: {}", e));
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);
        let state = self.store.state();
        let has_modal = !self.modals.is_empty();
        let focus = self.focus;
        let focused = |pane: Focus| !has_modal && focus == pane;

        self.component_list
            .draw(frame, layout.components, state, focused(Focus::Components))?;
        self.sorting_keys
            .draw(frame, layout.sorting_keys, state, focused(Focus::SortingKeys))?;
        self.matrix
            .draw(frame, layout.matrix, state, focused(Focus::Matrix))?;

        let ctx = StatusContext {
            state,
            focus: self.focus,
            editing: self.is_editing(),
            status_message: self.status_message.as_deref(),
            persist_error: self.store.last_persist_error(),
        };
        render_status_bar(frame, layout.status, &ctx);
        render_help_bar(frame, layout.help, &ctx);

        if let Some(modal) = self.modals.top() {
            match modal {
                Modal::QuitConfirm => self.quit_dialog.draw(frame, area, state, true)?,
                Modal::WipeConfirm => self.wipe_dialog.draw(frame, area, state, true)?,
                Modal::Help => self.help_dialog.draw(frame, area, state, true)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(copied: Rc<RefCell<Vec<String>>>) -> App {
        let store = DsmStore::open(Box::new(MemoryStorage::default()));
        App::with_clipboard(
            store,
            Box::new(move |text: &str| {
                copied.borrow_mut().push(text.to_string());
                Ok(())
            }),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        let mut next = app.handle_key_event(key(code)).unwrap();
        while let Some(action) = next {
            next = app.update(action).unwrap();
        }
    }

    fn names(app: &App) -> Vec<String> {
        app.store.state().components.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_starts_with_seeded_components() {
        let app = app_with(Rc::default());
        assert_eq!(names(&app), ["Tail", "Wings", "Fuselage", "Canopy"]);
    }

    #[test]
    fn test_add_then_rename_from_list() {
        let mut app = app_with(Rc::default());

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.component_list.list_state.selected(), Some(4));

        press(&mut app, KeyCode::Enter);
        for _ in 0.."New Component".len() {
            press(&mut app, KeyCode::Backspace);
        }
        // 'q' is typed into the name, not treated as quit
        for c in "Rudq".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.modals.is_empty());
        assert_eq!(names(&app).last().map(String::as_str), Some("Rudq"));
    }

    #[test]
    fn test_matrix_toggle_and_copy() {
        let copied: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut app = app_with(copied.clone());

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Matrix);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('C'));

        let state = app.store.state();
        assert!(state.is_cell_linked(0, 1));
        let copied = copied.borrow();
        assert_eq!(copied.len(), 1);
        assert!(copied[0].starts_with("\tA\tB\tC\tD\nA\tA\tX\t\t\n"));
        assert_eq!(app.status_message.as_deref(), Some("Matrix copied to clipboard!"));
    }

    #[test]
    fn test_wipe_requires_confirmation() {
        let copied: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut app = app_with(copied.clone());

        press(&mut app, KeyCode::Char('W'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(names(&app).len(), 4);

        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Char('W'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.modals.is_empty());
        assert!(names(&app).is_empty());
        assert!(app.store.state().is_bidirectional_link);

        press(&mut app, KeyCode::Char('C'));
        assert!(copied.borrow().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("No components to copy!"));
    }

    #[test]
    fn test_sort_from_keys_pane() {
        let mut app = app_with(Rc::default());
        press(&mut app, KeyCode::Tab);

        // Give "Tail" the key "Z" so it sorts last
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(names(&app), ["Wings", "Fuselage", "Canopy", "Tail"]);
    }

    #[test]
    fn test_quit_flow() {
        let mut app = app_with(Rc::default());

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
    }
}
