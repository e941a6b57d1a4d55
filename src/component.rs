//! Component trait - Interface for UI panes
//!
//! Each pane keeps only view-local state (selection, cursor, edit
//! buffers) and reads the matrix document it is handed. Changes to the
//! document are requested by returning Actions.

use crate::action::Action;
use crate::model::DsmState;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI panes and dialogs
///
/// The pattern follows:
/// 1. `handle_key_event` - Convert a key into an Action
/// 2. `update` - React to an Action after the App has applied it
/// 3. `draw` - Render against the current document
pub trait Component {
    /// Handle a key event, returning an optional Action
    fn handle_key_event(&mut self, key: KeyEvent, state: &DsmState) -> Result<Option<Action>> {
        let _ = (key, state);
        Ok(None)
    }

    /// Update view state after an Action has been applied
    ///
    /// Used to keep selections valid when the document changes shape.
    fn update(&mut self, action: &Action, state: &DsmState) -> Result<Option<Action>> {
        let _ = (action, state);
        Ok(None)
    }

    /// Whether the pane is capturing raw text input
    fn is_editing(&self) -> bool {
        false
    }

    /// Draw the component to the frame
    ///
    /// `focused` tells the pane whether it currently owns the keyboard.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &DsmState, focused: bool) -> Result<()>;
}
