//! Action enum - All possible application actions
//!
//! Panes emit Actions in response to key events; the App applies the
//! matrix-changing ones to the store and routes the rest.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────────
    /// Move keyboard focus to the next pane
    NextFocus,
    /// Move keyboard focus to the previous pane
    PrevFocus,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenWipeDialog,
    OpenHelp,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Components
    // ─────────────────────────────────────────────────────────────────────────
    AddComponent(String),
    RemoveComponent(String),
    RenameComponent { id: String, name: String },
    /// Move a component from one display index to another
    ReorderComponents(usize, usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────
    ToggleLink { row: String, col: String },
    ToggleBidirectional,
    /// Clear the whole matrix (after confirmation)
    WipeMatrix,

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────
    SetSortingKey { id: String, key: String },
    SortComponents,

    // ─────────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────────
    CopyComponentList,
    CopyMatrix,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextFocus => write!(f, "NextFocus"),
            Action::PrevFocus => write!(f, "PrevFocus"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenWipeDialog => write!(f, "OpenWipeDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::AddComponent(name) => write!(f, "AddComponent({})", name),
            Action::RemoveComponent(id) => write!(f, "RemoveComponent({})", id),
            Action::RenameComponent { id, name } => write!(f, "RenameComponent({}, {})", id, name),
            Action::ReorderComponents(from, to) => write!(f, "ReorderComponents({}, {})", from, to),
            Action::ToggleLink { row, col } => write!(f, "ToggleLink({}, {})", row, col),
            Action::ToggleBidirectional => write!(f, "ToggleBidirectional"),
            Action::WipeMatrix => write!(f, "WipeMatrix"),
            Action::SetSortingKey { id, key } => write!(f, "SetSortingKey({}, {})", id, key),
            Action::SortComponents => write!(f, "SortComponents"),
            Action::CopyComponentList => write!(f, "CopyComponentList"),
            Action::CopyMatrix => write!(f, "CopyMatrix"),
        }
    }
}
