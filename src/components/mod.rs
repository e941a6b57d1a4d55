//! UI Components
//!
//! Each pane keeps its own view state and renders the matrix document it
//! is given. Panes communicate through Actions rather than mutating the
//! document.

pub mod component_list;
pub mod help_dialog;
pub mod layout;
pub mod matrix;
pub mod quit_dialog;
pub mod sorting_keys;
pub mod status_bar;
pub mod wipe_dialog;

pub use component_list::ComponentListPane;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use matrix::MatrixPane;
pub use quit_dialog::QuitDialog;
pub use sorting_keys::SortingKeysPane;
pub use wipe_dialog::WipeDialog;
