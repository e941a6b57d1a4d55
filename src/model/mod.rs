//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `DsmState` - The persisted matrix document (components, keys, links)
//! - `DsmStore` - Owner of the document; every mutation goes through it
//! - `ModalStack` - Modal overlay management
//! - `Focus` - Which pane receives keys

pub mod dsm;
pub mod modal;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use dsm::{column_label, DsmState};
pub use store::DsmStore;
