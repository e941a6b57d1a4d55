//! Services layer - I/O outside the matrix model
//!
//! - `storage` - Reading and writing the persisted document
//! - `export` - Text forms of the list and matrix for the clipboard
//! - `clipboard` - Terminal clipboard via OSC 52

pub mod clipboard;
pub mod export;
pub mod storage;
