//! Terminal clipboard via the OSC 52 escape sequence
//!
//! Works over SSH and inside tmux without a system clipboard library.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};
use thiserror::Error;

const OSC52_PREFIX: &str = "\x1b]52;c;";
const OSC52_SUFFIX_BEL: &str = "\x07";

const TMUX_PREFIX: &str = "\x1bPtmux;\x1b\x1b]52;c;";
const TMUX_SUFFIX: &str = "\x07\x1b\\";

/// Many terminals cap OSC 52 payloads well below this
pub const OSC52_MAX_BYTES: usize = 100 * 1024;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("text too large for the terminal clipboard ({} KB, limit {} KB)", .bytes / 1024, OSC52_MAX_BYTES / 1024)]
    TooLarge { bytes: usize },
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Osc52Env {
    pub is_tmux: bool,
}

impl Osc52Env {
    pub fn detect() -> Self {
        Self {
            is_tmux: std::env::var_os("TMUX").is_some(),
        }
    }
}

pub fn build_sequence(text: &str, env: Osc52Env) -> Result<String, ClipboardError> {
    let bytes = text.as_bytes();
    if bytes.len() > OSC52_MAX_BYTES {
        return Err(ClipboardError::TooLarge { bytes: bytes.len() });
    }

    let encoded = STANDARD.encode(bytes);
    if env.is_tmux {
        Ok(format!("{TMUX_PREFIX}{encoded}{TMUX_SUFFIX}"))
    } else {
        Ok(format!("{OSC52_PREFIX}{encoded}{OSC52_SUFFIX_BEL}"))
    }
}

/// Put `text` on the clipboard of the terminal attached to stdout
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let sequence = build_sequence(text, Osc52Env::detect())?;
    let mut stdout = io::stdout();
    stdout.write_all(sequence.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sequence_plain() {
        let seq = build_sequence("A\tB", Osc52Env::default()).unwrap();
        assert_eq!(seq, "\x1b]52;c;QQlC\x07");
    }

    #[test]
    fn test_build_sequence_tmux() {
        let seq = build_sequence("hi", Osc52Env { is_tmux: true }).unwrap();
        assert_eq!(seq, "\x1bPtmux;\x1b\x1b]52;c;aGk=\x07\x1b\\");
    }

    #[test]
    fn test_build_sequence_too_large() {
        let text = "x".repeat(OSC52_MAX_BYTES + 1);
        assert!(matches!(
            build_sequence(&text, Osc52Env::default()),
            Err(ClipboardError::TooLarge { .. })
        ));
    }
}
