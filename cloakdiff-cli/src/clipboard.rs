//! System clipboard adapter

use cli_clipboard::{ClipboardContext, ClipboardProvider};
use cloakdiff_core::{ClipboardError, ClipboardSink};

/// Writes through the platform clipboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::new(e.to_string()))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| ClipboardError::new(e.to_string()))
    }
}
