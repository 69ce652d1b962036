//! Copy a summary to the system clipboard.

use crate::error::ClipboardError;
use arboard::Clipboard;
use tracing::debug;

/// Put `summary` on the clipboard.
///
/// Headless sessions (no X11/Wayland display, CI) report
/// [`ClipboardError::Unavailable`]; callers show the message and carry on.
pub fn copy_summary(summary: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    clipboard
        .set_text(summary.to_owned())
        .map_err(|e| ClipboardError::Write(e.to_string()))?;
    debug!("Copied {} chars to clipboard", summary.chars().count());
    Ok(())
}
