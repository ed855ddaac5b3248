use anyhow::Result;
use arboard::Clipboard;

use crate::dom::Document;
use crate::notify::{Notifier, Severity};
use crate::scheduler::Scheduler;

/// Seam over the system clipboard so headless tests can substitute a
/// recording backend.
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Copy text and report the outcome through the notifier. Failures are
/// logged and surfaced as an error notification, never propagated.
pub fn copy_to_clipboard(
    backend: &mut dyn ClipboardBackend,
    doc: &mut Document,
    sched: &mut Scheduler,
    notifier: &mut Notifier,
    text: &str,
) -> bool {
    match backend.set_text(text) {
        Ok(()) => {
            notifier.notify(doc, sched, "Copied to clipboard!", Severity::Success);
            true
        }
        Err(err) => {
            tracing::error!("clipboard write failed: {:#}", err);
            notifier.notify(doc, sched, "Failed to copy", Severity::Error);
            false
        }
    }
}
