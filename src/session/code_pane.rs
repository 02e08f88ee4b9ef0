//! Code pane: a text buffer with its own scrolled viewport and the last submitted snapshot.

use tracing::debug;

use crate::core::keybindings::{KeybindingsManager, SessionAction};
use crate::core::scroll::Viewport;
use crate::core::text_buffer::TextBuffer;
use crate::session::editing::{apply_edit_key, type_text, EditOutcome};

pub const CODE_PANE_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOutcome {
    Edited,
    Scrolled,
    Submitted,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct CodePane {
    buffer: TextBuffer,
    viewport: Viewport,
    submitted: String,
}

impl Default for CodePane {
    fn default() -> Self {
        Self::new(CODE_PANE_HEIGHT)
    }
}

impl CodePane {
    pub fn new(height: usize) -> Self {
        Self {
            buffer: TextBuffer::new(),
            viewport: Viewport::new(height),
            submitted: String::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn submitted_code(&self) -> &str {
        &self.submitted
    }

    /// Code sent as chat context: the live buffer when it has content, else the last submission.
    pub fn context_code(&self) -> String {
        let current = self.buffer.text();
        let current = current.trim();
        if current.is_empty() {
            self.submitted.clone()
        } else {
            current.to_string()
        }
    }

    pub fn type_text(&mut self, text: &str) -> CodeOutcome {
        let outcome = type_text(&mut self.buffer, text);
        self.after_edit(outcome)
    }

    pub fn paste(&mut self, text: &str) -> CodeOutcome {
        if self.buffer.insert_text(text) == 0 {
            return CodeOutcome::Ignored;
        }
        self.after_edit(EditOutcome::Edited)
    }

    pub fn handle_key(&mut self, key_id: &str, keybindings: &KeybindingsManager) -> CodeOutcome {
        if keybindings.matches(key_id, SessionAction::Submit) {
            return match self.buffer.submit() {
                Some(code) => {
                    debug!(lines = code.lines().count(), "code submitted");
                    self.submitted = code;
                    self.viewport.reset();
                    CodeOutcome::Submitted
                }
                None => CodeOutcome::Ignored,
            };
        }

        if keybindings.matches(key_id, SessionAction::PageUp) {
            self.viewport.page(false, self.buffer.line_count());
            return CodeOutcome::Scrolled;
        }
        if keybindings.matches(key_id, SessionAction::PageDown) {
            self.viewport.page(true, self.buffer.line_count());
            return CodeOutcome::Scrolled;
        }

        if keybindings.matches(key_id, SessionAction::NewLine) {
            self.buffer.newline();
            return self.after_edit(EditOutcome::Edited);
        }

        let outcome = apply_edit_key(&mut self.buffer, key_id, keybindings);
        self.after_edit(outcome)
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.viewport.reset();
        self.submitted.clear();
    }

    fn after_edit(&mut self, outcome: EditOutcome) -> CodeOutcome {
        match outcome {
            EditOutcome::Edited => {
                self.viewport
                    .ensure_visible(self.buffer.cursor().row, self.buffer.line_count());
                CodeOutcome::Edited
            }
            EditOutcome::Unhandled => CodeOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CodeOutcome, CodePane};
    use crate::core::keybindings::KeybindingsManager;

    fn pane_with_lines(count: usize) -> CodePane {
        let keys = KeybindingsManager::default();
        let mut pane = CodePane::default();
        for index in 0..count {
            pane.type_text(&format!("line {index}"));
            if index + 1 < count {
                pane.handle_key("enter", &keys);
            }
        }
        pane
    }

    #[test]
    fn viewport_follows_cursor_down() {
        let pane = pane_with_lines(10);
        assert_eq!(pane.buffer().cursor().row, 9);
        assert_eq!(pane.viewport().offset(), 4);
    }

    #[test]
    fn page_keys_scroll_without_moving_cursor() {
        let keys = KeybindingsManager::default();
        let mut pane = pane_with_lines(20);
        assert_eq!(pane.viewport().offset(), 14);

        assert_eq!(pane.handle_key("pageUp", &keys), CodeOutcome::Scrolled);
        assert_eq!(pane.viewport().offset(), 8);
        assert_eq!(pane.buffer().cursor().row, 19);

        pane.handle_key("pageDown", &keys);
        pane.handle_key("pageDown", &keys);
        assert_eq!(pane.viewport().offset(), 14);
    }

    #[test]
    fn cursor_move_after_paging_snaps_back() {
        let keys = KeybindingsManager::default();
        let mut pane = pane_with_lines(20);
        pane.handle_key("pageUp", &keys);
        pane.handle_key("pageUp", &keys);
        assert_eq!(pane.viewport().offset(), 2);
        pane.handle_key("up", &keys);
        assert_eq!(pane.buffer().cursor().row, 18);
        assert_eq!(pane.viewport().offset(), 13);
    }

    #[test]
    fn submit_keeps_snapshot_and_resets_buffer() {
        let keys = KeybindingsManager::default();
        let mut pane = CodePane::default();
        pane.type_text("  return a + b;  ");
        assert_eq!(pane.context_code(), "return a + b;");

        assert_eq!(pane.handle_key("ctrl+enter", &keys), CodeOutcome::Submitted);
        assert_eq!(pane.submitted_code(), "return a + b;");
        assert_eq!(pane.buffer().text(), "");
        assert_eq!(pane.context_code(), "return a + b;");

        assert_eq!(pane.handle_key("ctrl+s", &keys), CodeOutcome::Ignored);
        assert_eq!(pane.submitted_code(), "return a + b;");

        pane.type_text("draft");
        assert_eq!(pane.context_code(), "draft");
    }

    #[test]
    fn tab_and_shift_tab_indent() {
        let keys = KeybindingsManager::default();
        let mut pane = CodePane::default();
        pane.type_text("x");
        pane.handle_key("tab", &keys);
        pane.handle_key("tab", &keys);
        assert_eq!(pane.buffer().text(), "        x");
        pane.handle_key("shift+tab", &keys);
        assert_eq!(pane.buffer().text(), "    x");
        assert_eq!(pane.buffer().cursor().col, 5);
    }

    #[test]
    fn delete_behaves_like_backspace() {
        let keys = KeybindingsManager::default();
        let mut pane = CodePane::default();
        pane.type_text("ab");
        pane.handle_key("delete", &keys);
        assert_eq!(pane.buffer().text(), "a");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let keys = KeybindingsManager::default();
        let mut pane = CodePane::default();
        assert_eq!(pane.handle_key("f5", &keys), CodeOutcome::Ignored);
    }
}
