//! Chat composer: the multi-line message input under the chat history.

use crate::core::keybindings::{KeybindingsManager, SessionAction};
use crate::core::scroll::Viewport;
use crate::core::text_buffer::TextBuffer;
use crate::session::editing::{apply_edit_key, type_text, EditOutcome};

pub const COMPOSER_HEIGHT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerOutcome {
    Edited,
    Submit(String),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ChatComposer {
    buffer: TextBuffer,
    viewport: Viewport,
}

impl Default for ChatComposer {
    fn default() -> Self {
        Self::new(COMPOSER_HEIGHT)
    }
}

impl ChatComposer {
    pub fn new(height: usize) -> Self {
        Self {
            buffer: TextBuffer::new(),
            viewport: Viewport::new(height),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn type_text(&mut self, text: &str) -> ComposerOutcome {
        let outcome = type_text(&mut self.buffer, text);
        self.after_edit(outcome)
    }

    pub fn paste(&mut self, text: &str) -> ComposerOutcome {
        if self.buffer.insert_text(text) == 0 {
            return ComposerOutcome::Ignored;
        }
        self.after_edit(EditOutcome::Edited)
    }

    /// Enter on a blank last line sends the message; elsewhere it splits the line.
    pub fn handle_key(
        &mut self,
        key_id: &str,
        keybindings: &KeybindingsManager,
    ) -> ComposerOutcome {
        if keybindings.matches(key_id, SessionAction::Submit) {
            return self.take_message();
        }

        if keybindings.matches(key_id, SessionAction::NewLine) {
            if self.buffer.cursor_on_last_line() && self.buffer.current_line().trim().is_empty() {
                return self.take_message();
            }
            self.buffer.newline();
            return self.after_edit(EditOutcome::Edited);
        }

        let outcome = apply_edit_key(&mut self.buffer, key_id, keybindings);
        self.after_edit(outcome)
    }

    /// Puts a rejected message back so the candidate can resend it.
    pub fn restore(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.insert_text(text);
        self.after_edit(EditOutcome::Edited);
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.viewport.reset();
    }

    fn take_message(&mut self) -> ComposerOutcome {
        match self.buffer.submit() {
            Some(text) => {
                self.viewport.reset();
                ComposerOutcome::Submit(text)
            }
            None => ComposerOutcome::Ignored,
        }
    }

    fn after_edit(&mut self, outcome: EditOutcome) -> ComposerOutcome {
        match outcome {
            EditOutcome::Edited => {
                self.viewport
                    .ensure_visible(self.buffer.cursor().row, self.buffer.line_count());
                ComposerOutcome::Edited
            }
            EditOutcome::Unhandled => ComposerOutcome::Ignored,
        }
    }
}
