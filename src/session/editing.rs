//! Key handling shared by the code pane and the chat composer.

use tracing::debug;

use crate::core::keybindings::{KeybindingsManager, SessionAction};
use crate::core::text_buffer::{Direction, TextBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    Edited,
    Unhandled,
}

/// Inserts typed text one character at a time. Rejected characters are dropped.
pub(crate) fn type_text(buffer: &mut TextBuffer, text: &str) -> EditOutcome {
    let mut edited = false;
    for ch in text.chars() {
        match buffer.insert_char(ch) {
            Ok(()) => edited = true,
            Err(error) => debug!(%error, "dropped typed character"),
        }
    }
    if edited {
        EditOutcome::Edited
    } else {
        EditOutcome::Unhandled
    }
}

/// Applies cursor movement, deletion and indentation keys.
pub(crate) fn apply_edit_key(
    buffer: &mut TextBuffer,
    key_id: &str,
    keybindings: &KeybindingsManager,
) -> EditOutcome {
    let moves = [
        (SessionAction::CursorUp, Direction::Up),
        (SessionAction::CursorDown, Direction::Down),
        (SessionAction::CursorLeft, Direction::Left),
        (SessionAction::CursorRight, Direction::Right),
    ];
    for (action, direction) in moves {
        if keybindings.matches(key_id, action) {
            buffer.move_cursor(direction);
            return EditOutcome::Edited;
        }
    }

    if keybindings.matches(key_id, SessionAction::DeleteBackward) {
        buffer.backspace();
    } else if keybindings.matches(key_id, SessionAction::Indent) {
        buffer.indent();
    } else if keybindings.matches(key_id, SessionAction::Outdent) {
        buffer.outdent();
    } else if key_id == "space" {
        let _ = buffer.insert_char(' ');
    } else {
        return EditOutcome::Unhandled;
    }
    EditOutcome::Edited
}
