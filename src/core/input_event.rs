//! Structured input events decoded from raw terminal chunks.

use crate::core::input::{parse_key, parse_key_event_type, parse_text, KeyEventType};
use crate::core::sequence::split_sequences;

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

/// Input event delivered to the session.
///
/// `raw` is the exact sequence received from the terminal. Text and paste events carry decoded
/// text so panes never parse escape sequences themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        raw: String,
        key_id: String,
        event_type: KeyEventType,
    },
    Text {
        raw: String,
        text: String,
        event_type: KeyEventType,
    },
    Paste {
        raw: String,
        text: String,
    },
    Resize {
        columns: u16,
        rows: u16,
    },
    UnknownRaw {
        raw: String,
    },
}

impl InputEvent {
    /// Convenience constructor for a key press with a synthetic raw sequence.
    pub fn key(key_id: impl Into<String>) -> Self {
        let key_id = key_id.into();
        Self::Key {
            raw: key_id.clone(),
            key_id,
            event_type: KeyEventType::Press,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::Text {
            raw: text.clone(),
            text,
            event_type: KeyEventType::Press,
        }
    }

    /// Key id used for binding lookups. Single-character text doubles as its own key id.
    pub fn key_id(&self) -> Option<&str> {
        match self {
            Self::Key { key_id, .. } => Some(key_id),
            Self::Text { text, .. } if text.chars().count() == 1 => Some(text),
            _ => None,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(
            self,
            Self::Key {
                event_type: KeyEventType::Release,
                ..
            } | Self::Text {
                event_type: KeyEventType::Release,
                ..
            }
        )
    }
}

pub fn parse_input_events(data: &str, kitty_active: bool) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut remaining = data;
    while !remaining.is_empty() {
        let Some(start) = remaining.find(PASTE_START) else {
            events.extend(parse_non_paste(remaining, kitty_active));
            break;
        };

        events.extend(parse_non_paste(&remaining[..start], kitty_active));

        let after_start = &remaining[start + PASTE_START.len()..];
        let Some(end_rel) = after_start.find(PASTE_END) else {
            events.push(InputEvent::UnknownRaw {
                raw: remaining[start..].to_string(),
            });
            break;
        };

        let raw_end = start + PASTE_START.len() + end_rel + PASTE_END.len();
        events.push(InputEvent::Paste {
            raw: remaining[start..raw_end].to_string(),
            text: after_start[..end_rel].to_string(),
        });
        remaining = &after_start[end_rel + PASTE_END.len()..];
    }

    events
}

/// A chunk that is one key or a run of plain text becomes one event. Anything else is split
/// into individual keys first, so batched reads never collapse into an unknown blob.
fn parse_non_paste(data: &str, kitty_active: bool) -> Vec<InputEvent> {
    if data.is_empty() {
        return Vec::new();
    }
    if let Some(event) = parse_single(data, kitty_active) {
        return event.into_iter().collect();
    }

    let split = split_sequences(data);
    split
        .sequences
        .iter()
        .map(String::as_str)
        .chain(Some(split.remainder.as_str()).filter(|tail| !tail.is_empty()))
        .filter_map(|sequence| match parse_single(sequence, kitty_active) {
            Some(event) => event,
            None => Some(InputEvent::UnknownRaw {
                raw: sequence.to_string(),
            }),
        })
        .collect()
}

/// `None` when `data` is not a single key or text run; `Some(None)` for a dropped release.
fn parse_single(data: &str, kitty_active: bool) -> Option<Option<InputEvent>> {
    let event_type = parse_key_event_type(data);

    if let Some(text) = parse_text(data) {
        if event_type == KeyEventType::Release {
            return Some(None);
        }
        return Some(Some(InputEvent::Text {
            raw: data.to_string(),
            text,
            event_type,
        }));
    }

    let key_id = parse_key(data, kitty_active)?;
    Some(Some(InputEvent::Key {
        raw: data.to_string(),
        key_id,
        event_type,
    }))
}
