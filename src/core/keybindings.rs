//! Session keybindings: actions mapped to key ids, with per-action overrides.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::input::key_ids_equal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    ToggleNavigation,
    Submit,
    StartInterview,
    Quit,
    CloseFeedback,
    EndInterview,
    FocusUp,
    FocusDown,
    Indent,
    Outdent,
    NewLine,
    DeleteBackward,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

pub type KeyId = String;

#[derive(Debug, Clone)]
pub enum KeyBinding {
    Single(KeyId),
    Multiple(Vec<KeyId>),
}

impl From<&str> for KeyBinding {
    fn from(value: &str) -> Self {
        KeyBinding::Single(value.to_string())
    }
}

impl From<Vec<&str>> for KeyBinding {
    fn from(value: Vec<&str>) -> Self {
        KeyBinding::Multiple(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeybindingsConfig {
    entries: HashMap<SessionAction, KeyBinding>,
}

impl KeybindingsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K: Into<KeyBinding>>(&mut self, action: SessionAction, keys: K) {
        self.entries.insert(action, keys.into());
    }
}

static DEFAULT_KEYBINDINGS: Lazy<HashMap<SessionAction, Vec<KeyId>>> = Lazy::new(|| {
    use SessionAction::*;

    let table: [(SessionAction, &[&str]); 20] = [
        (ToggleNavigation, &["ctrl+w"]),
        (Submit, &["ctrl+enter", "ctrl+s"]),
        (StartInterview, &["s"]),
        (Quit, &["q", "ctrl+c"]),
        (CloseFeedback, &["q", "enter"]),
        (EndInterview, &["ctrl+x"]),
        (FocusUp, &["up"]),
        (FocusDown, &["down"]),
        (Indent, &["tab"]),
        (Outdent, &["shift+tab"]),
        (NewLine, &["enter", "shift+enter"]),
        (DeleteBackward, &["backspace", "delete"]),
        (CursorUp, &["up"]),
        (CursorDown, &["down"]),
        (CursorLeft, &["left"]),
        (CursorRight, &["right"]),
        (ScrollUp, &["up"]),
        (ScrollDown, &["down"]),
        (PageUp, &["pageUp"]),
        (PageDown, &["pageDown"]),
    ];

    table
        .into_iter()
        .map(|(action, keys)| (action, keys.iter().map(|key| key.to_string()).collect()))
        .collect()
});

#[derive(Debug, Clone)]
pub struct KeybindingsManager {
    action_to_keys: HashMap<SessionAction, Vec<KeyId>>,
}

impl Default for KeybindingsManager {
    fn default() -> Self {
        Self::new(KeybindingsConfig::default())
    }
}

impl KeybindingsManager {
    pub fn new(config: KeybindingsConfig) -> Self {
        let mut action_to_keys = DEFAULT_KEYBINDINGS.clone();
        for (action, binding) in config.entries {
            let keys = match binding {
                KeyBinding::Single(key) => vec![key],
                KeyBinding::Multiple(keys) => keys,
            };
            action_to_keys.insert(action, keys);
        }
        Self { action_to_keys }
    }

    /// True when `key_id` is bound to `action`.
    pub fn matches(&self, key_id: &str, action: SessionAction) -> bool {
        self.action_to_keys
            .get(&action)
            .is_some_and(|keys| keys.iter().any(|key| key_ids_equal(key, key_id)))
    }

    pub fn get_keys(&self, action: SessionAction) -> Vec<KeyId> {
        self.action_to_keys.get(&action).cloned().unwrap_or_default()
    }

    /// First bound key, used for on-screen hints.
    pub fn hint(&self, action: SessionAction) -> String {
        self.get_keys(action).into_iter().next().unwrap_or_default()
    }
}
