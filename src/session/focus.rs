//! Focus routing between the code pane, the chat composer and the chat history.

use std::fmt;

use crate::core::keybindings::{KeybindingsManager, SessionAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Code,
    Chat,
    Scroll,
}

impl FocusArea {
    fn up(self) -> Self {
        match self {
            Self::Code => Self::Scroll,
            Self::Scroll => Self::Chat,
            Self::Chat => Self::Code,
        }
    }

    fn down(self) -> Self {
        match self {
            Self::Code => Self::Chat,
            Self::Chat => Self::Scroll,
            Self::Scroll => Self::Code,
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Code => "code",
            Self::Chat => "chat",
            Self::Scroll => "scroll",
        })
    }
}

/// What the router did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    NavigationToggled(bool),
    FocusMoved(FocusArea),
    /// Swallowed while navigation mode is on.
    Ignored,
    Delegate(FocusArea),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRouter {
    focus: FocusArea,
    navigation_mode: bool,
}

impl Default for FocusRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusRouter {
    pub fn new() -> Self {
        Self {
            focus: FocusArea::Chat,
            navigation_mode: false,
        }
    }

    pub fn focus(&self) -> FocusArea {
        self.focus
    }

    pub fn navigation_mode(&self) -> bool {
        self.navigation_mode
    }

    /// True when `area` should receive edits: it holds focus and navigation mode is off.
    pub fn is_active(&self, area: FocusArea) -> bool {
        self.focus == area && !self.navigation_mode
    }

    pub fn toggle_navigation(&mut self) -> bool {
        self.navigation_mode = !self.navigation_mode;
        self.navigation_mode
    }

    pub fn route(&mut self, key_id: Option<&str>, keybindings: &KeybindingsManager) -> Routed {
        let Some(key_id) = key_id else {
            return self.delegate();
        };

        if keybindings.matches(key_id, SessionAction::ToggleNavigation) {
            return Routed::NavigationToggled(self.toggle_navigation());
        }

        if !self.navigation_mode {
            return Routed::Delegate(self.focus);
        }

        if keybindings.matches(key_id, SessionAction::FocusUp) {
            self.focus = self.focus.up();
            return Routed::FocusMoved(self.focus);
        }
        if keybindings.matches(key_id, SessionAction::FocusDown) {
            self.focus = self.focus.down();
            return Routed::FocusMoved(self.focus);
        }

        Routed::Ignored
    }

    fn delegate(&self) -> Routed {
        if self.navigation_mode {
            Routed::Ignored
        } else {
            Routed::Delegate(self.focus)
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
