//! Chat history viewport: follows the newest message unless the user is scrolling by hand.

use std::time::{Duration, Instant};

use crate::core::scroll::Viewport;
use crate::session::transcript::ChatMessage;

pub const CHAT_WINDOW: usize = 4;
pub const MANUAL_SCROLL_DECAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ChatViewport {
    messages: Vec<ChatMessage>,
    viewport: Viewport,
    manual_scroll: bool,
    manual_deadline: Option<Instant>,
}

impl Default for ChatViewport {
    fn default() -> Self {
        Self::new(CHAT_WINDOW)
    }
}

impl ChatViewport {
    pub fn new(window: usize) -> Self {
        Self {
            messages: Vec::new(),
            viewport: Viewport::new(window),
            manual_scroll: false,
            manual_deadline: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn window(&self) -> usize {
        self.viewport.window()
    }

    pub fn is_manual_scroll(&self) -> bool {
        self.manual_scroll
    }

    pub fn visible(&self) -> &[ChatMessage] {
        &self.messages[self.viewport.range(self.messages.len())]
    }

    /// True when there are more messages than fit in the window.
    pub fn is_scrollable(&self) -> bool {
        self.messages.len() > self.viewport.window()
    }

    /// Messages hidden above and below the window.
    pub fn hidden(&self) -> (usize, usize) {
        self.viewport.hidden(self.messages.len())
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if !self.manual_scroll {
            self.viewport.follow(self.messages.len());
        }
    }

    /// Scrolls by `delta` messages. A move that leaves the offset unchanged does not pause
    /// auto-follow.
    pub fn scroll_by(&mut self, delta: isize, now: Instant) {
        let before = self.viewport.offset();
        self.viewport.scroll_by(delta, self.messages.len());
        if self.viewport.offset() != before {
            self.mark_manual(now);
        }
    }

    pub fn page(&mut self, forward: bool, now: Instant) {
        let before = self.viewport.offset();
        self.viewport.page(forward, self.messages.len());
        if self.viewport.offset() != before {
            self.mark_manual(now);
        }
    }

    /// Expires the manual-scroll flag. Auto-follow resumes on the next append, not here.
    /// Returns true when the flag was cleared.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        match self.manual_deadline {
            Some(deadline) if now >= deadline => {
                self.manual_scroll = false;
                self.manual_deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.viewport.reset();
        self.manual_scroll = false;
        self.manual_deadline = None;
    }

    fn mark_manual(&mut self, now: Instant) {
        self.manual_scroll = true;
        self.manual_deadline = Some(now + MANUAL_SCROLL_DECAY);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ChatViewport, MANUAL_SCROLL_DECAY};
    use crate::session::transcript::ChatMessage;

    fn filled(count: usize) -> ChatViewport {
        let mut view = ChatViewport::default();
        for index in 0..count {
            view.append(ChatMessage::user(format!("m{index}")));
        }
        view
    }

    #[test]
    fn short_history_has_no_scroll() {
        let view = filled(3);
        assert_eq!(view.offset(), 0);
        assert!(!view.is_scrollable());
        assert_eq!(view.visible().len(), 3);
    }

    #[test]
    fn manual_scroll_holds_until_decay_then_next_append_follows() {
        let start = Instant::now();
        let mut view = filled(6);
        assert_eq!(view.offset(), 2);

        view.scroll_by(-1, start);
        assert_eq!(view.offset(), 1);
        assert!(view.is_manual_scroll());

        view.append(ChatMessage::assistant("reply"));
        assert_eq!(view.offset(), 1);

        assert!(!view.on_tick(start + Duration::from_millis(500)));
        assert!(view.is_manual_scroll());
        assert!(view.on_tick(start + MANUAL_SCROLL_DECAY));
        assert!(!view.is_manual_scroll());
        assert_eq!(view.offset(), 1);

        view.append(ChatMessage::user("again"));
        assert_eq!(view.offset(), view.len() - 4);
    }

    #[test]
    fn repeated_scroll_restarts_decay() {
        let start = Instant::now();
        let mut view = filled(10);
        view.scroll_by(-1, start);
        view.scroll_by(-1, start + Duration::from_millis(800));
        assert!(!view.on_tick(start + Duration::from_millis(1200)));
        assert!(view.on_tick(start + Duration::from_millis(1800)));
    }

    #[test]
    fn paging_moves_by_window_and_clamps() {
        let now = Instant::now();
        let mut view = filled(10);
        assert_eq!(view.offset(), 6);
        view.page(false, now);
        assert_eq!(view.offset(), 2);
        view.page(false, now);
        assert_eq!(view.offset(), 0);
        assert_eq!(view.hidden(), (0, 6));
        view.page(true, now);
        view.page(true, now);
        assert_eq!(view.offset(), 6);
    }

    #[test]
    fn scroll_that_cannot_move_keeps_following() {
        let now = Instant::now();
        let mut view = filled(4);
        view.scroll_by(-1, now);
        view.page(false, now);
        assert_eq!(view.offset(), 0);
        assert!(!view.is_manual_scroll());

        view.append(ChatMessage::assistant("reply"));
        assert_eq!(view.offset(), 1);
        assert_eq!(view.visible().last(), Some(&ChatMessage::assistant("reply")));

        view.scroll_by(1, now);
        assert!(!view.is_manual_scroll());
    }

    #[test]
    fn clear_resets_everything() {
        let mut view = filled(8);
        view.scroll_by(-2, Instant::now());
        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.offset(), 0);
        assert!(!view.is_manual_scroll());
    }
}
