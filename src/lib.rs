//! MockingBird session engine.
//!
//! A timed mock coding interview in the terminal: a code pane, a chat with an AI interviewer,
//! and a countdown that drives the session from idle through active to feedback.
//!
//! # Public API Overview
//! - [`SessionController`] owns every pane and consumes [`SessionEvent`]s on a single thread.
//! - [`InterviewHost`] is the seam to the runtime that performs network calls and rendering.
//! - Core pieces ([`TextBuffer`], the scroll helpers, [`FocusRouter`], [`CountdownTimer`]) are
//!   usable on their own.
//! - Raw terminal input is decoded with [`parse_input_events`] into [`InputEvent`]s.

pub mod config;

pub mod core;
pub mod platform;
pub mod session;

pub use crate::config::EnvConfig;
pub use crate::core::error::SessionError;
pub use crate::core::input::{key_ids_equal, matches_key, parse_key, KeyEventType};
pub use crate::core::input_event::{parse_input_events, InputEvent};
pub use crate::core::keybindings::{
    KeyBinding, KeybindingsConfig, KeybindingsManager, SessionAction,
};
pub use crate::core::scroll::{ensure_visible, follow_offset, scroll_by, visible_range, Viewport};
pub use crate::core::terminal::{Terminal, TerminalGuard};
pub use crate::core::text::{truncate_to_width, visible_width, wrap_text};
pub use crate::core::text_buffer::{Cursor, Direction, TextBuffer};
pub use crate::platform::process_terminal::ProcessTerminal;
pub use crate::session::{
    ChatComposer, ChatContext, ChatMessage, ChatTurn, ChatViewport, CodePane, CountdownTimer,
    Difficulty, FocusArea, FocusRouter, InterviewHost, Question, RequestId, Role,
    SessionController, SessionEvent, SessionOptions, SessionPhase,
};
