//! Interview session: panes, focus, countdown and the controller that ties them together.

pub mod chat_view;
pub mod code_pane;
pub mod composer;
pub mod controller;
pub mod countdown;
mod editing;
pub mod focus;
pub mod question;
pub mod transcript;

pub use chat_view::ChatViewport;
pub use code_pane::CodePane;
pub use composer::ChatComposer;
pub use controller::{
    ChatContext, ChatTurn, InterviewHost, RequestId, SessionController, SessionEvent,
    SessionOptions, SessionPhase,
};
pub use countdown::CountdownTimer;
pub use focus::{FocusArea, FocusRouter};
pub use question::{Difficulty, Question};
pub use transcript::{ChatMessage, Role};
