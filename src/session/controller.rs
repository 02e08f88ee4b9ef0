//! Session controller: owns every pane and drives the interview phases.
//!
//! All state changes happen in [`SessionController::handle_event`] on the owner thread. Network
//! calls are started through [`InterviewHost`] and come back later as
//! [`SessionEvent::ChatResolved`] / [`SessionEvent::FeedbackResolved`], tagged with the
//! [`RequestId`] the host handed out. Results for ids the controller no longer tracks are dropped.

use std::time::Instant;

use tracing::{debug, warn};

use crate::core::error::SessionError;
use crate::core::input_event::InputEvent;
use crate::core::keybindings::{KeybindingsManager, SessionAction};
use crate::session::chat_view::{ChatViewport, CHAT_WINDOW};
use crate::session::code_pane::{CodePane, CODE_PANE_HEIGHT};
use crate::session::composer::{ChatComposer, ComposerOutcome, COMPOSER_HEIGHT};
use crate::session::countdown::{format_clock, CountdownTimer, DEFAULT_INTERVIEW_SECONDS};
use crate::session::focus::{FocusArea, FocusRouter, Routed};
use crate::session::question::Question;
use crate::session::transcript::{chat_failure_message, history_string, ChatMessage, GREETING};

pub type RequestId = u64;

pub const AWAITING_REPLY_NOTICE: &str =
    "The interviewer is still replying. Your message is kept in the input box.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Active,
    EndedGenerating,
    EndedFeedback(String),
    EndedError(String),
    Closed,
}

impl SessionPhase {
    pub fn is_ended(&self) -> bool {
        matches!(
            self,
            Self::EndedGenerating | Self::EndedFeedback(_) | Self::EndedError(_)
        )
    }
}

/// Context attached to every chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub submitted_code: String,
    pub question: String,
    /// Elapsed interview time as `MM:SS`.
    pub interview_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub messages: Vec<ChatMessage>,
    pub context: ChatContext,
}

/// Side effects the controller needs from its runtime.
pub trait InterviewHost {
    /// Begin a chat call off the owner thread.
    fn start_chat(&mut self, turn: ChatTurn) -> Result<RequestId, SessionError>;
    /// Begin a feedback call for the flattened transcript.
    fn start_feedback(&mut self, history: String) -> Result<RequestId, SessionError>;
    /// Question for the interview that is about to start.
    fn pick_question(&mut self) -> Question;
    fn request_render(&mut self);
    fn request_stop(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Input(InputEvent),
    Tick(Instant),
    ChatResolved {
        request_id: RequestId,
        result: Result<String, SessionError>,
    },
    FeedbackResolved {
        request_id: RequestId,
        result: Result<String, SessionError>,
    },
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub interview_seconds: u64,
    pub code_height: usize,
    pub composer_height: usize,
    pub chat_window: usize,
    pub keybindings: KeybindingsManager,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            interview_seconds: DEFAULT_INTERVIEW_SECONDS,
            code_height: CODE_PANE_HEIGHT,
            composer_height: COMPOSER_HEIGHT,
            chat_window: CHAT_WINDOW,
            keybindings: KeybindingsManager::default(),
        }
    }
}

pub fn feedback_failure_message(detail: &str) -> String {
    format!("Feedback could not be generated right now. (Error: {detail})")
}

#[derive(Debug)]
pub struct SessionController {
    phase: SessionPhase,
    keybindings: KeybindingsManager,
    focus: FocusRouter,
    code: CodePane,
    composer: ChatComposer,
    chat: ChatViewport,
    timer: CountdownTimer,
    question: Option<Question>,
    pending_chat: Option<RequestId>,
    pending_feedback: Option<RequestId>,
    notice: Option<String>,
    clock: Instant,
}

impl SessionController {
    pub fn new(options: SessionOptions, now: Instant) -> Self {
        Self {
            phase: SessionPhase::Idle,
            keybindings: options.keybindings,
            focus: FocusRouter::new(),
            code: CodePane::new(options.code_height),
            composer: ChatComposer::new(options.composer_height),
            chat: ChatViewport::new(options.chat_window),
            timer: CountdownTimer::new(options.interview_seconds),
            question: None,
            pending_chat: None,
            pending_feedback: None,
            notice: None,
            clock: now,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn should_exit(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn keybindings(&self) -> &KeybindingsManager {
        &self.keybindings
    }

    pub fn focus(&self) -> &FocusRouter {
        &self.focus
    }

    pub fn code(&self) -> &CodePane {
        &self.code
    }

    pub fn composer(&self) -> &ChatComposer {
        &self.composer
    }

    pub fn chat(&self) -> &ChatViewport {
        &self.chat
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True while a chat reply is outstanding during the active phase.
    pub fn is_awaiting_reply(&self) -> bool {
        self.phase == SessionPhase::Active && self.pending_chat.is_some()
    }

    pub fn handle_event(&mut self, event: SessionEvent, host: &mut dyn InterviewHost) {
        match event {
            SessionEvent::Input(input) => self.on_input(input, host),
            SessionEvent::Tick(now) => self.on_tick(now, host),
            SessionEvent::ChatResolved { request_id, result } => {
                self.on_chat_resolved(request_id, result, host)
            }
            SessionEvent::FeedbackResolved { request_id, result } => {
                self.on_feedback_resolved(request_id, result, host)
            }
        }
    }

    pub fn on_input(&mut self, input: InputEvent, host: &mut dyn InterviewHost) {
        if input.is_release() {
            return;
        }
        if let InputEvent::Resize { .. } = input {
            host.request_render();
            return;
        }

        match self.phase {
            SessionPhase::Idle => self.on_idle_input(&input, host),
            SessionPhase::Active => self.on_active_input(input, host),
            SessionPhase::EndedFeedback(_) | SessionPhase::EndedError(_) => {
                if self.is_action(&input, SessionAction::CloseFeedback) {
                    self.on_close(host);
                }
            }
            SessionPhase::EndedGenerating | SessionPhase::Closed => {}
        }
    }

    pub fn on_tick(&mut self, now: Instant, host: &mut dyn InterviewHost) {
        self.clock = now;
        let mut dirty = self.chat.on_tick(now);

        if self.phase == SessionPhase::Active {
            let before = self.timer.remaining_secs();
            if self.timer.poll(now).is_some() {
                debug!("interview timer completed");
                self.end_interview(host);
                return;
            }
            dirty |= self.timer.remaining_secs() != before;
        }

        if dirty {
            host.request_render();
        }
    }

    pub fn on_chat_resolved(
        &mut self,
        request_id: RequestId,
        result: Result<String, SessionError>,
        host: &mut dyn InterviewHost,
    ) {
        if self.pending_chat != Some(request_id) {
            debug!(request_id, "dropping stale chat result");
            return;
        }
        self.pending_chat = None;
        self.notice = None;

        let message = match result {
            Ok(reply) => ChatMessage::assistant(reply),
            Err(error) => {
                warn!(request_id, %error, "chat request failed");
                ChatMessage::assistant(chat_failure_message(error.detail()))
            }
        };
        // A reply that lands after the interview ended is kept but never reopens it.
        self.chat.append(message);
        host.request_render();
    }

    pub fn on_feedback_resolved(
        &mut self,
        request_id: RequestId,
        result: Result<String, SessionError>,
        host: &mut dyn InterviewHost,
    ) {
        if self.pending_feedback != Some(request_id) || self.phase != SessionPhase::EndedGenerating
        {
            debug!(request_id, "dropping stale feedback result");
            return;
        }
        self.pending_feedback = None;

        self.phase = match result {
            Ok(feedback) => {
                debug!(request_id, "feedback received");
                SessionPhase::EndedFeedback(feedback)
            }
            Err(error) => {
                warn!(request_id, %error, "feedback request failed");
                SessionPhase::EndedError(feedback_failure_message(error.detail()))
            }
        };
        host.request_render();
    }

    fn on_idle_input(&mut self, input: &InputEvent, host: &mut dyn InterviewHost) {
        if self.is_action(input, SessionAction::StartInterview) {
            self.on_start(host);
        } else if self.is_action(input, SessionAction::Quit) {
            debug!("session closed from idle");
            self.phase = SessionPhase::Closed;
            host.request_stop();
            host.request_render();
        }
    }

    fn on_start(&mut self, host: &mut dyn InterviewHost) {
        self.reset_session();
        let question = host.pick_question();
        debug!(question = %question.id, "interview started");
        self.question = Some(question);
        self.chat.append(ChatMessage::assistant(GREETING));
        self.timer.start(self.clock);
        self.phase = SessionPhase::Active;
        host.request_render();
    }

    fn on_active_input(&mut self, input: InputEvent, host: &mut dyn InterviewHost) {
        if self.is_action(&input, SessionAction::EndInterview) {
            debug!("interview ended early");
            self.timer.cancel();
            self.end_interview(host);
            return;
        }

        let area = match self.focus.route(input.key_id(), &self.keybindings) {
            Routed::NavigationToggled(_) | Routed::FocusMoved(_) => {
                host.request_render();
                return;
            }
            Routed::Ignored => return,
            Routed::Delegate(area) => area,
        };

        match area {
            FocusArea::Code => self.on_code_input(input),
            FocusArea::Chat => self.on_composer_input(input, host),
            FocusArea::Scroll => self.on_scroll_input(&input),
        }
        host.request_render();
    }

    fn on_code_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Text { text, .. } => {
                self.code.type_text(&text);
            }
            InputEvent::Paste { text, .. } => {
                self.code.paste(&text);
            }
            InputEvent::Key { key_id, .. } => {
                self.code.handle_key(&key_id, &self.keybindings);
            }
            InputEvent::Resize { .. } | InputEvent::UnknownRaw { .. } => {}
        }
    }

    fn on_composer_input(&mut self, input: InputEvent, host: &mut dyn InterviewHost) {
        let outcome = match input {
            InputEvent::Text { text, .. } => self.composer.type_text(&text),
            InputEvent::Paste { text, .. } => self.composer.paste(&text),
            InputEvent::Key { key_id, .. } => self.composer.handle_key(&key_id, &self.keybindings),
            InputEvent::Resize { .. } | InputEvent::UnknownRaw { .. } => ComposerOutcome::Ignored,
        };
        if let ComposerOutcome::Submit(text) = outcome {
            self.submit_chat(text, host);
        }
    }

    fn on_scroll_input(&mut self, input: &InputEvent) {
        let Some(key_id) = input.key_id() else {
            return;
        };
        let now = self.clock;
        if self.keybindings.matches(key_id, SessionAction::ScrollUp) {
            self.chat.scroll_by(-1, now);
        } else if self.keybindings.matches(key_id, SessionAction::ScrollDown) {
            self.chat.scroll_by(1, now);
        } else if self.keybindings.matches(key_id, SessionAction::PageUp) {
            self.chat.page(false, now);
        } else if self.keybindings.matches(key_id, SessionAction::PageDown) {
            self.chat.page(true, now);
        }
    }

    fn submit_chat(&mut self, text: String, host: &mut dyn InterviewHost) {
        if self.pending_chat.is_some() {
            self.composer.restore(&text);
            self.notice = Some(AWAITING_REPLY_NOTICE.to_string());
            return;
        }

        self.notice = None;
        self.chat.append(ChatMessage::user(text));
        let turn = ChatTurn {
            messages: self.chat.messages().to_vec(),
            context: self.chat_context(),
        };

        match host.start_chat(turn) {
            Ok(request_id) => {
                debug!(request_id, "chat request started");
                self.pending_chat = Some(request_id);
            }
            Err(error) => {
                warn!(%error, "chat request could not start");
                self.chat
                    .append(ChatMessage::assistant(chat_failure_message(error.detail())));
            }
        }
    }

    fn chat_context(&self) -> ChatContext {
        ChatContext {
            submitted_code: self.code.context_code(),
            question: self
                .question
                .as_ref()
                .map(|question| question.description.clone())
                .unwrap_or_default(),
            interview_time: format_clock(self.timer.elapsed_secs()),
        }
    }

    fn end_interview(&mut self, host: &mut dyn InterviewHost) {
        self.phase = SessionPhase::EndedGenerating;
        self.notice = None;
        let history = history_string(self.chat.messages());

        match host.start_feedback(history) {
            Ok(request_id) => {
                debug!(request_id, "feedback request started");
                self.pending_feedback = Some(request_id);
            }
            Err(error) => {
                warn!(%error, "feedback request could not start");
                self.phase = SessionPhase::EndedError(feedback_failure_message(error.detail()));
            }
        }
        host.request_render();
    }

    fn on_close(&mut self, host: &mut dyn InterviewHost) {
        debug!("feedback closed");
        self.reset_session();
        self.phase = SessionPhase::Idle;
        host.request_render();
    }

    fn reset_session(&mut self) {
        self.chat.clear();
        self.code.reset();
        self.composer.reset();
        self.focus.reset();
        self.timer.reset();
        self.question = None;
        self.pending_chat = None;
        self.pending_feedback = None;
        self.notice = None;
    }

    fn is_action(&self, input: &InputEvent, action: SessionAction) -> bool {
        input
            .key_id()
            .is_some_and(|key_id| self.keybindings.matches(key_id, action))
    }
}
