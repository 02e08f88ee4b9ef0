mod support;

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use mockingbird::{SessionController, SessionOptions};
use mockingbird_cli::app;
use mockingbird_cli::questions::QuestionPicker;
use mockingbird_cli::runtime::RuntimeController;
use mockingbird_cli::tui::{SCREEN_ENTER, SCREEN_LEAVE};
use support::{
    inject_input, inject_resize, last_frame_text, lock_unpoisoned, rendered_output, wait_for_frame,
    wait_until, ScriptedBackend, SharedTerminal, TerminalTrace,
};

struct Running {
    state: Arc<Mutex<TerminalTrace>>,
    backend: Arc<ScriptedBackend>,
    handle: JoinHandle<std::io::Result<()>>,
}

fn launch(backend: ScriptedBackend) -> Running {
    let backend = Arc::new(backend);
    let (terminal, state) = SharedTerminal::new(100, 60);
    let (events, receiver) = mpsc::channel();
    let host = RuntimeController::new(backend.clone(), events.clone(), QuestionPicker::seeded(9))
        .expect("runtime builds");
    let controller = SessionController::new(SessionOptions::default(), Instant::now());

    let handle =
        thread::spawn(move || app::run(terminal, controller, host, events, receiver, "ada"));
    wait_until(|| lock_unpoisoned(&state).start_calls == 1, "terminal start");

    Running {
        state,
        backend,
        handle,
    }
}

impl Running {
    fn finish(self) -> Arc<Mutex<TerminalTrace>> {
        self.handle
            .join()
            .expect("loop thread")
            .expect("loop result");
        self.state
    }
}

#[test]
fn quitting_from_welcome_restores_the_terminal() {
    let running = launch(ScriptedBackend::replying("", ""));
    wait_for_frame(&running.state, "Hello, ada, Welcome to MockingBird!");

    inject_input(&running.state, "q");
    let state = running.finish();

    let trace = lock_unpoisoned(&state);
    assert_eq!(trace.stop_calls, 1);
    assert_eq!(trace.drain_calls.len(), 1);
    assert_eq!(trace.writes.first().map(String::as_str), Some(SCREEN_ENTER));
    assert_eq!(trace.writes.last().map(String::as_str), Some(SCREEN_LEAVE));
}

#[test]
fn full_interview_round_trip() {
    let running = launch(ScriptedBackend::replying(
        "Walk me through your approach.",
        "Clear communication. Consider edge cases.",
    ));
    let state = &running.state;
    wait_for_frame(state, "Welcome to MockingBird!");

    inject_input(state, "s");
    wait_for_frame(state, "Time: 45:00");
    assert!(last_frame_text(state).contains("Hello! I am MockingBird"));

    // Typed text and the submit key arriving in a single read.
    inject_input(state, "use a hash map\x1b[13;5u");
    wait_for_frame(state, "Walk me through your approach.");
    {
        let chats = lock_unpoisoned(&running.backend.chats);
        assert_eq!(chats.len(), 1);
        let last = chats[0].messages.last().expect("user message");
        assert_eq!(last.content, "use a hash map");
    }

    inject_input(state, "\x18");
    wait_for_frame(state, "Clear communication. Consider edge cases.");
    assert!(last_frame_text(state).contains("Interview Feedback"));
    {
        let histories = lock_unpoisoned(&running.backend.histories);
        assert_eq!(histories.len(), 1);
        assert!(histories[0].contains("use a hash map"));
    }

    inject_input(state, "\r");
    wait_for_frame(state, "Welcome to MockingBird!");
    inject_input(state, "q");

    let state = running.finish();
    assert!(rendered_output(&state).ends_with(SCREEN_LEAVE));
}

#[test]
fn resize_triggers_a_redraw() {
    let running = launch(ScriptedBackend::replying("", ""));
    wait_for_frame(&running.state, "Welcome to MockingBird!");
    let frames_before = frame_count(&running.state);

    inject_resize(&running.state);
    wait_until(
        || frame_count(&running.state) > frames_before,
        "redraw after resize",
    );

    inject_input(&running.state, "q");
    running.finish();
}

fn frame_count(state: &Arc<Mutex<TerminalTrace>>) -> usize {
    lock_unpoisoned(state)
        .writes
        .iter()
        .filter(|write| write.starts_with("\x1b[?2026h"))
        .count()
}
