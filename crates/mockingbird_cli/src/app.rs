//! The event loop: one thread owns the controller and the terminal.
//!
//! Terminal input, resize notifications and interviewer results all arrive on a single
//! `mpsc` channel. The receive timeout doubles as the tick source, and a tick is also
//! forced whenever a steady stream of input would otherwise starve the countdown.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mockingbird::{parse_input_events, SessionController, SessionEvent, Terminal, TerminalGuard};
use tracing::{debug, info};

use crate::runtime::RuntimeController;
use crate::tui::{compose_frame, render_frame, SCREEN_ENTER, SCREEN_LEAVE};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const USER_VARS: [&str; 3] = ["USER", "LOGNAME", "USERNAME"];

/// Login name for the welcome screen.
pub fn username() -> String {
    USER_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// Runs the session until the controller asks to exit, then restores the terminal.
///
/// `events` must be the sending half of `receiver`; it is cloned into the terminal callbacks.
pub fn run<T: Terminal>(
    terminal: T,
    mut controller: SessionController,
    mut host: RuntimeController,
    events: Sender<SessionEvent>,
    receiver: Receiver<SessionEvent>,
    user: &str,
) -> io::Result<()> {
    let resized = Arc::new(AtomicBool::new(true));
    let mut guard = TerminalGuard::new(terminal);

    let input_events = events.clone();
    let resize_flag = Arc::clone(&resized);
    guard.terminal_mut().start(
        Box::new(move |data: String| {
            for event in parse_input_events(&data, true) {
                let _ = input_events.send(SessionEvent::Input(event));
            }
        }),
        Box::new(move || {
            resize_flag.store(true, Ordering::SeqCst);
            // Wakes the loop; the size is re-read when the frame is drawn.
            let _ = events.send(SessionEvent::Tick(Instant::now()));
        }),
    )?;
    guard.terminal_mut().write(SCREEN_ENTER);
    info!("session loop started");

    let mut last_tick = Instant::now();
    loop {
        if resized.swap(false, Ordering::SeqCst) || host.take_render_request() {
            draw(guard.terminal_mut(), &controller, user);
        }
        if controller.should_exit() || host.stop_requested() {
            break;
        }

        let event = match receiver.recv_timeout(TICK_INTERVAL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => SessionEvent::Tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                debug!("event channel closed");
                break;
            }
        };
        if let SessionEvent::Tick(now) = &event {
            last_tick = *now;
        }
        controller.handle_event(event, &mut host);

        let now = Instant::now();
        if now.duration_since(last_tick) >= TICK_INTERVAL {
            last_tick = now;
            controller.handle_event(SessionEvent::Tick(now), &mut host);
        }
    }

    info!("session loop finished");
    guard.terminal_mut().write(SCREEN_LEAVE);
    guard.finish()
}

fn draw<T: Terminal>(terminal: &mut T, controller: &SessionController, user: &str) {
    let width = usize::from(terminal.columns());
    let rows = usize::from(terminal.rows());
    let lines = render_frame(controller, user, width, rows);
    terminal.write(&compose_frame(&lines, width, rows));
}
