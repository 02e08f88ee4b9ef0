#![allow(dead_code)]

use std::future;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use mockingbird::{ChatTurn, SessionError, Terminal};
use mockingbird_cli::runtime::{BackendFuture, InterviewBackend};

type InputHandler = Box<dyn FnMut(String) + Send>;
type ResizeHandler = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub struct TerminalTrace {
    pub writes: Vec<String>,
    pub start_calls: usize,
    pub stop_calls: usize,
    pub drain_calls: Vec<(u64, u64)>,
    pub on_input: Option<InputHandler>,
    pub on_resize: Option<ResizeHandler>,
}

pub struct SharedTerminal {
    state: Arc<Mutex<TerminalTrace>>,
    columns: u16,
    rows: u16,
}

impl SharedTerminal {
    pub fn new(columns: u16, rows: u16) -> (Self, Arc<Mutex<TerminalTrace>>) {
        let state = Arc::new(Mutex::new(TerminalTrace::default()));
        (
            Self {
                state: Arc::clone(&state),
                columns,
                rows,
            },
            state,
        )
    }
}

impl Terminal for SharedTerminal {
    fn start(
        &mut self,
        on_input: Box<dyn FnMut(String) + Send>,
        on_resize: Box<dyn FnMut() + Send>,
    ) -> std::io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.start_calls += 1;
        state.on_input = Some(on_input);
        state.on_resize = Some(on_resize);
        Ok(())
    }

    fn stop(&mut self) -> std::io::Result<()> {
        let mut state = lock_unpoisoned(&self.state);
        state.stop_calls += 1;
        Ok(())
    }

    fn drain_input(&mut self, max_ms: u64, idle_ms: u64) {
        let mut state = lock_unpoisoned(&self.state);
        state.drain_calls.push((max_ms, idle_ms));
    }

    fn write(&mut self, data: &str) {
        let mut state = lock_unpoisoned(&self.state);
        state.writes.push(data.to_string());
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn rows(&self) -> u16 {
        self.rows
    }
}

pub fn inject_input(state: &Arc<Mutex<TerminalTrace>>, data: &str) {
    let mut state = lock_unpoisoned(state);
    let Some(on_input) = state.on_input.as_mut() else {
        panic!("terminal input handler is not registered");
    };

    on_input(data.to_string());
}

pub fn inject_resize(state: &Arc<Mutex<TerminalTrace>>) {
    let mut state = lock_unpoisoned(state);
    let Some(on_resize) = state.on_resize.as_mut() else {
        panic!("terminal resize handler is not registered");
    };

    on_resize();
}

pub fn rendered_output(state: &Arc<Mutex<TerminalTrace>>) -> String {
    lock_unpoisoned(state).writes.join("")
}

/// Last full frame written, with escape sequences removed.
pub fn last_frame_text(state: &Arc<Mutex<TerminalTrace>>) -> String {
    let state = lock_unpoisoned(state);
    state
        .writes
        .iter()
        .rev()
        .find(|write| write.starts_with("\x1b[?2026h"))
        .map(|frame| strip_ansi(frame))
        .unwrap_or_default()
}

/// Polls until `predicate` holds or five seconds pass.
pub fn wait_until(mut predicate: impl FnMut() -> bool, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if predicate() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("timed out waiting for {what}");
}

pub fn wait_for_frame(state: &Arc<Mutex<TerminalTrace>>, needle: &str) {
    wait_until(|| last_frame_text(state).contains(needle), needle);
}

pub fn strip_ansi(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == 0x1b && index + 1 < bytes.len() && bytes[index + 1] == b'[' {
            index += 2;
            while index < bytes.len() {
                let byte = bytes[index];
                index += 1;
                if (b'@'..=b'~').contains(&byte) {
                    break;
                }
            }
            continue;
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(output).unwrap_or_default()
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Backend with canned answers that records what it was asked.
pub struct ScriptedBackend {
    pub chat_reply: Result<String, SessionError>,
    pub feedback_reply: Result<String, SessionError>,
    pub ready: Result<(), SessionError>,
    pub chats: Mutex<Vec<ChatTurn>>,
    pub histories: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn replying(chat: &str, feedback: &str) -> Self {
        Self {
            chat_reply: Ok(chat.to_string()),
            feedback_reply: Ok(feedback.to_string()),
            ready: Ok(()),
            chats: Mutex::new(Vec::new()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(error: SessionError) -> Self {
        Self {
            ready: Err(error),
            ..Self::replying("", "")
        }
    }
}

impl InterviewBackend for ScriptedBackend {
    fn ready(&self) -> Result<(), SessionError> {
        self.ready.clone()
    }

    fn chat(&self, turn: ChatTurn) -> BackendFuture {
        lock_unpoisoned(&self.chats).push(turn);
        Box::pin(future::ready(self.chat_reply.clone()))
    }

    fn feedback(&self, history: String) -> BackendFuture {
        lock_unpoisoned(&self.histories).push(history);
        Box::pin(future::ready(self.feedback_reply.clone()))
    }
}

/// One-shot HTTP server: answers a single request with `status` and a JSON `body`, then
/// hands back the raw request text.
pub struct OneShotServer {
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    pub fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).expect("write response");
            request
        });

        Self { base_url, handle }
    }

    pub fn request(self) -> String {
        self.handle.join().expect("server thread")
    }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).expect("read request");
        if read == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&data);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if data.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}
