//! Frame rendering for every session phase.
//!
//! Rendering is a pure function of the controller state: [`render_frame`] returns styled lines
//! and [`compose_frame`] turns them into one full-screen write.

use std::time::{SystemTime, UNIX_EPOCH};

use mockingbird::{
    truncate_to_width, visible_width, wrap_text, ChatMessage, ChatViewport, FocusArea, Role,
    SessionAction, SessionController, SessionPhase, TextBuffer, Viewport,
};

/// Alternate screen, hidden cursor, bracketed paste and kitty key disambiguation.
pub const SCREEN_ENTER: &str = "\x1b[?1049h\x1b[?25l\x1b[?2004h\x1b[>1u";
pub const SCREEN_LEAVE: &str = "\x1b[<u\x1b[?2004l\x1b[?25h\x1b[?1049l";

const CODE_HINT: &str = "Tab: indent • Shift+Tab: unindent • Ctrl+Enter: submit";
const CODE_PLACEHOLDER: &str = "Press Ctrl+W to enter Navigation Mode";
const COMPOSER_PLACEHOLDER: &str =
    "Type a message... (Enter for new line, Ctrl+Enter or Enter on empty line to send)";
const EMPTY_CHAT: &str = "No messages yet. Start a conversation!";
const TYPING: &str = "Interviewer is typing...";

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

fn blue(text: &str) -> String {
    ansi_wrap(text, "\x1b[34m", "\x1b[39m")
}

fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

fn red(text: &str) -> String {
    ansi_wrap(text, "\x1b[31m", "\x1b[39m")
}

fn green(text: &str) -> String {
    ansi_wrap(text, "\x1b[32m", "\x1b[39m")
}

fn magenta(text: &str) -> String {
    ansi_wrap(text, "\x1b[35m", "\x1b[39m")
}

fn yellow_dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m\x1b[2m", "\x1b[22m\x1b[39m")
}

fn inverse(text: &str) -> String {
    ansi_wrap(text, "\x1b[7m", "\x1b[27m")
}

pub fn render_frame(
    controller: &SessionController,
    user: &str,
    width: usize,
    rows: usize,
) -> Vec<String> {
    match controller.phase() {
        SessionPhase::Idle | SessionPhase::Closed => render_welcome(controller, user, width),
        SessionPhase::Active => render_active(controller, width, rows),
        SessionPhase::EndedGenerating => render_generating(width),
        SessionPhase::EndedFeedback(feedback) => render_feedback(feedback, false, width),
        SessionPhase::EndedError(error) => render_feedback(error, true, width),
    }
}

/// Builds one synchronized full-screen update, keeping at most `rows` lines.
pub fn compose_frame(lines: &[String], width: usize, rows: usize) -> String {
    let mut out = String::from("\x1b[?2026h\x1b[H");
    for (index, line) in lines.iter().take(rows.max(1)).enumerate() {
        if index > 0 {
            out.push_str("\r\n");
        }
        out.push_str(&truncate_to_width(line, width, "", false));
        out.push_str("\x1b[0m\x1b[K");
    }
    out.push_str("\x1b[J\x1b[?2026l");
    out
}

fn render_header() -> String {
    format!("{} {}", bold("MockingBird"), dim("mock coding interviews"))
}

fn separator_line(width: usize) -> String {
    let max = width.max(10);
    dim(&"─".repeat(max))
}

/// `── label ───` rule; the focused pane's label is highlighted.
fn section_line(width: usize, label: &str, focused: bool) -> String {
    let label = format!(" {label} ");
    let label_width = visible_width(&label);
    if width <= 2 + label_width {
        return dim(&"─".repeat(width));
    }

    let styled = if focused { yellow(&label) } else { dim(&label) };
    format!(
        "{}{}{}",
        dim("──"),
        styled,
        dim(&"─".repeat(width - 2 - label_width))
    )
}

fn spinner_glyph() -> String {
    const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
    let index = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|since_epoch| since_epoch.subsec_millis())
        .unwrap_or(0);
    FRAMES[(index / 250 % 4) as usize].to_string()
}

fn append_wrapped_text(
    lines: &mut Vec<String>,
    width: usize,
    text: &str,
    first_prefix: &str,
    continuation_prefix: &str,
) {
    let prefix_width = visible_width(first_prefix).max(visible_width(continuation_prefix));
    let body_width = width.saturating_sub(prefix_width).max(1);
    for (index, line) in wrap_text(text, body_width).into_iter().enumerate() {
        let prefix = if index == 0 {
            first_prefix
        } else {
            continuation_prefix
        };
        lines.push(format!("{prefix}{line}"));
    }
}

fn render_welcome(controller: &SessionController, user: &str, width: usize) -> Vec<String> {
    let keys = controller.keybindings();
    let mut lines = vec![render_header(), separator_line(width), String::new()];
    lines.push(format!("Hello, {}, Welcome to MockingBird!", green(user)));
    lines.push(String::new());
    lines.push(format!(
        "Press '{}' to start an interview. Press '{}' to quit.",
        keys.hint(SessionAction::StartInterview),
        keys.hint(SessionAction::Quit)
    ));
    lines
}

fn render_generating(width: usize) -> Vec<String> {
    vec![
        render_header(),
        separator_line(width),
        String::new(),
        format!("{} {}", spinner_glyph(), yellow_dim("Generating interview feedback...")),
    ]
}

fn render_feedback(text: &str, is_error: bool, width: usize) -> Vec<String> {
    let mut lines = vec![
        bold(&blue("Interview Feedback")),
        format!(
            "Press {} or {} to return to start",
            green("'q'"),
            green("'Enter'")
        ),
        separator_line(width),
    ];
    for line in wrap_text(text, width.max(1)) {
        lines.push(if is_error { red(&line) } else { line });
    }
    lines
}

fn render_active(controller: &SessionController, width: usize, rows: usize) -> Vec<String> {
    let focus = controller.focus();
    let mut lines = Vec::new();

    lines.push(section_line(width, "Question", false));
    if let Some(question) = controller.question() {
        append_wrapped_text(&mut lines, width, &question.description, "  ", "  ");
        lines.push(cyan(&format!("  Difficulty: {}", question.difficulty)));
    }

    let code_active = focus.is_active(FocusArea::Code);
    lines.push(section_line(width, "Code", code_active));
    let code = controller.code();
    lines.extend(code_lines(code.buffer(), code.viewport(), code_active, width));
    lines.push(dim(CODE_HINT));

    let chat_active = focus.is_active(FocusArea::Scroll);
    let chat_header = section_line(width, "Chat", chat_active);
    let mut chat = chat_lines(
        controller.chat(),
        chat_active,
        controller.is_awaiting_reply(),
        width,
    );

    let composer_active = focus.is_active(FocusArea::Chat);
    let mut tail = vec![section_line(width, "Message", composer_active)];
    let composer = controller.composer();
    tail.extend(composer_lines(
        composer.buffer(),
        composer.viewport(),
        composer_active,
        width,
    ));
    if let Some(notice) = controller.notice() {
        append_wrapped_text(&mut tail, width, notice, "", "");
        if let Some(last) = tail.last_mut() {
            let styled = yellow(last);
            *last = styled;
        }
    }
    tail.push(separator_line(width));
    tail.push(footer_line(controller));

    // Older chat lines give way first when the terminal is short.
    let fixed = lines.len() + 1 + tail.len();
    let budget = rows.saturating_sub(fixed).max(1);
    if chat.len() > budget {
        chat.drain(..chat.len() - budget);
    }

    lines.push(chat_header);
    lines.extend(chat);
    lines.extend(tail);
    lines
        .into_iter()
        .map(|line| truncate_to_width(&line, width, "…", false))
        .collect()
}

fn footer_line(controller: &SessionController) -> String {
    let timer = controller.timer();
    let clock = format!("Time: {}", timer.display());
    let clock = if timer.remaining_secs() <= 60 {
        red(&clock)
    } else {
        bold(&clock)
    };

    let focus = controller.focus();
    let nav = if focus.navigation_mode() {
        yellow(&format!("Nav: {} | Press Ctrl+W to exit", focus.focus()))
    } else {
        dim(&format!(
            "{CODE_PLACEHOLDER} • {}: end interview",
            controller.keybindings().hint(SessionAction::EndInterview)
        ))
    };
    format!("{clock}  {nav}")
}

fn buffer_line(line: &str, cursor_col: Option<usize>, width: usize) -> String {
    let Some(col) = cursor_col else {
        return truncate_to_width(line, width, "…", false);
    };

    // Keep the cursor on screen for lines wider than the pane.
    let skip = (col + 1).saturating_sub(width);
    let before: String = line.chars().skip(skip).take(col - skip).collect();
    let under = line.chars().nth(col).map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = line.chars().skip(col + 1).collect();
    truncate_to_width(
        &format!("{before}{}{after}", inverse(&under)),
        width,
        "",
        false,
    )
}

fn buffer_lines(
    buffer: &TextBuffer,
    viewport: &Viewport,
    active: bool,
    width: usize,
) -> Vec<String> {
    let cursor = buffer.cursor();
    viewport
        .range(buffer.line_count())
        .map(|row| {
            let cursor_col = (active && row == cursor.row).then_some(cursor.col);
            buffer_line(&buffer.lines()[row], cursor_col, width)
        })
        .collect()
}

pub(crate) fn code_lines(
    buffer: &TextBuffer,
    viewport: &Viewport,
    active: bool,
    width: usize,
) -> Vec<String> {
    let (above, below) = viewport.hidden(buffer.line_count());
    let mut lines = Vec::new();
    if above > 0 {
        lines.push(dim(&format!("↑ Scroll up ({above} lines above)")));
    }
    if buffer.is_blank() && !active {
        lines.push(dim(CODE_PLACEHOLDER));
    } else {
        lines.extend(buffer_lines(buffer, viewport, active, width));
    }
    if below > 0 {
        lines.push(dim(&format!("↓ Scroll down ({below} lines below)")));
    }
    lines
}

pub(crate) fn composer_lines(
    buffer: &TextBuffer,
    viewport: &Viewport,
    active: bool,
    width: usize,
) -> Vec<String> {
    let prompt = green("> ");
    let body_width = width.saturating_sub(2).max(1);
    if buffer.is_blank() && !active {
        return vec![format!("{prompt}{}", dim(COMPOSER_PLACEHOLDER))];
    }
    buffer_lines(buffer, viewport, active, body_width)
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{prompt}{line}")
            } else {
                format!("  {line}")
            }
        })
        .collect()
}

fn message_role_prefix(message: &ChatMessage) -> String {
    match message.role {
        Role::User => bold(&cyan("You:")),
        Role::Assistant => bold(&magenta("AI:")),
    }
}

pub(crate) fn chat_lines(
    chat: &ChatViewport,
    scroll_focused: bool,
    awaiting_reply: bool,
    width: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    if chat.is_empty() {
        lines.push(dim(EMPTY_CHAT));
    }

    for message in chat.visible() {
        lines.push(message_role_prefix(message));
        append_wrapped_text(&mut lines, width, &message.content, "  ", "  ");
    }

    if chat.is_scrollable() {
        let (above, below) = chat.hidden();
        let mut parts = Vec::new();
        if above > 0 {
            parts.push(format!("↑ Scroll up ({above} messages above)"));
        }
        if below > 0 {
            parts.push(format!("↓ Scroll down ({below} messages below)"));
        }
        let mode = if scroll_focused { "[SCROLL MODE] " } else { "" };
        let indicator = format!("{mode}{}", parts.join(" | "));
        lines.push(if scroll_focused {
            yellow(&indicator)
        } else {
            dim(&indicator)
        });
    }

    if awaiting_reply {
        lines.push(format!("{} {}", spinner_glyph(), yellow_dim(TYPING)));
    }
    lines
}
