//! Key parsing: raw terminal byte sequences to normalized key ids.
//!
//! Key ids are lowercase modifier prefixes joined with `+` in the order `shift`, `ctrl`, `alt`,
//! followed by the key name (`"up"`, `"pageUp"`, `"shift+tab"`, `"ctrl+enter"`, `"a"`).

const MOD_SHIFT: u8 = 1;
const MOD_ALT: u8 = 2;
const MOD_CTRL: u8 = 4;
const LOCK_MASK: u8 = 64 + 128;

const CODEPOINT_ESCAPE: i32 = 27;
const CODEPOINT_TAB: i32 = 9;
const CODEPOINT_ENTER: i32 = 13;
const CODEPOINT_SPACE: i32 = 32;
const CODEPOINT_BACKSPACE: i32 = 127;
const CODEPOINT_KP_ENTER: i32 = 57414;

const ARROW_UP: i32 = -1;
const ARROW_DOWN: i32 = -2;
const ARROW_RIGHT: i32 = -3;
const ARROW_LEFT: i32 = -4;

const KEY_DELETE: i32 = -10;
const KEY_INSERT: i32 = -11;
const KEY_PAGE_UP: i32 = -12;
const KEY_PAGE_DOWN: i32 = -13;
const KEY_HOME: i32 = -14;
const KEY_END: i32 = -15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy)]
struct ModifiedKey {
    codepoint: i32,
    base_layout_key: Option<i32>,
    modifier: u8,
    event_type: KeyEventType,
}

/// Event type carried by a kitty sequence; legacy sequences are always presses.
pub fn parse_key_event_type(data: &str) -> KeyEventType {
    if data.contains("\x1b[200~") {
        return KeyEventType::Press;
    }
    parse_modified_key(data)
        .map(|key| key.event_type)
        .unwrap_or(KeyEventType::Press)
}

/// Decodes printable text. Returns `None` for anything that should be treated as a key.
pub fn parse_text(data: &str) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    if let Some(key) = parse_modified_key(data) {
        let modifier = key.modifier & !LOCK_MASK;
        if modifier & !MOD_SHIFT != 0 || key.codepoint < CODEPOINT_SPACE {
            return None;
        }
        if key.codepoint == CODEPOINT_BACKSPACE || key.codepoint == CODEPOINT_KP_ENTER {
            return None;
        }
        let ch = char::from_u32(key.codepoint as u32)?;
        let ch = if modifier & MOD_SHIFT != 0 {
            ch.to_uppercase().next().unwrap_or(ch)
        } else {
            ch
        };
        return Some(ch.to_string());
    }

    if data.starts_with('\x1b') {
        return None;
    }
    if data.chars().any(|ch| ch.is_control()) {
        return None;
    }
    Some(data.to_string())
}

/// Normalizes a raw sequence to a key id, or `None` when it is not recognised.
pub fn parse_key(data: &str, kitty_active: bool) -> Option<String> {
    if let Some(key) = parse_modified_key(data) {
        return modified_key_id(key);
    }

    if let Some(key) = parse_modify_other_keys(data) {
        return modified_key_id(key);
    }

    if kitty_active && (data == "\x1b\r" || data == "\n") {
        return Some("shift+enter".to_string());
    }

    if let Some(key_id) = legacy_sequence_key_id(data) {
        return Some(key_id.to_string());
    }

    match data {
        "\x1b" => return Some("escape".to_string()),
        "\t" => return Some("tab".to_string()),
        "\r" | "\x1bOM" => return Some("enter".to_string()),
        "\n" if !kitty_active => return Some("enter".to_string()),
        "\x00" => return Some("ctrl+space".to_string()),
        " " => return Some("space".to_string()),
        "\x7f" | "\x08" => return Some("backspace".to_string()),
        "\x1b[Z" => return Some("shift+tab".to_string()),
        "\x1b\x7f" | "\x1b\x08" => return Some("alt+backspace".to_string()),
        "\x1b\r" => return Some("alt+enter".to_string()),
        _ => {}
    }

    let bytes = data.as_bytes();
    if !kitty_active && bytes.len() == 2 && bytes[0] == 0x1b {
        let code = bytes[1];
        if (1..=26).contains(&code) {
            return Some(format!("ctrl+alt+{}", (code + 96) as char));
        }
        if code.is_ascii_lowercase() {
            return Some(format!("alt+{}", code as char));
        }
    }

    if bytes.len() == 1 {
        let code = bytes[0];
        if (1..=26).contains(&code) {
            return Some(format!("ctrl+{}", (code + 96) as char));
        }
        if (32..=126).contains(&code) {
            return Some(data.to_string());
        }
    }

    None
}

/// True when the raw sequence encodes `key_id`.
pub fn matches_key(data: &str, key_id: &str, kitty_active: bool) -> bool {
    parse_key(data, kitty_active)
        .map(|parsed| key_ids_equal(&parsed, key_id))
        .unwrap_or(false)
}

/// Compares key ids ignoring case and modifier order.
pub fn key_ids_equal(left: &str, right: &str) -> bool {
    fn split(id: &str) -> (Vec<String>, String) {
        let lowered = id.to_ascii_lowercase();
        let mut parts: Vec<String> = lowered.split('+').map(str::to_string).collect();
        // "ctrl++" names the plus key.
        let key = if lowered.ends_with("++") {
            parts.truncate(parts.len().saturating_sub(2));
            "+".to_string()
        } else {
            parts.pop().unwrap_or_default()
        };
        parts.sort();
        (parts, key)
    }

    split(left) == split(right)
}

fn modified_key_id(key: ModifiedKey) -> Option<String> {
    let modifier = key.modifier & !LOCK_MASK;
    let codepoint = key.codepoint;
    let is_known = is_latin_letter(codepoint) || is_symbol_codepoint(codepoint);
    let effective = if is_known {
        codepoint
    } else {
        key.base_layout_key.unwrap_or(codepoint)
    };

    let name = match effective {
        CODEPOINT_ESCAPE => "escape".to_string(),
        CODEPOINT_TAB => "tab".to_string(),
        CODEPOINT_ENTER | CODEPOINT_KP_ENTER => "enter".to_string(),
        CODEPOINT_SPACE => "space".to_string(),
        CODEPOINT_BACKSPACE => "backspace".to_string(),
        KEY_DELETE => "delete".to_string(),
        KEY_INSERT => "insert".to_string(),
        KEY_HOME => "home".to_string(),
        KEY_END => "end".to_string(),
        KEY_PAGE_UP => "pageUp".to_string(),
        KEY_PAGE_DOWN => "pageDown".to_string(),
        ARROW_UP => "up".to_string(),
        ARROW_DOWN => "down".to_string(),
        ARROW_LEFT => "left".to_string(),
        ARROW_RIGHT => "right".to_string(),
        cp if is_latin_letter(cp) || is_symbol_codepoint(cp) => (cp as u8 as char).to_string(),
        _ => return None,
    };

    let mut id = String::new();
    if modifier & MOD_SHIFT != 0 {
        id.push_str("shift+");
    }
    if modifier & MOD_CTRL != 0 {
        id.push_str("ctrl+");
    }
    if modifier & MOD_ALT != 0 {
        id.push_str("alt+");
    }
    id.push_str(&name);
    Some(id)
}

fn is_latin_letter(codepoint: i32) -> bool {
    (97..=122).contains(&codepoint)
}

fn is_symbol_codepoint(codepoint: i32) -> bool {
    (0..=127).contains(&codepoint) && is_symbol_key(codepoint as u8 as char)
}

fn is_symbol_key(ch: char) -> bool {
    matches!(
        ch,
        '`' | '-' | '=' | '[' | ']' | '\\' | ';' | '\'' | ',' | '.' | '/' | '!' | '@' | '#'
            | '$' | '%' | '^' | '&' | '*' | '(' | ')' | '_' | '+' | '|' | '~' | '{' | '}'
            | ':' | '<' | '>' | '?'
    )
}

fn parse_event_type(event_type: Option<&str>) -> KeyEventType {
    match event_type.and_then(|value| value.parse::<u8>().ok()) {
        Some(2) => KeyEventType::Repeat,
        Some(3) => KeyEventType::Release,
        _ => KeyEventType::Press,
    }
}

fn parse_modifier_field(field: Option<&str>) -> (u8, KeyEventType) {
    let Some(field) = field else {
        return (0, KeyEventType::Press);
    };
    let (mod_value, event_value) = match field.split_once(':') {
        Some((left, right)) => (left, Some(right)),
        None => (field, None),
    };
    let mod_value = mod_value.parse::<u8>().unwrap_or(1);
    (mod_value.saturating_sub(1), parse_event_type(event_value))
}

/// Kitty CSI-u, `CSI n ~` and `CSI 1;m X` forms.
fn parse_modified_key(data: &str) -> Option<ModifiedKey> {
    let stripped = data.strip_prefix("\x1b[")?;

    if let Some(body) = stripped.strip_suffix('u') {
        let (code_part, mod_part) = match body.split_once(';') {
            Some((left, right)) => (left, Some(right)),
            None => (body, None),
        };

        let mut code_iter = code_part.split(':');
        let codepoint = code_iter.next()?.parse::<i32>().ok()?;
        let _shifted = code_iter.next();
        let base_layout_key = code_iter.next().and_then(|value| value.parse().ok());
        if code_iter.next().is_some() {
            return None;
        }

        let (modifier, event_type) = parse_modifier_field(mod_part);
        return Some(ModifiedKey {
            codepoint,
            base_layout_key,
            modifier,
            event_type,
        });
    }

    if let Some(body) = stripped.strip_suffix('~') {
        let mut parts = body.split(';');
        let key_num = parts.next()?.parse::<i32>().ok()?;
        let mod_part = parts.next();
        if parts.next().is_some() {
            return None;
        }

        let codepoint = match key_num {
            2 => KEY_INSERT,
            3 => KEY_DELETE,
            5 => KEY_PAGE_UP,
            6 => KEY_PAGE_DOWN,
            1 | 7 => KEY_HOME,
            4 | 8 => KEY_END,
            _ => return None,
        };

        let (modifier, event_type) = parse_modifier_field(mod_part);
        return Some(ModifiedKey {
            codepoint,
            base_layout_key: None,
            modifier,
            event_type,
        });
    }

    let stripped = stripped.strip_prefix("1;")?;
    if stripped.len() < 2 {
        return None;
    }
    let (mod_part, tail) = stripped.split_at(stripped.len() - 1);
    let codepoint = match tail {
        "A" => ARROW_UP,
        "B" => ARROW_DOWN,
        "C" => ARROW_RIGHT,
        "D" => ARROW_LEFT,
        "H" => KEY_HOME,
        "F" => KEY_END,
        _ => return None,
    };
    let (modifier, event_type) = parse_modifier_field(Some(mod_part));
    Some(ModifiedKey {
        codepoint,
        base_layout_key: None,
        modifier,
        event_type,
    })
}

/// xterm `modifyOtherKeys` form: `CSI 27 ; m ; code ~`.
fn parse_modify_other_keys(data: &str) -> Option<ModifiedKey> {
    let body = data.strip_prefix("\x1b[27;")?.strip_suffix('~')?;
    let mut parts = body.split(';');
    let mod_value = parts.next()?.parse::<u8>().ok()?;
    let codepoint = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ModifiedKey {
        codepoint,
        base_layout_key: None,
        modifier: mod_value.saturating_sub(1),
        event_type: KeyEventType::Press,
    })
}

fn legacy_sequence_key_id(data: &str) -> Option<&'static str> {
    match data {
        "\x1b[A" | "\x1bOA" => Some("up"),
        "\x1b[B" | "\x1bOB" => Some("down"),
        "\x1b[C" | "\x1bOC" => Some("right"),
        "\x1b[D" | "\x1bOD" => Some("left"),
        "\x1b[H" | "\x1bOH" => Some("home"),
        "\x1b[F" | "\x1bOF" => Some("end"),
        "\x1b[[5~" => Some("pageUp"),
        "\x1b[[6~" => Some("pageDown"),
        "\x1b[a" => Some("shift+up"),
        "\x1b[b" => Some("shift+down"),
        "\x1b[c" => Some("shift+right"),
        "\x1b[d" => Some("shift+left"),
        "\x1bOa" => Some("ctrl+up"),
        "\x1bOb" => Some("ctrl+down"),
        "\x1bOc" => Some("ctrl+right"),
        "\x1bOd" => Some("ctrl+left"),
        "\x1b[5$" => Some("shift+pageUp"),
        "\x1b[6$" => Some("shift+pageDown"),
        "\x1b[5^" => Some("ctrl+pageUp"),
        "\x1b[6^" => Some("ctrl+pageDown"),
        "\x1b[3$" => Some("shift+delete"),
        "\x1b[3^" => Some("ctrl+delete"),
        "\x1bb" => Some("alt+left"),
        "\x1bf" => Some("alt+right"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        key_ids_equal, matches_key, parse_key, parse_key_event_type, parse_text, KeyEventType,
    };

    #[test]
    fn legacy_navigation_keys() {
        assert_eq!(parse_key("\x1b[A", false).as_deref(), Some("up"));
        assert_eq!(parse_key("\x1bOB", false).as_deref(), Some("down"));
        assert_eq!(parse_key("\x1b[5~", false).as_deref(), Some("pageUp"));
        assert_eq!(parse_key("\x1b[6~", false).as_deref(), Some("pageDown"));
        assert_eq!(parse_key("\x1b[3~", false).as_deref(), Some("delete"));
        assert_eq!(parse_key("\x1b[Z", false).as_deref(), Some("shift+tab"));
    }

    #[test]
    fn control_bytes_map_to_ctrl_letters() {
        assert_eq!(parse_key("\x17", false).as_deref(), Some("ctrl+w"));
        assert_eq!(parse_key("\x13", false).as_deref(), Some("ctrl+s"));
        assert_eq!(parse_key("\x03", false).as_deref(), Some("ctrl+c"));
        assert_eq!(parse_key("\t", false).as_deref(), Some("tab"));
        assert_eq!(parse_key("\r", false).as_deref(), Some("enter"));
        assert_eq!(parse_key("\x7f", false).as_deref(), Some("backspace"));
    }

    #[test]
    fn default_session_bindings_decode() {
        // (kitty, raw, key id)
        let vectors = [
            (false, "\x18", "ctrl+x"),
            (false, "\x17", "ctrl+w"),
            (false, "s", "s"),
            (false, "q", "q"),
            (false, "\x1b[B", "down"),
            (true, "\x1b[13;5u", "ctrl+enter"),
            (true, "\x1b[9;2u", "shift+tab"),
        ];
        for (kitty, raw, key_id) in vectors {
            assert_eq!(parse_key(raw, kitty).as_deref(), Some(key_id), "{raw:?}");
            assert!(matches_key(raw, key_id, kitty), "{raw:?} should match {key_id}");
        }
        assert!(!matches_key("\x18", "ctrl+w", false));
        assert_eq!(parse_key("\x1b[B\x1b[B", false), None);
    }

    #[test]
    fn ctrl_enter_in_kitty_and_modify_other_keys_forms() {
        assert_eq!(parse_key("\x1b[13;5u", true).as_deref(), Some("ctrl+enter"));
        assert_eq!(parse_key("\x1b[27;5;13~", false).as_deref(), Some("ctrl+enter"));
        assert!(matches_key("\x1b[13;5u", "ctrl+enter", true));
        assert!(!matches_key("\r", "ctrl+enter", false));
    }

    #[test]
    fn kitty_newline_is_shift_enter() {
        assert_eq!(parse_key("\n", true).as_deref(), Some("shift+enter"));
        assert_eq!(parse_key("\n", false).as_deref(), Some("enter"));
        assert_eq!(parse_key("\x1b\r", false).as_deref(), Some("alt+enter"));
    }

    #[test]
    fn base_layout_fallback_for_non_latin_only() {
        assert_eq!(parse_key("\x1b[1089::99;5u", true).as_deref(), Some("ctrl+c"));
        assert_eq!(parse_key("\x1b[99::118;5u", true).as_deref(), Some("ctrl+c"));
    }

    #[test]
    fn text_excludes_escapes_and_controls() {
        assert_eq!(parse_text("héllo").as_deref(), Some("héllo"));
        assert_eq!(parse_text("\x1b[A"), None);
        assert_eq!(parse_text("\r"), None);
        assert_eq!(parse_text("\x1b[97u").as_deref(), Some("a"));
        assert_eq!(parse_text("\x1b[97;2u").as_deref(), Some("A"));
        assert_eq!(parse_text("\x1b[97;5u"), None);
    }

    #[test]
    fn release_events_are_detected() {
        assert_eq!(parse_key_event_type("\x1b[97;1:3u"), KeyEventType::Release);
        assert_eq!(parse_key_event_type("\x1b[97;1:2u"), KeyEventType::Repeat);
        assert_eq!(parse_key_event_type("a"), KeyEventType::Press);
        assert_eq!(
            parse_key_event_type("\x1b[200~90:62:3F\x1b[201~"),
            KeyEventType::Press
        );
    }

    #[test]
    fn key_id_comparison_ignores_case_and_modifier_order() {
        assert!(key_ids_equal("pageUp", "pageup"));
        assert!(key_ids_equal("ctrl+shift+x", "shift+ctrl+x"));
        assert!(!key_ids_equal("ctrl+x", "x"));
        assert!(key_ids_equal("ctrl++", "ctrl++"));
    }
}
