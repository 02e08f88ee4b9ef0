//! Width-aware text helpers for pane rendering.
//!
//! Widths are terminal columns: graphemes are measured with `unicode-width`, tabs count as
//! [`TAB_WIDTH`] and CSI escape sequences are zero width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const TAB_WIDTH: usize = 4;

fn csi_len(input: &str, pos: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&0x1b) || bytes.get(pos + 1) != Some(&b'[') {
        return None;
    }
    bytes[pos + 2..]
        .iter()
        .position(|b| (0x40..=0x7e).contains(b))
        .map(|end| end + 3)
}

fn grapheme_width(grapheme: &str) -> usize {
    if grapheme == "\t" {
        TAB_WIDTH
    } else {
        UnicodeWidthStr::width(grapheme)
    }
}

/// Splits `input` into (is_escape, fragment) pieces, escapes kept intact.
fn segments(input: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut idx = 0;
    while idx < input.len() {
        if let Some(len) = csi_len(input, idx) {
            if plain_start < idx {
                out.push((false, &input[plain_start..idx]));
            }
            out.push((true, &input[idx..idx + len]));
            idx += len;
            plain_start = idx;
            continue;
        }
        idx += input[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
    }
    if plain_start < input.len() {
        out.push((false, &input[plain_start..]));
    }
    out
}

pub fn visible_width(input: &str) -> usize {
    segments(input)
        .into_iter()
        .filter(|(escape, _)| !escape)
        .flat_map(|(_, text)| text.graphemes(true))
        .map(grapheme_width)
        .sum()
}

/// Expands tabs to spaces so rendered code lines line up with their measured width.
pub fn expand_tabs(input: &str) -> String {
    input.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Cuts `text` to at most `max_width` columns, appending `ellipsis` when it was shortened.
/// With `pad`, short results are right-padded with spaces to exactly `max_width`.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str, pad: bool) -> String {
    if max_width == 0 {
        return String::new();
    }

    let width = visible_width(text);
    if width <= max_width {
        if pad {
            return format!("{text}{}", " ".repeat(max_width - width));
        }
        return text.to_string();
    }

    let ellipsis_width = visible_width(ellipsis).min(max_width);
    let budget = max_width - ellipsis_width;
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    let mut saw_escape = false;
    'outer: for (escape, fragment) in segments(text) {
        if escape {
            out.push_str(fragment);
            saw_escape = true;
            continue;
        }
        for grapheme in fragment.graphemes(true) {
            let w = grapheme_width(grapheme);
            if used + w > budget {
                break 'outer;
            }
            out.push_str(grapheme);
            used += w;
        }
    }
    if saw_escape {
        out.push_str("\x1b[0m");
    }
    out.push_str(ellipsis);
    used += ellipsis_width;
    if pad && used < max_width {
        out.push_str(&" ".repeat(max_width - used));
    }
    out
}

/// Word-wraps plain text to `width` columns. Hard newlines are kept; words longer than the width
/// are broken at grapheme boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let raw_line = expand_tabs(raw_line);
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw_line.split_word_bounds() {
            let word_width = visible_width(word);
            let is_space = word.trim().is_empty();

            if current_width + word_width <= width {
                current.push_str(word);
                current_width += word_width;
                continue;
            }
            if is_space {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_width = 0;
                continue;
            }
            if !current.is_empty() {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_width = 0;
            }
            for grapheme in word.graphemes(true) {
                let w = grapheme_width(grapheme);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += w;
            }
        }
        lines.push(current.trim_end().to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{truncate_to_width, visible_width, wrap_text};

    #[test]
    fn ansi_ignored_in_width() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
        assert_eq!(visible_width("日本"), 4);
        assert_eq!(visible_width("\tx"), 5);
    }

    #[test]
    fn truncate_adds_ellipsis_and_pads() {
        assert_eq!(truncate_to_width("hello world", 8, "…", false), "hello w…");
        assert_eq!(truncate_to_width("hi", 5, "…", true), "hi   ");
        assert_eq!(truncate_to_width("hi", 0, "…", true), "");
    }

    #[test]
    fn truncate_resets_styles_when_cut() {
        let out = truncate_to_width("\x1b[1mbold text\x1b[22m", 5, "…", false);
        assert_eq!(out, "\x1b[1mbold\x1b[0m…");
    }

    #[test]
    fn wrap_breaks_on_words_and_long_tokens() {
        assert_eq!(wrap_text("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\n\nb", 4), vec!["a", "", "b"]);
    }
}
