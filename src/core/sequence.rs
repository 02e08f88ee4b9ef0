//! Splits raw terminal bytes into single keys and complete escape sequences.

const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Complete,
    Incomplete,
}

/// Complete sequences in arrival order, plus an unfinished escape tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceSplit {
    pub sequences: Vec<String>,
    pub remainder: String,
}

/// Cuts `data` into one entry per key. Everything after the first unfinished escape sequence
/// is left in `remainder`, so bytes are never reordered.
pub fn split_sequences(data: &str) -> SequenceSplit {
    let mut sequences = Vec::new();
    let bytes = data.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != ESC {
            let Some(ch) = data[pos..].chars().next() else {
                break;
            };
            sequences.push(ch.to_string());
            pos += ch.len_utf8();
            continue;
        }

        let end = (pos + 1..=bytes.len())
            .filter(|end| data.is_char_boundary(*end))
            .find(|end| sequence_status(&data[pos..*end]) == Status::Complete);
        let Some(end) = end else {
            return SequenceSplit {
                sequences,
                remainder: data[pos..].to_string(),
            };
        };
        sequences.push(data[pos..end].to_string());
        pos = end;
    }

    SequenceSplit {
        sequences,
        remainder: String::new(),
    }
}

fn sequence_status(candidate: &str) -> Status {
    let mut chars = candidate.chars();
    chars.next();
    let Some(introducer) = chars.next() else {
        return Status::Incomplete;
    };
    let body = chars.as_str();

    match introducer {
        '[' => csi_status(body),
        // SS3: one final byte after the introducer.
        'O' => {
            if body.is_empty() {
                Status::Incomplete
            } else {
                Status::Complete
            }
        }
        ']' => {
            if body.ends_with('\x07') || body.ends_with("\x1b\\") {
                Status::Complete
            } else {
                Status::Incomplete
            }
        }
        'P' | '_' => {
            if body.ends_with("\x1b\\") {
                Status::Complete
            } else {
                Status::Incomplete
            }
        }
        // Alt+key.
        _ => Status::Complete,
    }
}

fn csi_status(body: &str) -> Status {
    match body.as_bytes().last() {
        Some(last) if (0x40..=0x7e).contains(last) => Status::Complete,
        _ => Status::Incomplete,
    }
}
