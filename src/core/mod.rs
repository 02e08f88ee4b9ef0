//! Core building blocks: input decoding, keybindings, the text buffer and viewport arithmetic.

pub mod error;
pub mod input;
pub mod input_event;
pub mod keybindings;
pub mod scroll;
pub mod sequence;
pub mod terminal;
pub mod text;
pub mod text_buffer;
