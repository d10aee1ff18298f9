//! Packed geometry display lists
//!
//! A display list is the command stream the geometry engine reads through
//! its FIFO. Opcodes are packed four to a word, followed by the parameter
//! words of those four commands in order.
//!
//! # Layout
//! ```text
//! Group (repeated):
//! 0x00: op0 u8, op1 u8, op2 u8, op3 u8
//! 0x04: params(op0) params(op1) params(op2) params(op3)   - u32 LE words
//!       [0u32]                                            - padding word, see below
//! ```
//!
//! Short lists are padded with `Nop` (0x00) to a whole group. A group gets one
//! trailing zero word when Identity, PushMatrix or End directly follows a
//! command that is neither `Nop` nor one of those three.
//!
//! # Payloads
//! ```text
//! TexCoord            2 × s16 (signed 11.4)
//! VertexXY/XZ/YZ      2 × s16 (signed 6.9)
//! Vertex              3 × s16 (signed 6.9) + u16 pad
//! VertexShort         10/10/10 (signed 3.6)
//! VertexDiff          10/10/10 (signed 0.9, delta × 8)
//! Normal              10/10/10 (signed 0.9, clamped to [-1, 0.998047])
//! Color               u16 RGB555 + u16 pad
//! Begin/RestoreMatrix u32
//! ```

mod encoding;
mod error;
mod listing;

#[cfg(test)]
mod tests;

pub use encoding::{GROUP_SIZE, decode_display_list, encode_display_list, needs_padding_word};
pub use error::DisplayListError;
pub use listing::{format_commands, strip_nops};
