//! Display list decoding errors

use thiserror::Error;

/// Reasons a byte buffer is not a valid display list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayListError {
    #[error("display list truncated at offset {offset:#x}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown geometry opcode {opcode:#04x} at offset {offset:#x}")]
    UnknownOpcode { opcode: u8, offset: usize },
}
