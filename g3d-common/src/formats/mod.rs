//! Geometry engine command formats
//!
//! [`command`] models single geometry commands; [`display_list`] packs them
//! into the opcode-group stream stored in model files.

pub mod command;
pub mod display_list;

pub use command::{Command, Opcode, Operands, PrimitiveType};
pub use display_list::{
    DisplayListError, GROUP_SIZE, decode_display_list, encode_display_list, format_commands,
    needs_padding_word, strip_nops,
};
