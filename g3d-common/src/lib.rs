//! Shared types and utilities for the Nitro geometry engine
//!
//! This crate provides the binary encodings used by:
//! - `g3d-export` (asset pipeline)
//! - anything that needs to inspect existing display lists
//!
//! # Modules
//!
//! - [`packing`] - Fixed-point packing utilities (f32 → fx16/fx10, RGB888 → RGB555)
//! - [`formats`] - Geometry commands and packed display lists

pub mod formats;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{
    FX16, FixedPointSpec, TEX_COORD, VEC10, VEC10_SHORT, clamp_normal_component, decode_fixed,
    encode_fixed, pack_rgb555, pack_vec10, quantize, unpack_rgb555, unpack_vec10,
};

// Re-export commonly used format items
pub use formats::{
    Command, DisplayListError, Opcode, Operands, PrimitiveType, decode_display_list,
    encode_display_list, format_commands, strip_nops,
};
