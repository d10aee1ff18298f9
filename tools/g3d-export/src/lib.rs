//! g3d-export library
//!
//! Converts meshes into packed geometry-engine display lists: faces are
//! expanded into indexed primitives, merged into triangle and quad strips,
//! translated into geometry commands and packed with `g3d-common`.

pub mod config;
pub mod export;
pub mod mesh;
pub mod primitive;
pub mod strip;
pub mod translate;

// Re-export the vertex format flags alongside the codec they feed
pub use translate::{FORMAT_COLOR, FORMAT_NORMAL, FORMAT_TEX_COORD};

pub use config::ExportSettings;
pub use export::{ConvertedDisplayList, convert_mesh_to_memory, convert_obj};
pub use primitive::{Primitive, PrimitiveKind, VertexRef};
pub use strip::{StripStats, build_primitives};
pub use translate::{export_display_list, primitives_to_commands};
