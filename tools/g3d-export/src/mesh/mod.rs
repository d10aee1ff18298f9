//! Mesh import and expansion (OBJ -> indexed primitives)

mod expand;
mod obj;
mod tables;
mod types;

// Re-export public API
pub use expand::{
    ModelBounds, expand_mesh, quantize_color, quantize_normal, quantize_position,
    quantize_tex_coord, vertex_format,
};
pub use obj::{ObjError, load_obj, parse_obj};
pub use tables::{AttributeTable, AttributeTables, ColorKey, NormalKey, PositionKey, TexCoordKey};
pub use types::{ExpandedMesh, Face, FaceVertex, MeshData};
