//! Types for mesh import and expansion

use smallvec::SmallVec;

use super::tables::AttributeTables;
use crate::primitive::Primitive;

/// Attribute references of one face corner (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// Corners of one face, in file order
pub type Face = SmallVec<[FaceVertex; 4]>;

/// Raw mesh as read from disk
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    /// Per-position RGB in [0, 1]; empty when the file has no vertex colors
    pub colors: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<Face>,
}

impl MeshData {
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }
}

/// Mesh expanded into indexed primitives, ready for stripping
#[derive(Debug, Clone)]
pub struct ExpandedMesh {
    /// One `Triangles` or `Quads` primitive per face
    pub primitives: Vec<Primitive>,
    pub tables: AttributeTables,
    /// `FORMAT_*` flags of the attributes the primitives carry
    pub format: u8,
    /// Faces with a vertex count other than 3 or 4
    pub skipped_faces: usize,
    /// Right shift applied to every position
    pub pos_scale: u32,
}
