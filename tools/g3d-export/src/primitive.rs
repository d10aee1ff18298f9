//! Mesh primitives with indexed vertex attributes

use g3d_common::PrimitiveType;

/// Kind of geometry a primitive holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Triangles,
    Quads,
    TriangleStrip,
    QuadStrip,
    Other,
}

impl PrimitiveKind {
    /// Sort key: strips first, then lists. `Other` sorts ahead of everything.
    pub fn priority(self) -> i32 {
        match self {
            PrimitiveKind::QuadStrip => 0,
            PrimitiveKind::TriangleStrip => 1,
            PrimitiveKind::Quads => 2,
            PrimitiveKind::Triangles => 3,
            PrimitiveKind::Other => -1,
        }
    }

    /// `Begin` argument for this kind, if the hardware can draw it
    pub fn to_primitive_type(self) -> Option<PrimitiveType> {
        match self {
            PrimitiveKind::Triangles => Some(PrimitiveType::Triangle),
            PrimitiveKind::Quads => Some(PrimitiveType::Quadrilateral),
            PrimitiveKind::TriangleStrip => Some(PrimitiveType::TriangleStrips),
            PrimitiveKind::QuadStrip => Some(PrimitiveType::QuadrilateralStrips),
            PrimitiveKind::Other => None,
        }
    }
}

/// Indices of one vertex into the shared attribute tables
///
/// Attributes the mesh does not carry are left at index 0 and never looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub matrix: u32,
    pub position: usize,
    pub normal: usize,
    pub color: usize,
    pub tex_coord: usize,
}

impl VertexRef {
    /// Everything except the position index matches
    #[inline]
    pub fn extra_data_eq(&self, other: &VertexRef) -> bool {
        self.matrix == other.matrix
            && self.normal == other.normal
            && self.color == other.color
            && self.tex_coord == other.tex_coord
    }
}

/// A triangle, quad, strip or list of them
///
/// The vertex count is `vertices.len()`; every attribute index of a vertex
/// lives in the same [`VertexRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub vertices: Vec<VertexRef>,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind, vertices: Vec<VertexRef>) -> Self {
        Self { kind, vertices }
    }

    pub fn triangle(vertices: [VertexRef; 3]) -> Self {
        Self::new(PrimitiveKind::Triangles, vertices.to_vec())
    }

    pub fn quad(vertices: [VertexRef; 4]) -> Self {
        Self::new(PrimitiveKind::Quads, vertices.to_vec())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces this primitive draws
    pub fn face_count(&self) -> usize {
        let n = self.vertices.len();
        match self.kind {
            PrimitiveKind::Triangles => n / 3,
            PrimitiveKind::Quads => n / 4,
            PrimitiveKind::TriangleStrip => n.saturating_sub(2),
            PrimitiveKind::QuadStrip => n.saturating_sub(2) / 2,
            PrimitiveKind::Other => 0,
        }
    }
}
