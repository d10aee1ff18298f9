//! Final merge and ordering of stripped primitives

use crate::primitive::{Primitive, PrimitiveKind};

/// Merge loose geometry and order primitives for emission
///
/// - a triangle strip of one triangle becomes a plain triangle
/// - a quad strip of one quad becomes a plain quad (strip order 0,1,3,2)
/// - all plain triangles are merged into one `Triangles` list, likewise quads
///
/// The result is stably sorted by kind (quad strips, triangle strips, quads,
/// triangles) and then by vertex count.
pub fn finalize_primitives(primitives: Vec<Primitive>) -> Vec<Primitive> {
    let mut triangles = Vec::new();
    let mut quads = Vec::new();
    let mut out = Vec::with_capacity(primitives.len());

    for prim in primitives {
        match prim.kind {
            PrimitiveKind::Triangles => triangles.extend(prim.vertices),
            PrimitiveKind::Quads => quads.extend(prim.vertices),
            PrimitiveKind::TriangleStrip if prim.vertices.len() == 3 => {
                triangles.extend(prim.vertices)
            }
            PrimitiveKind::QuadStrip if prim.vertices.len() == 4 => {
                let v = &prim.vertices;
                quads.extend([v[0], v[1], v[3], v[2]]);
            }
            _ => out.push(prim),
        }
    }

    if !quads.is_empty() {
        out.push(Primitive::new(PrimitiveKind::Quads, quads));
    }
    if !triangles.is_empty() {
        out.push(Primitive::new(PrimitiveKind::Triangles, triangles));
    }

    out.sort_by_key(|p| (p.kind.priority(), p.vertex_count()));
    out
}
