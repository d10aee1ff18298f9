//! Triangle and quad strip building
//!
//! Independent triangles and quads are merged into strips with a greedy
//! most-constrained-first search. Two primitives can be joined only when
//! they share an edge whose vertices agree on every attribute index, so a
//! strip never changes how the mesh renders.
//!
//! Quads are stripped before triangles. [`finalize_primitives`] then merges
//! whatever stayed loose and puts strips first.

mod builder;
mod finalize;
mod quads;
mod state;
mod triangles;


use tracing::debug;

use crate::primitive::{Primitive, PrimitiveKind};

pub use finalize::finalize_primitives;
pub use quads::{MAX_QUAD_STRIP_LENGTH, strip_quads};
pub use state::{StripState, find_candidates, is_suitable_next_candidate, most_constrained};
pub use triangles::strip_triangles;

/// Summary of a primitive list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripStats {
    /// Triangle and quad strips
    pub strips: usize,
    /// Plain triangle and quad lists
    pub lists: usize,
    /// Faces drawn by all primitives
    pub faces: usize,
    /// Vertices sent to the geometry engine
    pub vertices: usize,
}

impl StripStats {
    pub fn collect(primitives: &[Primitive]) -> Self {
        primitives.iter().fold(Self::default(), |mut stats, prim| {
            match prim.kind {
                PrimitiveKind::TriangleStrip | PrimitiveKind::QuadStrip => stats.strips += 1,
                PrimitiveKind::Triangles | PrimitiveKind::Quads => stats.lists += 1,
                PrimitiveKind::Other => {}
            }
            stats.faces += prim.face_count();
            stats.vertices += prim.vertex_count();
            stats
        })
    }
}

/// Strip (optionally) and finalize the primitives of one mesh
pub fn build_primitives(primitives: Vec<Primitive>, use_strip: bool) -> Vec<Primitive> {
    let before = StripStats::collect(&primitives);

    let primitives = if use_strip {
        strip_triangles(strip_quads(primitives))
    } else {
        primitives
    };
    let primitives = finalize_primitives(primitives);

    let after = StripStats::collect(&primitives);
    debug!(
        "Stripping: {} vertices -> {} vertices ({} strips, {} lists)",
        before.vertices, after.vertices, after.strips, after.lists
    );

    primitives
}
