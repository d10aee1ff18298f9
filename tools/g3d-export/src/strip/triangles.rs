//! Triangle strip builder

use super::builder::{StripRules, run};
use crate::primitive::{Primitive, PrimitiveKind};

struct TriangleRules;

impl StripRules for TriangleRules {
    const CORNERS: usize = 3;
    const INPUT: PrimitiveKind = PrimitiveKind::Triangles;
    const OUTPUT: PrimitiveKind = PrimitiveKind::TriangleStrip;
    const MAX_SEGMENTS: Option<usize> = None;
    const EMITS_EDGE: bool = false;

    /// Entering through `(a, b)`, the next shared edge is `b` to the third corner
    fn advance(a: usize, b: usize) -> (usize, usize) {
        (b, 3 - a - b)
    }
}

/// Merge single triangles into triangle strips
///
/// Every input triangle ends up in exactly one output primitive: a
/// `TriangleStrip` of two or more triangles or a standalone copy of itself.
pub fn strip_triangles(primitives: Vec<Primitive>) -> Vec<Primitive> {
    run::<TriangleRules>(primitives)
}
