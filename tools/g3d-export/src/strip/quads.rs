//! Quad strip builder

use super::builder::{StripRules, run};
use crate::primitive::{Primitive, PrimitiveKind};

/// Longest quad strip the model format can describe, in quads
pub const MAX_QUAD_STRIP_LENGTH: usize = 1706;

struct QuadRules;

impl StripRules for QuadRules {
    const CORNERS: usize = 4;
    const INPUT: PrimitiveKind = PrimitiveKind::Quads;
    const OUTPUT: PrimitiveKind = PrimitiveKind::QuadStrip;
    const MAX_SEGMENTS: Option<usize> = Some(MAX_QUAD_STRIP_LENGTH);
    const EMITS_EDGE: bool = true;

    /// Edge across the quad from `(a, b)`, keeping `a` and `b` on the same sides
    fn advance(a: usize, b: usize) -> (usize, usize) {
        match (a, b) {
            (3, 0) => (2, 1),
            (0, 3) => (1, 2),
            _ if a >= b => (if a == 3 { 0 } else { a + 1 }, if b == 0 { 3 } else { b - 1 }),
            _ => (if a == 0 { 3 } else { a - 1 }, if b == 3 { 0 } else { b + 1 }),
        }
    }
}

/// Merge single quads into quad strips of at most [`MAX_QUAD_STRIP_LENGTH`] quads
pub fn strip_quads(primitives: Vec<Primitive>) -> Vec<Primitive> {
    run::<QuadRules>(primitives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_edges() {
        assert_eq!(QuadRules::advance(0, 1), (3, 2));
        assert_eq!(QuadRules::advance(1, 2), (0, 3));
        assert_eq!(QuadRules::advance(2, 1), (3, 0));
        assert_eq!(QuadRules::advance(3, 0), (2, 1));
        assert_eq!(QuadRules::advance(0, 3), (1, 2));
    }
}
