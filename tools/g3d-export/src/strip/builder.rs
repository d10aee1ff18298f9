//! Greedy strip search shared by the triangle and quad builders

use tracing::trace;

use super::state::{StripState, corner_of, find_candidates, most_constrained, shares_edge};
use crate::primitive::{Primitive, PrimitiveKind};

/// Shape-specific rules of a strip builder
pub(crate) trait StripRules {
    /// Corners per input primitive (3 or 4)
    const CORNERS: usize;
    /// Kind consumed by the builder
    const INPUT: PrimitiveKind;
    /// Kind of the strips it produces
    const OUTPUT: PrimitiveKind;
    /// Longest strip in primitives, if the format limits it
    const MAX_SEGMENTS: Option<usize>;
    /// Whether each step appends both ends of the advanced edge or only the second
    const EMITS_EDGE: bool;

    /// Edge shared with the next primitive after entering through `(a, b)`
    fn advance(a: usize, b: usize) -> (usize, usize);
}

/// Run one stripping pass
///
/// Primitives of other kinds (or of the right kind but the wrong vertex
/// count) are appended after the results untouched.
pub(crate) fn run<R: StripRules>(primitives: Vec<Primitive>) -> Vec<Primitive> {
    let (list, rest): (Vec<Primitive>, Vec<Primitive>) = primitives
        .into_iter()
        .partition(|p| p.kind == R::INPUT && p.vertices.len() == R::CORNERS);

    let mut states = find_candidates(&list, R::CORNERS);
    let mut result = Vec::with_capacity(list.len() + rest.len());

    while let Some(start) = most_constrained(&mut states) {
        let mut best_len = 0;
        let mut best_edge = (0, 1);
        for i in 0..R::CORNERS {
            let edge = (i, (i + 1) % R::CORNERS);
            let mut processed: Vec<bool> = states.iter().map(|s| s.processed).collect();
            let len = follow::<R>(&list, &states, &mut processed, start, edge, |_, _| {});
            if len > best_len {
                best_len = len;
                best_edge = edge;
            }
        }

        if best_len <= 1 {
            states[start].processed = true;
            result.push(list[start].clone());
        } else {
            trace!(start, len = best_len, ?best_edge, "building strip");
            result.push(build::<R>(&list, &mut states, start, best_edge));
        }
    }

    result.extend(rest);
    result
}

/// Materialize the strip starting at `start` on `edge`
fn build<R: StripRules>(
    list: &[Primitive],
    states: &mut [StripState],
    start: usize,
    edge: (usize, usize),
) -> Primitive {
    let first = &list[start];
    let mut vertices = vec![first.vertices[edge.0], first.vertices[edge.1]];
    let mut processed: Vec<bool> = states.iter().map(|s| s.processed).collect();

    follow::<R>(list, states, &mut processed, start, edge, |idx, (a, b)| {
        let prim = &list[idx];
        if R::EMITS_EDGE {
            vertices.push(prim.vertices[a]);
        }
        vertices.push(prim.vertices[b]);
    });

    for (state, done) in states.iter_mut().zip(processed) {
        state.processed = done;
    }
    Primitive::new(R::OUTPUT, vertices)
}

/// Walk a strip from `start`, marking visited primitives in `processed`
///
/// `visit` sees every primitive of the strip in order together with the
/// advanced edge through which the walk leaves it. Returns the number of
/// primitives in the strip.
fn follow<R: StripRules>(
    list: &[Primitive],
    states: &[StripState],
    processed: &mut [bool],
    start: usize,
    edge: (usize, usize),
    mut visit: impl FnMut(usize, (usize, usize)),
) -> usize {
    processed[start] = true;
    let (mut a, mut b) = R::advance(edge.0, edge.1);
    visit(start, (a, b));

    let mut current = start;
    let mut count = 1;
    loop {
        if R::MAX_SEGMENTS.is_some_and(|max| count >= max) {
            break;
        }

        let prim = &list[current];
        let next = states[current].candidates.iter().find_map(|&cand| {
            if processed[cand] {
                return None;
            }
            let next = &list[cand];
            if !shares_edge(prim, next, a, b, R::CORNERS) {
                return None;
            }
            let local_a = corner_of(next, prim.vertices[a].position, R::CORNERS)?;
            let local_b = corner_of(next, prim.vertices[b].position, R::CORNERS)?;
            // Degenerate primitives can map both ends to one corner
            (local_a != local_b).then_some((cand, local_a, local_b))
        });
        let Some((cand, local_a, local_b)) = next else {
            break;
        };

        (a, b) = R::advance(local_a, local_b);
        processed[cand] = true;
        count += 1;
        visit(cand, (a, b));
        current = cand;
    }
    count
}
