//! Per-pass bookkeeping for the strip builders
//!
//! Primitives stay immutable during a pass. Everything the greedy search
//! needs to mutate lives in a [`StripState`] side table indexed like the
//! primitive list.

use smallvec::SmallVec;

use crate::primitive::Primitive;

/// Search state of one primitive
#[derive(Debug, Clone, Default)]
pub struct StripState {
    /// Emitted, either standalone or inside a strip
    pub processed: bool,
    /// Neighbours that can follow this primitive in a strip
    pub candidates: SmallVec<[usize; 4]>,
    /// Candidates not yet processed
    pub live: usize,
}

// ============================================================================
// Adjacency Tests
// ============================================================================

/// Whether `next` can follow `prim` in a strip
///
/// The two must share an edge (same position and same matrix, normal,
/// color and texcoord indices on both ends) and that edge must run in the
/// opposite direction in `next`, so the strip keeps a consistent winding.
pub fn is_suitable_next_candidate(prim: &Primitive, next: &Primitive, corners: usize) -> bool {
    let mut first: Option<(usize, usize)> = None;
    for i in 0..corners {
        for j in 0..corners {
            let a = &prim.vertices[i];
            let b = &next.vertices[j];
            if a.position != b.position || !a.extra_data_eq(b) {
                continue;
            }
            match first {
                None => first = Some((i, j)),
                Some((first_i, first_j)) => {
                    let last = corners - 1;
                    return if first_i == 0 && i == last {
                        first_j < j || (first_j == last && j == 0)
                    } else {
                        first_j > j || (first_j == 0 && j == last)
                    };
                }
            }
        }
    }
    false
}

/// Whether `next` contains both ends of `prim`'s edge `(v0, v1)`
pub fn shares_edge(prim: &Primitive, next: &Primitive, v0: usize, v1: usize, corners: usize) -> bool {
    let a = &prim.vertices[v0];
    let b = &prim.vertices[v1];
    let matches = next.vertices[..corners]
        .iter()
        .map(|c| {
            let hit_a = c.position == a.position && a.extra_data_eq(c);
            let hit_b = c.position == b.position && b.extra_data_eq(c);
            hit_a as usize + hit_b as usize
        })
        .sum::<usize>();
    matches == 2
}

/// Corner of `prim` holding `position`
#[inline]
pub fn corner_of(prim: &Primitive, position: usize, corners: usize) -> Option<usize> {
    prim.vertices[..corners]
        .iter()
        .position(|v| v.position == position)
}

// ============================================================================
// Candidate Bookkeeping
// ============================================================================

/// Record up to `corners` strip candidates for every primitive
pub fn find_candidates(list: &[Primitive], corners: usize) -> Vec<StripState> {
    list.iter()
        .enumerate()
        .map(|(i, prim)| {
            let candidates: SmallVec<[usize; 4]> = list
                .iter()
                .enumerate()
                .filter(|&(j, next)| j != i && is_suitable_next_candidate(prim, next, corners))
                .map(|(j, _)| j)
                .take(corners)
                .collect();
            StripState {
                processed: false,
                live: candidates.len(),
                candidates,
            }
        })
        .collect()
}

/// Refresh live counts and pick the next primitive to start from
///
/// Returns the unprocessed primitive with the fewest live candidates. The
/// first one found wins ties, and the scan stops early at a count of one or
/// less. `None` once everything is processed.
pub fn most_constrained(states: &mut [StripState]) -> Option<usize> {
    for i in 0..states.len() {
        if states[i].processed {
            continue;
        }
        let live = states[i]
            .candidates
            .iter()
            .filter(|&&c| !states[c].processed)
            .count();
        states[i].live = live;
    }

    let mut best: Option<(usize, usize)> = None;
    for (i, state) in states.iter().enumerate() {
        if state.processed {
            continue;
        }
        if best.is_none_or(|(_, count)| state.live < count) {
            best = Some((i, state.live));
            if state.live <= 1 {
                break;
            }
        }
    }
    best.map(|(i, _)| i)
}
