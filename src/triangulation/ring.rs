use crate::math::polygon_2d::signed_area;

use super::node::{area, equals, NodeArena, NodeId};

/// Builds a circular ring of nodes from the vertex range
/// `coords[start..end)` with one vertex every `stride` values.
///
/// The range's winding is fixed to the requested orientation: when the
/// actual winding disagrees with `ccw`, the vertices are linked in
/// reverse order. A synthesized last node that coincides exactly with its
/// successor (a ring closed by repeating its first vertex) is dropped.
///
/// Returns a node of the ring, or `None` for an empty range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn build_ring(
    arena: &mut NodeArena,
    coords: &[f64],
    start: usize,
    end: usize,
    stride: usize,
    ccw: bool,
) -> Option<NodeId> {
    let mut last: Option<NodeId> = None;

    if ccw == (signed_area(coords, start, end, stride) > 0.0) {
        let mut i = start;
        while i < end {
            last = Some(arena.insert(i as u32, coords[i], coords[i + 1], last));
            i += stride;
        }
    } else {
        let mut i = end;
        while i > start {
            i -= stride;
            last = Some(arena.insert(i as u32, coords[i], coords[i + 1], last));
        }
    }

    if let Some(last_id) = last {
        let next = arena[last_id].next;
        if equals(&arena[last_id], &arena[next]) {
            arena.remove(last_id);
            return Some(next);
        }
    }
    last
}

/// Removes duplicate and collinear vertices from a ring until one full
/// revolution makes no removal.
///
/// Bridge-artifact (steiner) nodes are exempt so that hole-merge topology
/// survives even when geometrically duplicated. Returns the node the scan
/// ended on, which is guaranteed to still be linked.
#[allow(clippy::float_cmp)]
pub(crate) fn filter_points(
    arena: &mut NodeArena,
    start: NodeId,
    end: Option<NodeId>,
) -> NodeId {
    let mut end = end.unwrap_or(start);

    let mut p = start;
    loop {
        let mut again = false;
        let p_next = arena[p].next;
        let p_prev = arena[p].prev;
        if !arena[p].steiner
            && (equals(&arena[p], &arena[p_next])
                || area(&arena[p_prev], &arena[p], &arena[p_next]) == 0.0)
        {
            arena.remove(p);
            p = p_prev;
            end = p_prev;
            if p == arena[p].next {
                break;
            }
            again = true;
        } else {
            p = p_next;
        }
        if !again && p == end {
            break;
        }
    }

    end
}
