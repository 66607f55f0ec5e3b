use super::node::{area, locally_inside, point_in_triangle, NodeArena, NodeId};
use super::ring::{build_ring, filter_points};

/// Merges every hole ring into the outer ring via visibility bridges,
/// returning a node of the combined ring.
///
/// Holes are processed sorted by the x of their leftmost vertex; the sort
/// is stable, so holes sharing that x keep their input order. The
/// ordering affects which triangulation is produced (not its validity)
/// and is part of the deterministic output contract. A hole for which no
/// bridge exists (possible only when the hole is not fully interior) is
/// dropped from the triangulation.
pub(crate) fn eliminate_holes(
    arena: &mut NodeArena,
    coords: &[f64],
    hole_offsets: &[usize],
    outer: NodeId,
    stride: usize,
) -> NodeId {
    let mut queue = Vec::with_capacity(hole_offsets.len());

    for (i, &offset) in hole_offsets.iter().enumerate() {
        let start = offset * stride;
        let end = if i + 1 < hole_offsets.len() {
            hole_offsets[i + 1] * stride
        } else {
            coords.len()
        };
        if let Some(list) = build_ring(arena, coords, start, end, stride, false) {
            if list == arena[list].next {
                // A hole collapsed to one point still constrains the
                // triangulation as a steiner point.
                arena[list].steiner = true;
            }
            queue.push(left_most(arena, list));
        }
    }

    queue.sort_by(|&a, &b| arena[a].x.total_cmp(&arena[b].x));

    let mut outer = outer;
    for hole in queue {
        outer = eliminate_hole(arena, hole, outer);
    }
    outer
}

/// Bridges one hole into the combined ring and cleans up around both
/// bridge endpoints.
fn eliminate_hole(arena: &mut NodeArena, hole: NodeId, outer: NodeId) -> NodeId {
    let Some(bridge) = find_hole_bridge(arena, hole, outer) else {
        return outer;
    };

    let bridge_reverse = arena.split_ring(bridge, hole);

    let next = arena[bridge_reverse].next;
    filter_points(arena, bridge_reverse, Some(next));
    let next = arena[bridge].next;
    filter_points(arena, bridge, Some(next))
}

/// David Eberly's algorithm for finding a bridge between a hole and the
/// outer polygon: cast a horizontal ray from the hole's leftmost point
/// toward decreasing x, take the nearest crossed edge's lesser-x endpoint
/// as candidate, then refine among ring points inside the ray triangle.
#[allow(clippy::float_cmp)]
fn find_hole_bridge(arena: &NodeArena, hole: NodeId, outer: NodeId) -> Option<NodeId> {
    let hx = arena[hole].x;
    let hy = arena[hole].y;
    let mut qx = f64::NEG_INFINITY;
    let mut m: Option<NodeId> = None;

    let mut p = outer;
    loop {
        let p_next = arena[p].next;
        let py = arena[p].y;
        let py_next = arena[p_next].y;
        if hy <= py && hy >= py_next && py_next != py {
            let x = arena[p].x + (hy - py) * (arena[p_next].x - arena[p].x) / (py_next - py);
            if x <= hx && x > qx {
                qx = x;
                m = Some(if arena[p].x < arena[p_next].x { p } else { p_next });
                if x == hx {
                    // The ray goes through the vertex itself.
                    return m;
                }
            }
        }
        p = p_next;
        if p == outer {
            break;
        }
    }

    let mut m = m?;
    if hx == qx {
        // Hole touches the outer segment; use its endpoint directly.
        return Some(m);
    }

    // The bridge to M may be blocked: look for a better candidate among
    // ring points strictly inside the triangle of (hole point, crossing
    // point, M), visible from the hole, minimizing the tangent to the
    // ray; ties go to the larger x, then to the sector-containment test.
    let stop = m;
    let mx = arena[m].x;
    let my = arena[m].y;
    let mut tan_min = f64::INFINITY;

    let mut p = m;
    loop {
        let px = arena[p].x;
        let py = arena[p].y;
        if hx >= px
            && px >= mx
            && hx != px
            && point_in_triangle(
                if hy < my { hx } else { qx },
                hy,
                mx,
                my,
                if hy < my { qx } else { hx },
                hy,
                px,
                py,
            )
        {
            let tan = (hy - py).abs() / (hx - px);
            if locally_inside(arena, p, hole)
                && (tan < tan_min
                    || (tan == tan_min
                        && (px > arena[m].x
                            || (px == arena[m].x && sector_contains_sector(arena, m, p)))))
            {
                m = p;
                tan_min = tan;
            }
        }
        p = arena[p].next;
        if p == stop {
            break;
        }
    }

    Some(m)
}

/// Whether the local sector at `m` already contains the sector at the
/// equally-placed challenger `p`.
fn sector_contains_sector(arena: &NodeArena, m: NodeId, p: NodeId) -> bool {
    area(&arena[arena[m].prev], &arena[m], &arena[arena[p].prev]) < 0.0
        && area(&arena[arena[p].next], &arena[m], &arena[arena[m].next]) < 0.0
}

/// Leftmost node of a ring: minimum x, ties broken by minimum y.
#[allow(clippy::float_cmp)]
fn left_most(arena: &NodeArena, start: NodeId) -> NodeId {
    let mut leftmost = start;
    let mut p = arena[start].next;
    while p != start {
        let candidate = &arena[p];
        let best = &arena[leftmost];
        if candidate.x < best.x || (candidate.x == best.x && candidate.y < best.y) {
            leftmost = p;
        }
        p = arena[p].next;
    }
    leftmost
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::super::node::NodeArena;
    use super::*;

    fn ring_len(arena: &NodeArena, start: NodeId) -> usize {
        let mut count = 1;
        let mut p = arena[start].next;
        while p != start {
            count += 1;
            p = arena[p].next;
        }
        count
    }

    #[test]
    fn left_most_breaks_ties_by_y() {
        let coords = [2.0, 0.0, 0.0, 3.0, 0.0, 1.0, 3.0, 4.0];
        let mut arena = NodeArena::with_capacity(4);
        let node = build_ring(&mut arena, &coords, 0, coords.len(), 2, true).unwrap();
        let lm = left_most(&arena, node);
        assert_eq!(arena[lm].x, 0.0);
        assert_eq!(arena[lm].y, 1.0);
    }

    #[test]
    fn square_hole_merges_into_one_ring() {
        let coords = [
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, // outer
            4.0, 4.0, 4.0, 6.0, 6.0, 6.0, 6.0, 4.0, // hole
        ];
        let mut arena = NodeArena::with_capacity(12);
        let outer = build_ring(&mut arena, &coords, 0, 8, 2, true).unwrap();
        let merged = eliminate_holes(&mut arena, &coords, &[4], outer, 2);
        // 4 outer + 4 hole + the duplicated bridge pair.
        assert_eq!(ring_len(&arena, merged), 10);
    }

    #[test]
    fn point_hole_is_bridged_as_steiner() {
        let coords = [
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, // outer
            5.0, 5.0, // hole collapsed to a point
        ];
        let mut arena = NodeArena::with_capacity(8);
        let outer = build_ring(&mut arena, &coords, 0, 8, 2, true).unwrap();
        let merged = eliminate_holes(&mut arena, &coords, &[4], outer, 2);
        // 4 outer + 1 steiner + the bridge pair, of which one duplicate
        // is collinear with the spike and filtered away again.
        assert_eq!(ring_len(&arena, merged), 6);
        let mut p = merged;
        let mut steiner_seen = 0;
        loop {
            if arena[p].steiner {
                steiner_seen += 1;
            }
            p = arena[p].next;
            if p == merged {
                break;
            }
        }
        assert_eq!(steiner_seen, 1);
    }

    #[test]
    fn exterior_hole_is_dropped() {
        // The "hole" lies left of the polygon; the leftward ray from its
        // leftmost vertex crosses no outer edge, so no bridge exists.
        let coords = [
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, // outer
            -5.0, 4.0, -5.0, 6.0, -3.0, 6.0, -3.0, 4.0, // not a hole
        ];
        let mut arena = NodeArena::with_capacity(10);
        let outer = build_ring(&mut arena, &coords, 0, 8, 2, true).unwrap();
        let merged = eliminate_holes(&mut arena, &coords, &[4], outer, 2);
        assert_eq!(ring_len(&arena, merged), 4);
    }
}
