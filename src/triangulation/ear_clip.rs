use super::node::{
    area, equals, locally_inside, point_in_triangle, Node, NodeArena, NodeId, NONE,
};
use super::ring::filter_points;
use super::zorder::{index_curve, z_order};

/// Strategy states of the clipping engine, escalated in order whenever a
/// full revolution over the ring finds no ear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// First attempt on the ring as handed in.
    Plain,
    /// Retry after removing duplicate and collinear vertices.
    Filtered,
    /// Retry after curing local self-intersections.
    IntersectionCured,
    /// Terminal strategy: split along a valid diagonal and recurse on the
    /// halves; no further retry at this level.
    Split,
}

impl Pass {
    fn escalate(self) -> Option<Self> {
        match self {
            Self::Plain => Some(Self::Filtered),
            Self::Filtered => Some(Self::IntersectionCured),
            Self::IntersectionCured => Some(Self::Split),
            Self::Split => None,
        }
    }
}

/// Triangulates one ring by ear clipping, appending vertex indices
/// (already divided by stride) to `triangles` in groups of three.
///
/// A non-zero `inv_size` enables the z-order-accelerated interior scan;
/// the acceleration prunes which blocking candidates are examined but
/// never changes which ears are accepted.
#[allow(clippy::too_many_arguments, clippy::float_cmp)]
pub(crate) fn clip_ears(
    arena: &mut NodeArena,
    mut ear: NodeId,
    triangles: &mut Vec<u32>,
    stride: u32,
    min_x: f64,
    min_y: f64,
    inv_size: f64,
    pass: Pass,
) {
    if pass == Pass::Plain && inv_size != 0.0 {
        index_curve(arena, ear, min_x, min_y, inv_size);
    }

    let mut stop = ear;

    // The loop ends when the ring shrinks to two nodes or a whole
    // revolution since the last cut found nothing.
    while arena[ear].prev != arena[ear].next {
        let prev = arena[ear].prev;
        let next = arena[ear].next;

        let found = if inv_size == 0.0 {
            is_ear(arena, ear)
        } else {
            is_ear_hashed(arena, ear, min_x, min_y, inv_size)
        };
        if found {
            triangles.push(arena[prev].vertex / stride);
            triangles.push(arena[ear].vertex / stride);
            triangles.push(arena[next].vertex / stride);

            arena.remove(ear);

            // Skipping the next vertex leads to fewer sliver triangles.
            ear = arena[next].next;
            stop = ear;
            continue;
        }

        ear = next;

        if ear == stop {
            match pass.escalate() {
                Some(Pass::Filtered) => {
                    let filtered = filter_points(arena, ear, None);
                    clip_ears(
                        arena,
                        filtered,
                        triangles,
                        stride,
                        min_x,
                        min_y,
                        inv_size,
                        Pass::Filtered,
                    );
                }
                Some(Pass::IntersectionCured) => {
                    let filtered = filter_points(arena, ear, None);
                    let cured = cure_local_intersections(arena, filtered, triangles, stride);
                    clip_ears(
                        arena,
                        cured,
                        triangles,
                        stride,
                        min_x,
                        min_y,
                        inv_size,
                        Pass::IntersectionCured,
                    );
                }
                Some(Pass::Split) => {
                    split_and_clip(arena, ear, triangles, stride, min_x, min_y, inv_size);
                }
                _ => {}
            }
            break;
        }
    }
}

/// Whether the vertex is an ear: a convex corner whose triangle contains
/// no other non-reflex ring vertex.
///
/// The blocking-point rule deliberately checks only non-reflex vertices
/// rather than running a full visibility test; some pathological inputs
/// accept slightly suboptimal but still valid ears because of it.
fn is_ear(arena: &NodeArena, ear: NodeId) -> bool {
    let b = &arena[ear];
    let a = &arena[b.prev];
    let c = &arena[b.next];

    if area(a, b, c) >= 0.0 {
        return false; // reflex, can't be an ear
    }

    let x0 = a.x.min(b.x.min(c.x));
    let y0 = a.y.min(b.y.min(c.y));
    let x1 = a.x.max(b.x.max(c.x));
    let y1 = a.y.max(b.y.max(c.y));

    let a_id = b.prev;
    let mut p = c.next;
    while p != a_id {
        let node = &arena[p];
        if node.x >= x0
            && node.x <= x1
            && node.y >= y0
            && node.y <= y1
            && point_in_triangle(a.x, a.y, b.x, b.y, c.x, c.y, node.x, node.y)
            && area(&arena[node.prev], node, &arena[node.next]) >= 0.0
        {
            return false;
        }
        p = node.next;
    }
    true
}

/// [`is_ear`] with the interior scan restricted to nodes whose Morton
/// code falls within the z-range of the candidate triangle's bounding
/// box, walking outward from the ear in both z directions.
fn is_ear_hashed(arena: &NodeArena, ear: NodeId, min_x: f64, min_y: f64, inv_size: f64) -> bool {
    let b = &arena[ear];
    let a = &arena[b.prev];
    let c = &arena[b.next];

    if area(a, b, c) >= 0.0 {
        return false;
    }

    let x0 = a.x.min(b.x.min(c.x));
    let y0 = a.y.min(b.y.min(c.y));
    let x1 = a.x.max(b.x.max(c.x));
    let y1 = a.y.max(b.y.max(c.y));

    let min_z = z_order(x0, y0, min_x, min_y, inv_size);
    let max_z = z_order(x1, y1, min_x, min_y, inv_size);

    let a_id = b.prev;
    let c_id = b.next;
    let mut p = b.prev_z;
    let mut n = b.next_z;

    let blocks = |id: NodeId, node: &Node| {
        id != a_id
            && id != c_id
            && point_in_triangle(a.x, a.y, b.x, b.y, c.x, c.y, node.x, node.y)
            && area(&arena[node.prev], node, &arena[node.next]) >= 0.0
    };

    // Walk both directions while both stay within the z-range.
    while p != NONE && arena[p].z >= min_z && n != NONE && arena[n].z <= max_z {
        let node = &arena[p];
        if node.x >= x0
            && node.x <= x1
            && node.y >= y0
            && node.y <= y1
            && blocks(p, node)
        {
            return false;
        }
        p = node.prev_z;

        let node = &arena[n];
        if node.x >= x0
            && node.x <= x1
            && node.y >= y0
            && node.y <= y1
            && blocks(n, node)
        {
            return false;
        }
        n = node.next_z;
    }

    // Drain whichever direction still has candidates in range.
    while p != NONE && arena[p].z >= min_z {
        let node = &arena[p];
        if blocks(p, node) {
            return false;
        }
        p = node.prev_z;
    }
    while n != NONE && arena[n].z <= max_z {
        let node = &arena[n];
        if blocks(n, node) {
            return false;
        }
        n = node.next_z;
    }

    true
}

/// Repairs small local self-intersecting "bowties": where the edges
/// around a vertex pair cross, the pair is cut off as one triangle
/// without resorting to a full polygon split.
fn cure_local_intersections(
    arena: &mut NodeArena,
    mut start: NodeId,
    triangles: &mut Vec<u32>,
    stride: u32,
) -> NodeId {
    let mut p = start;
    loop {
        let a = arena[p].prev;
        let p_next = arena[p].next;
        let b = arena[p_next].next;

        if !equals(&arena[a], &arena[b])
            && intersects(arena, a, p, p_next, b)
            && locally_inside(arena, a, b)
            && locally_inside(arena, b, a)
        {
            triangles.push(arena[a].vertex / stride);
            triangles.push(arena[p].vertex / stride);
            triangles.push(arena[b].vertex / stride);

            arena.remove(p);
            arena.remove(p_next);

            p = b;
            start = b;
        }

        p = arena[p].next;
        if p == start {
            break;
        }
    }

    filter_points(arena, p, None)
}

/// Last-resort strategy: find the first valid diagonal in ring order,
/// split the ring along it, and run the whole engine on both halves.
#[allow(clippy::too_many_arguments)]
fn split_and_clip(
    arena: &mut NodeArena,
    start: NodeId,
    triangles: &mut Vec<u32>,
    stride: u32,
    min_x: f64,
    min_y: f64,
    inv_size: f64,
) {
    let mut a = start;
    loop {
        let a_prev = arena[a].prev;
        let mut b = arena[arena[a].next].next;

        while b != a_prev {
            if arena[a].vertex != arena[b].vertex && is_valid_diagonal(arena, a, b) {
                let c = arena.split_ring(a, b);

                let a_next = arena[a].next;
                let a_half = filter_points(arena, a, Some(a_next));
                let c_next = arena[c].next;
                let c_half = filter_points(arena, c, Some(c_next));

                clip_ears(
                    arena, a_half, triangles, stride, min_x, min_y, inv_size, Pass::Plain,
                );
                clip_ears(
                    arena, c_half, triangles, stride, min_x, min_y, inv_size, Pass::Plain,
                );
                return;
            }
            b = arena[b].next;
        }

        a = arena[a].next;
        if a == start {
            break;
        }
    }
}

/// Whether `a`-`b` is a valid diagonal of the ring: not an edge, crossing
/// nothing, locally inside from both endpoints, with its midpoint inside
/// the ring, and not splitting the ring into opposite windings. The
/// zero-length case between two convex corners is the one exception.
#[allow(clippy::float_cmp)]
fn is_valid_diagonal(arena: &NodeArena, a: NodeId, b: NodeId) -> bool {
    let a_node = &arena[a];
    let b_node = &arena[b];
    let a_next = &arena[a_node.next];
    let a_prev = &arena[a_node.prev];
    let b_next = &arena[b_node.next];
    let b_prev = &arena[b_node.prev];

    a_next.vertex != b_node.vertex
        && a_prev.vertex != b_node.vertex
        && !intersects_polygon(arena, a, b)
        && (locally_inside(arena, a, b)
            && locally_inside(arena, b, a)
            && middle_inside(arena, a, b)
            && (area(a_prev, a_node, b_prev) != 0.0 || area(a_node, b_prev, b_node) != 0.0)
            || equals(a_node, b_node)
                && area(a_prev, a_node, a_next) > 0.0
                && area(b_prev, b_node, b_next) > 0.0)
}

fn sign(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// For collinear configurations: whether `q` lies on the segment `p`-`r`.
fn on_segment(p: &Node, q: &Node, r: &Node) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segment `p1`-`q1` intersects segment `p2`-`q2`, including
/// touching and collinear-overlap cases.
#[allow(clippy::similar_names)]
fn intersects(arena: &NodeArena, p1: NodeId, q1: NodeId, p2: NodeId, q2: NodeId) -> bool {
    let p1 = &arena[p1];
    let q1 = &arena[q1];
    let p2 = &arena[p2];
    let q2 = &arena[q2];

    let o1 = sign(area(p1, q1, p2));
    let o2 = sign(area(p1, q1, q2));
    let o3 = sign(area(p2, q2, p1));
    let o4 = sign(area(p2, q2, q1));

    (o1 != o2 && o3 != o4)
        || (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, q2, q1))
        || (o3 == 0 && on_segment(p2, p1, q2))
        || (o4 == 0 && on_segment(p2, q1, q2))
}

/// Whether the segment `a`-`b` crosses any ring edge not incident to
/// either endpoint.
fn intersects_polygon(arena: &NodeArena, a: NodeId, b: NodeId) -> bool {
    let a_vertex = arena[a].vertex;
    let b_vertex = arena[b].vertex;

    let mut p = a;
    loop {
        let p_next = arena[p].next;
        if arena[p].vertex != a_vertex
            && arena[p_next].vertex != a_vertex
            && arena[p].vertex != b_vertex
            && arena[p_next].vertex != b_vertex
            && intersects(arena, p, p_next, a, b)
        {
            return true;
        }
        p = p_next;
        if p == a {
            break;
        }
    }
    false
}

/// Even-odd ray-crossing test for the midpoint of `a`-`b` against the
/// whole ring.
#[allow(clippy::float_cmp)]
fn middle_inside(arena: &NodeArena, a: NodeId, b: NodeId) -> bool {
    let px = f64::midpoint(arena[a].x, arena[b].x);
    let py = f64::midpoint(arena[a].y, arena[b].y);

    let mut inside = false;
    let mut p = a;
    loop {
        let p_next = arena[p].next;
        let (x1, y1) = (arena[p].x, arena[p].y);
        let (x2, y2) = (arena[p_next].x, arena[p_next].y);
        if ((y1 > py) != (y2 > py)) && y2 != y1 && (px < (x2 - x1) * (py - y1) / (y2 - y1) + x1) {
            inside = !inside;
        }
        p = p_next;
        if p == a {
            break;
        }
    }
    inside
}
