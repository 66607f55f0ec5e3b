use std::ops::{Index, IndexMut};

/// Identifier of a node in the arena.
pub(crate) type NodeId = u32;

/// Sentinel for an absent z-order link or a not-yet-computed Morton code.
///
/// Valid Morton codes interleave two 15-bit coordinates and therefore fit
/// in 30 bits, so `u32::MAX` can never collide with one.
pub(crate) const NONE: u32 = u32::MAX;

/// A polygon vertex linked into a circular ring and, once indexed, into a
/// z-order list.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Position of the vertex in the caller's flat coordinate slice.
    /// Used only to produce output indices, never for geometric tests.
    pub vertex: u32,
    pub x: f64,
    pub y: f64,
    /// Ring-order links. Valid for every node linked into a ring.
    pub prev: NodeId,
    pub next: NodeId,
    /// Morton code, `NONE` until computed.
    pub z: u32,
    /// Z-order links, `NONE` while the ring is not indexed.
    pub prev_z: NodeId,
    pub next_z: NodeId,
    /// Marks a node introduced by hole bridging rather than present in the
    /// original boundary; such nodes are exempt from duplicate removal.
    pub steiner: bool,
}

/// Flat arena holding every node of a triangulation run.
///
/// Links are indices into the arena instead of pointers, which keeps the
/// doubly-linked rings O(1) to splice while staying free of cyclic
/// ownership. Nodes are never physically removed; unlinking makes them
/// unreachable and the whole arena is dropped at the end of the run.
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push(&mut self, vertex: u32, x: f64, y: f64) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            vertex,
            x,
            y,
            prev: id,
            next: id,
            z: NONE,
            prev_z: NONE,
            next_z: NONE,
            steiner: false,
        });
        id
    }

    /// Creates a node and splices it into the ring directly after `last`,
    /// or as a new single-node ring when `last` is `None`.
    pub fn insert(&mut self, vertex: u32, x: f64, y: f64, last: Option<NodeId>) -> NodeId {
        let id = self.push(vertex, x, y);
        if let Some(last) = last {
            let last_next = self[last].next;
            self[id].next = last_next;
            self[id].prev = last;
            self[last_next].prev = id;
            self[last].next = id;
        }
        id
    }

    /// Unlinks a node from its ring and from the z-order list.
    ///
    /// The removed node keeps its own link values; callers step through
    /// them to resume iteration at the splice point.
    pub fn remove(&mut self, id: NodeId) {
        let Node {
            prev,
            next,
            prev_z,
            next_z,
            ..
        } = self[id];

        self[next].prev = prev;
        self[prev].next = next;
        if prev_z != NONE {
            self[prev_z].next_z = next_z;
        }
        if next_z != NONE {
            self[next_z].prev_z = prev_z;
        }
    }

    /// Splits a ring along the diagonal `a`-`b`, duplicating both
    /// endpoints, and returns the duplicate of `b` on the second ring.
    ///
    /// The same rewiring merges two separate rings into one when `a` and
    /// `b` lie on different rings, which is how hole bridges are formed.
    pub fn split_ring(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (vertex, x, y) = {
            let n = &self[a];
            (n.vertex, n.x, n.y)
        };
        let a2 = self.push(vertex, x, y);
        let (vertex, x, y) = {
            let n = &self[b];
            (n.vertex, n.x, n.y)
        };
        let b2 = self.push(vertex, x, y);
        let a_next = self[a].next;
        let b_prev = self[b].prev;

        self[a].next = b;
        self[b].prev = a;
        self[a2].next = a_next;
        self[a_next].prev = a2;
        self[b2].next = a2;
        self[a2].prev = b2;
        self[b_prev].next = b2;
        self[b2].prev = b_prev;

        b2
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }
}

/// Twice the signed area of the triangle `(p, q, r)`, negated so that a
/// convex corner of a counter-clockwise ring yields a negative value.
#[inline]
pub(crate) fn area(p: &Node, q: &Node, r: &Node) -> f64 {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

/// Exact coordinate equality; the kernel's duplicate detection depends on
/// exact comparison rather than a tolerance.
#[inline]
#[allow(clippy::float_cmp)]
pub(crate) fn equals(p: &Node, q: &Node) -> bool {
    p.x == q.x && p.y == q.y
}

/// Whether the diagonal from `a` toward `b` leaves `a` through the
/// polygon's interior, judged from the two edges around `a` alone.
pub(crate) fn locally_inside(arena: &NodeArena, a: NodeId, b: NodeId) -> bool {
    let a_prev = &arena[arena[a].prev];
    let a_next = &arena[arena[a].next];
    let a = &arena[a];
    let b = &arena[b];
    if area(a_prev, a, a_next) < 0.0 {
        area(a, b, a_next) >= 0.0 && area(a, a_prev, b) >= 0.0
    } else {
        area(a, b, a_prev) < 0.0 || area(a, a_next, b) < 0.0
    }
}

/// Whether `(px, py)` lies inside or on the triangle `(a, b, c)` given in
/// clockwise orientation.
#[inline]
#[allow(clippy::too_many_arguments)]
pub(crate) fn point_in_triangle(
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
    cx: f64,
    cy: f64,
    px: f64,
    py: f64,
) -> bool {
    (cx - px) * (ay - py) >= (ax - px) * (cy - py)
        && (ax - px) * (by - py) >= (bx - px) * (ay - py)
        && (bx - px) * (cy - py) >= (cx - px) * (by - py)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ring_of(arena: &mut NodeArena, points: &[(f64, f64)]) -> NodeId {
        let mut last = None;
        for (i, &(x, y)) in points.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let vertex = (i * 2) as u32;
            last = Some(arena.insert(vertex, x, y, last));
        }
        last.unwrap()
    }

    fn collect_ring(arena: &NodeArena, start: NodeId) -> Vec<u32> {
        let mut out = vec![arena[start].vertex];
        let mut p = arena[start].next;
        while p != start {
            out.push(arena[p].vertex);
            p = arena[p].next;
        }
        out
    }

    #[test]
    fn single_node_links_to_itself() {
        let mut arena = NodeArena::with_capacity(1);
        let id = arena.insert(0, 1.0, 2.0, None);
        assert_eq!(arena[id].prev, id);
        assert_eq!(arena[id].next, id);
    }

    #[test]
    fn insert_preserves_ring_order() {
        let mut arena = NodeArena::with_capacity(4);
        let last = ring_of(&mut arena, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let first = arena[last].next;
        assert_eq!(collect_ring(&arena, first), vec![0, 2, 4, 6]);
    }

    #[test]
    fn remove_relinks_neighbors() {
        let mut arena = NodeArena::with_capacity(3);
        let last = ring_of(&mut arena, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let first = arena[last].next;
        let middle = arena[first].next;
        arena.remove(middle);
        assert_eq!(arena[first].next, last);
        assert_eq!(arena[last].prev, first);
        // The removed node keeps its own links for splice-point recovery.
        assert_eq!(arena[middle].next, last);
    }

    #[test]
    fn remove_unlinks_z_list() {
        let mut arena = NodeArena::with_capacity(3);
        let a = arena.insert(0, 0.0, 0.0, None);
        let b = arena.insert(2, 1.0, 0.0, Some(a));
        let c = arena.insert(4, 1.0, 1.0, Some(b));
        arena[a].next_z = b;
        arena[b].prev_z = a;
        arena[b].next_z = c;
        arena[c].prev_z = b;
        arena.remove(b);
        assert_eq!(arena[a].next_z, c);
        assert_eq!(arena[c].prev_z, a);
    }

    #[test]
    fn split_ring_produces_two_rings() {
        let mut arena = NodeArena::with_capacity(8);
        let last = ring_of(
            &mut arena,
            &[
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 2.0),
                (0.0, 2.0),
            ],
        );
        let a = arena[last].next; // vertex 0
        let b = arena[arena[a].next].next; // vertex 4
        let b2 = arena.split_ring(a, b);

        // First ring: a, b plus whatever lay between them going backward.
        let first = collect_ring(&arena, a);
        assert_eq!(first.len(), 3);
        // Second ring gets the duplicates of both endpoints.
        let second = collect_ring(&arena, b2);
        assert_eq!(second.len(), 3);
        assert_eq!(arena[b2].vertex, arena[b].vertex);
    }
}
