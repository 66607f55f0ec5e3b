use super::node::{NodeArena, NodeId, NONE};

/// Morton code of a point, relative to the bounding box described by
/// `(min_x, min_y, inv_size)`.
///
/// Both coordinates are quantized to the non-negative 15-bit integer
/// range and bit-interleaved, giving a single value that preserves 2D
/// locality along the z-order curve.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn z_order(x: f64, y: f64, min_x: f64, min_y: f64, inv_size: f64) -> u32 {
    let mut x = ((x - min_x) * inv_size) as u32;
    let mut y = ((y - min_y) * inv_size) as u32;

    x = (x | (x << 8)) & 0x00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333;
    x = (x | (x << 1)) & 0x5555_5555;

    y = (y | (y << 8)) & 0x00FF_00FF;
    y = (y | (y << 4)) & 0x0F0F_0F0F;
    y = (y | (y << 2)) & 0x3333_3333;
    y = (y | (y << 1)) & 0x5555_5555;

    x | (y << 1)
}

/// Interlinks all nodes of a ring into a z-order list sorted by Morton
/// code.
///
/// Codes are computed lazily; a node retains the code from a previous
/// indexing pass since the quantization parameters never change within
/// one triangulation run.
pub(crate) fn index_curve(
    arena: &mut NodeArena,
    start: NodeId,
    min_x: f64,
    min_y: f64,
    inv_size: f64,
) {
    let mut p = start;
    loop {
        if arena[p].z == NONE {
            let (x, y) = (arena[p].x, arena[p].y);
            arena[p].z = z_order(x, y, min_x, min_y, inv_size);
        }
        arena[p].prev_z = arena[p].prev;
        arena[p].next_z = arena[p].next;
        p = arena[p].next;
        if p == start {
            break;
        }
    }

    // Break the circle so the list has a head and a tail to sort between.
    let tail = arena[p].prev_z;
    arena[tail].next_z = NONE;
    arena[p].prev_z = NONE;

    sort_linked(arena, p);
}

/// Bottom-up merge sort over the z-links (Simon Tatham's linked-list
/// sort): stable, in-place, O(n log n).
fn sort_linked(arena: &mut NodeArena, mut list: NodeId) {
    let mut in_size = 1;

    loop {
        let mut p = list;
        list = NONE;
        let mut tail = NONE;
        let mut num_merges = 0;

        while p != NONE {
            num_merges += 1;
            let mut q = p;
            let mut p_size: usize = 0;
            for _ in 0..in_size {
                p_size += 1;
                q = arena[q].next_z;
                if q == NONE {
                    break;
                }
            }
            let mut q_size = in_size;

            while p_size > 0 || (q_size > 0 && q != NONE) {
                let e = if p_size > 0 && (q_size == 0 || q == NONE || arena[p].z <= arena[q].z) {
                    let e = p;
                    p = arena[p].next_z;
                    p_size -= 1;
                    e
                } else {
                    let e = q;
                    q = arena[q].next_z;
                    q_size -= 1;
                    e
                };

                if tail == NONE {
                    list = e;
                } else {
                    arena[tail].next_z = e;
                }
                arena[e].prev_z = tail;
                tail = e;
            }

            p = q;
        }

        arena[tail].next_z = NONE;
        in_size *= 2;

        if num_merges <= 1 {
            break;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::node::NodeArena;
    use super::super::ring::build_ring;
    use super::*;

    #[test]
    fn interleaves_known_codes() {
        // Unit bbox quantized to the full 15-bit range.
        let inv = 32767.0;
        assert_eq!(z_order(0.0, 0.0, 0.0, 0.0, inv), 0);
        // x = 1 -> bit 0; y = 1 -> bit 1.
        assert_eq!(z_order(1.0 / 32767.0, 0.0, 0.0, 0.0, inv), 0b01);
        assert_eq!(z_order(0.0, 1.0 / 32767.0, 0.0, 0.0, inv), 0b10);
        assert_eq!(
            z_order(1.0, 1.0, 0.0, 0.0, inv),
            0x3FFF_FFFF,
        );
    }

    #[test]
    fn codes_preserve_locality_quadrants() {
        let inv = 32767.0;
        let bottom_left = z_order(0.1, 0.1, 0.0, 0.0, inv);
        let top_right = z_order(0.9, 0.9, 0.0, 0.0, inv);
        let top_left = z_order(0.1, 0.9, 0.0, 0.0, inv);
        assert!(bottom_left < top_left);
        assert!(top_left < top_right);
    }

    #[test]
    fn index_curve_sorts_by_code() {
        // A jagged ring whose ring order is far from z order.
        let coords = [
            0.0, 0.0, 10.0, 1.0, 2.0, 2.0, 9.0, 9.0, 1.0, 8.0, 5.0, 4.0,
        ];
        let mut arena = NodeArena::with_capacity(6);
        let node = build_ring(&mut arena, &coords, 0, coords.len(), 2, true).unwrap();
        index_curve(&mut arena, node, 0.0, 0.0, 32767.0 / 10.0);

        // Find the head of the z list.
        let mut head = node;
        while arena[head].prev_z != NONE {
            head = arena[head].prev_z;
        }
        let mut count = 1;
        let mut p = head;
        while arena[p].next_z != NONE {
            let next = arena[p].next_z;
            assert!(arena[p].z <= arena[next].z, "z list out of order");
            assert_eq!(arena[next].prev_z, p, "broken back link");
            p = next;
            count += 1;
        }
        assert_eq!(count, 6);
    }
}
