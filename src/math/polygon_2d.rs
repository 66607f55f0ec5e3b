use super::Point2;

/// Computes the signed area of a polygon stored in a flat coordinate
/// slice (shoelace formula).
///
/// The polygon occupies `coords[start..end)`, one vertex every `stride`
/// values, of which only the first two are used. Positive for
/// counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(coords: &[f64], start: usize, end: usize, stride: usize) -> f64 {
    let mut sum = 0.0;
    let mut j = if end > stride { end - stride } else { start };
    let mut i = start;
    while i < end {
        sum += (coords[j] - coords[i]) * (coords[i + 1] + coords[j + 1]);
        j = i;
        i += stride;
    }
    sum * 0.5
}

/// Flattens an outer ring plus hole rings of [`Point2`] into the flat
/// representation consumed by the triangulator.
///
/// The first ring is the outer boundary; every following ring is a hole.
/// Returns the concatenated coordinates and the vertex offsets at which
/// each hole begins. The stride of the flattened form is always 2.
#[must_use]
pub fn flatten_rings(rings: &[Vec<Point2>]) -> (Vec<f64>, Vec<usize>) {
    let mut coords = Vec::with_capacity(rings.iter().map(|r| r.len() * 2).sum());
    let mut hole_offsets = Vec::with_capacity(rings.len().saturating_sub(1));

    let mut offset = 0;
    for (ring_index, ring) in rings.iter().enumerate() {
        if ring_index > 0 {
            hole_offsets.push(offset);
        }
        for point in ring {
            coords.push(point.x);
            coords.push(point.y);
        }
        offset += ring.len();
    }

    (coords, hole_offsets)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn signed_area_ccw_square() {
        let coords = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let area = signed_area(&coords, 0, coords.len(), 2);
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let coords = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let area = signed_area(&coords, 0, coords.len(), 2);
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_subrange_with_stride() {
        // Same unit square embedded at vertex offset 1 with a z component.
        let coords = [
            9.0, 9.0, 9.0, // skipped leading vertex
            0.0, 0.0, 5.0, 1.0, 0.0, 5.0, 1.0, 1.0, 5.0, 0.0, 1.0, 5.0,
        ];
        let area = signed_area(&coords, 3, coords.len(), 3);
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[0.0, 0.0], 0, 2, 2).abs() < TOLERANCE);
        assert!(signed_area(&[], 0, 0, 2).abs() < TOLERANCE);
    }

    #[test]
    fn flatten_outer_only() {
        let rings = vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]];
        let (coords, holes) = flatten_rings(&rings);
        assert_eq!(coords, vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        assert!(holes.is_empty());
    }

    #[test]
    fn flatten_with_holes() {
        let rings = vec![
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            vec![
                Point2::new(4.0, 4.0),
                Point2::new(4.0, 6.0),
                Point2::new(6.0, 6.0),
                Point2::new(6.0, 4.0),
            ],
        ];
        let (coords, holes) = flatten_rings(&rings);
        assert_eq!(coords.len(), 16);
        assert_eq!(holes, vec![4]);
    }
}
