mod ear_clip;
mod holes;
mod node;
mod ring;
mod zorder;

use crate::error::{InputError, Result};
use crate::math::polygon_2d::signed_area;

use self::ear_clip::{clip_ears, Pass};
use self::holes::eliminate_holes;
use self::node::NodeArena;
use self::ring::build_ring;

/// Vertex-count threshold above which the z-order index is built.
///
/// The threshold applies to the whole input, not per ring; small inputs
/// triangulate faster with the plain interior scan.
const ZORDER_THRESHOLD: usize = 80;

/// Triangulates one planar face given as a flat coordinate sequence with
/// optional holes.
///
/// The sequence holds the outer ring's vertices followed by each hole
/// ring's vertices; `hole_offsets` marks the vertex position at which
/// each hole begins. `stride` is the number of values per vertex, of
/// which the first two are used geometrically.
///
/// Degenerate geometry never fails: self-intersections, zero-area rings
/// and collapsed holes degrade to fewer triangles instead of errors.
pub struct TriangulateFace<'a> {
    coords: &'a [f64],
    hole_offsets: &'a [usize],
    stride: usize,
}

impl<'a> TriangulateFace<'a> {
    /// Creates a new `TriangulateFace` operation.
    #[must_use]
    pub fn new(coords: &'a [f64], hole_offsets: &'a [usize], stride: usize) -> Self {
        Self {
            coords,
            hole_offsets,
            stride,
        }
    }

    /// Executes the triangulation.
    ///
    /// Returns the flat triangle list; each consecutive triple holds the
    /// vertex indices (positions in the ungrouped input sequence) of one
    /// triangle. Inputs reducing to fewer than 3 effective vertices give
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the input's layout is invalid: stride below 2,
    /// a ragged coordinate slice, or hole offsets that are unsorted or
    /// out of range.
    pub fn execute(&self) -> Result<Vec<u32>> {
        self.validate()?;
        Ok(self.run(self.coords.len() > ZORDER_THRESHOLD * self.stride))
    }

    fn validate(&self) -> Result<()> {
        if self.stride < 2 {
            return Err(InputError::StrideTooSmall(self.stride).into());
        }
        if self.coords.len() % self.stride != 0 {
            return Err(InputError::RaggedCoordinates {
                count: self.coords.len(),
                stride: self.stride,
            }
            .into());
        }
        let vertex_count = self.coords.len() / self.stride;
        let mut previous = 0;
        for (position, &value) in self.hole_offsets.iter().enumerate() {
            if value < previous {
                return Err(InputError::UnsortedHoleOffsets {
                    position,
                    value,
                    previous,
                }
                .into());
            }
            if value >= vertex_count {
                return Err(InputError::HoleOffsetOutOfRange {
                    offset: value,
                    vertex_count,
                }
                .into());
            }
            previous = value;
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn run(&self, accelerate: bool) -> Vec<u32> {
        let stride = self.stride;
        let vertex_count = self.coords.len() / stride;
        let mut arena = NodeArena::with_capacity(vertex_count + self.hole_offsets.len() * 2);

        let outer_len = self
            .hole_offsets
            .first()
            .map_or(self.coords.len(), |&offset| offset * stride);
        let Some(mut outer) = build_ring(&mut arena, self.coords, 0, outer_len, stride, true)
        else {
            return Vec::new();
        };
        if arena[outer].next == arena[outer].prev {
            return Vec::new();
        }

        if !self.hole_offsets.is_empty() {
            outer = eliminate_holes(&mut arena, self.coords, self.hole_offsets, outer, stride);
        }

        // The z-order quantization frame is the outer ring's bounding
        // box; a degenerate box disables the index and forces the plain
        // scan.
        let mut min_x = 0.0;
        let mut min_y = 0.0;
        let mut inv_size = 0.0;
        if accelerate {
            let mut max_x = f64::NEG_INFINITY;
            let mut max_y = f64::NEG_INFINITY;
            min_x = f64::INFINITY;
            min_y = f64::INFINITY;
            let mut i = 0;
            while i < outer_len {
                min_x = min_x.min(self.coords[i]);
                max_x = max_x.max(self.coords[i]);
                min_y = min_y.min(self.coords[i + 1]);
                max_y = max_y.max(self.coords[i + 1]);
                i += stride;
            }
            inv_size = (max_x - min_x).max(max_y - min_y);
            inv_size = if inv_size == 0.0 { 0.0 } else { 32767.0 / inv_size };
        }

        let mut triangles =
            Vec::with_capacity((vertex_count + self.hole_offsets.len() * 2).saturating_sub(2) * 3);
        clip_ears(
            &mut arena,
            outer,
            &mut triangles,
            stride as u32,
            min_x,
            min_y,
            inv_size,
            Pass::Plain,
        );
        triangles
    }
}

/// Triangulates a flat polygon-with-holes sequence.
///
/// Convenience wrapper over [`TriangulateFace`].
///
/// # Errors
///
/// Returns an error if the input's layout is invalid; see
/// [`TriangulateFace::execute`].
pub fn triangulate(coords: &[f64], hole_offsets: &[usize], stride: usize) -> Result<Vec<u32>> {
    TriangulateFace::new(coords, hole_offsets, stride).execute()
}

/// Relative mismatch between the polygon's area and the summed area of
/// the returned triangles: 0 means the triangulation covers the polygon
/// exactly, larger values indicate area lost to degeneracy fallbacks.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn deviation(coords: &[f64], hole_offsets: &[usize], stride: usize, triangles: &[u32]) -> f64 {
    let outer_len = hole_offsets
        .first()
        .map_or(coords.len(), |&offset| offset * stride);
    let mut polygon_area = signed_area(coords, 0, outer_len, stride).abs();
    for (i, &offset) in hole_offsets.iter().enumerate() {
        let start = offset * stride;
        let end = if i + 1 < hole_offsets.len() {
            hole_offsets[i + 1] * stride
        } else {
            coords.len()
        };
        polygon_area -= signed_area(coords, start, end, stride).abs();
    }

    let mut triangles_area = 0.0;
    for triangle in triangles.chunks_exact(3) {
        let a = triangle[0] as usize * stride;
        let b = triangle[1] as usize * stride;
        let c = triangle[2] as usize * stride;
        triangles_area += ((coords[a] - coords[c]) * (coords[b + 1] - coords[a + 1])
            - (coords[a] - coords[b]) * (coords[c + 1] - coords[a + 1]))
            .abs()
            / 2.0;
    }

    if polygon_area == 0.0 && triangles_area == 0.0 {
        0.0
    } else {
        ((polygon_area - triangles_area) / polygon_area).abs()
    }
}
