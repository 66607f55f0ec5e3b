pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Used by callers and tests; the triangulation predicates themselves
/// compare exactly, since the fallback chain depends on exact signs.
pub const TOLERANCE: f64 = 1e-10;
