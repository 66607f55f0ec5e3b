use thiserror::Error;

/// Top-level error type for the Trigon triangulation kernel.
#[derive(Debug, Error)]
pub enum TrigonError {
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Structural problems in the flat polygon input.
///
/// Geometric degeneracy (self-intersections, zero-area rings, collapsed
/// holes) is never an error; only inputs whose layout cannot be read
/// safely are rejected.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("stride must be at least 2, got {0}")]
    StrideTooSmall(usize),

    #[error("coordinate count {count} is not a multiple of stride {stride}")]
    RaggedCoordinates { count: usize, stride: usize },

    #[error("hole offset {value} at position {position} is less than the preceding offset {previous}")]
    UnsortedHoleOffsets {
        position: usize,
        value: usize,
        previous: usize,
    },

    #[error("hole offset {offset} is out of range for {vertex_count} vertices")]
    HoleOffsetOutOfRange { offset: usize, vertex_count: usize },
}

/// Convenience type alias for results using [`TrigonError`].
pub type Result<T> = std::result::Result<T, TrigonError>;
