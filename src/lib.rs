pub mod error;
pub mod math;
pub mod triangulation;

pub use error::{InputError, Result, TrigonError};
pub use triangulation::{deviation, triangulate, TriangulateFace};
