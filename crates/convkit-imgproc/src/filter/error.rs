use convkit_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// A caller supplied argument violates a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A boundary policy could not resolve an out-of-bounds coordinate.
    #[error("Boundary policy could not resolve coordinate ({row}, {col})")]
    OutOfRange {
        /// The requested row.
        row: isize,
        /// The requested column.
        col: isize,
    },

    /// Error coming from the image type.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the parallel executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
