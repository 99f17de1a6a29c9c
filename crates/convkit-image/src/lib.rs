#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation used as the sample array of the convolution engines.
pub mod image;

/// Error types for the image module.
pub mod error;

/// basic operations between images.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
