#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image filtering module, home of the convolution engines.
pub mod filter;

/// operations to normalize images.
pub mod normalize;

/// spatial padding driven by boundary policies.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;
