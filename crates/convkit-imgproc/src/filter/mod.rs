//! Filter operations
//!
//! This module provides the 2D convolution engines: a reference engine that checks bounds on
//! every read, a padded engine that materializes the border once, and accelerated versions of
//! both. Out-of-bounds reads are resolved by a pluggable [`BoundaryPolicy`].

/// Timing harness comparing the engines.
pub mod benchmark;

/// Boundary policies for out-of-bounds neighborhood reads.
mod border;
pub use border::*;

/// Channel selective convolution.
mod channels;
pub use channels::*;

/// Engine selection.
mod engine;
pub use engine::*;

/// Error types for the filter module.
mod error;
pub use error::*;

/// 2D kernel type.
mod kernel;
pub use kernel::*;

/// Named kernels.
pub mod kernels;

/// Reference and padded convolution.
mod ops;
pub use ops::*;

/// Row-parallel convolution.
mod accelerated;
pub use accelerated::*;
